use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use super::{
    AuditStore, NotificationStore, ShiftStore, ShiftTransaction, StoreResult, TemplateStore,
};
use crate::database::models::{
    AuditFilter, AuditLogEntry, NewAuditEntry, NewNotification, NewShift, Notification, Shift,
    ShiftFilter, ShiftTemplate, ShiftTemplateInput, ShiftUpdate,
};

#[derive(Debug, Default)]
struct Tables {
    clients: HashSet<Uuid>,
    staff: HashSet<Uuid>,
    shifts: HashMap<Uuid, Shift>,
    notifications: Vec<Notification>,
    audit_logs: Vec<AuditLogEntry>,
    templates: HashMap<Uuid, ShiftTemplate>,
}

/// In-process store used by the test suite and by embedders that run
/// without a database.
///
/// A transaction holds the table lock from `begin` until commit or drop, so
/// shift transactions are fully serialized.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_client(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.tables.lock().await.clients.insert(id);
        id
    }

    pub async fn add_staff(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.tables.lock().await.staff.insert(id);
        id
    }

    /// Every shift, earliest start first.
    pub async fn shifts(&self) -> Vec<Shift> {
        let tables = self.tables.lock().await;
        let mut shifts: Vec<Shift> = tables.shifts.values().cloned().collect();
        shifts.sort_by_key(|s| s.start_time);
        shifts
    }

    /// Every notification in insertion order.
    pub async fn notifications(&self) -> Vec<Notification> {
        self.tables.lock().await.notifications.clone()
    }

    /// Every audit entry in insertion order.
    pub async fn audit_log(&self) -> Vec<AuditLogEntry> {
        self.tables.lock().await.audit_logs.clone()
    }
}

/// Staged shift writes applied to the locked tables on commit.
#[derive(Debug)]
pub struct MemoryShiftTx {
    tables: OwnedMutexGuard<Tables>,
    staged: HashMap<Uuid, Shift>,
}

impl ShiftStore for MemoryStore {
    type Tx = MemoryShiftTx;

    async fn begin(&self) -> StoreResult<MemoryShiftTx> {
        let tables = Arc::clone(&self.tables).lock_owned().await;
        let staged = tables.shifts.clone();
        Ok(MemoryShiftTx { tables, staged })
    }

    async fn get_shift(&self, id: Uuid) -> StoreResult<Option<Shift>> {
        Ok(self.tables.lock().await.shifts.get(&id).cloned())
    }

    async fn list_shifts(&self, filter: &ShiftFilter) -> StoreResult<Vec<Shift>> {
        let tables = self.tables.lock().await;
        let mut shifts: Vec<Shift> = tables
            .shifts
            .values()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect();
        shifts.sort_by_key(|s| s.start_time);
        Ok(shifts)
    }

    async fn staff_history(&self, staff_id: Uuid) -> StoreResult<Vec<Shift>> {
        let tables = self.tables.lock().await;
        let mut shifts: Vec<Shift> = tables
            .shifts
            .values()
            .filter(|s| s.staff_id == Some(staff_id))
            .cloned()
            .collect();
        shifts.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        Ok(shifts)
    }
}

impl ShiftTransaction for MemoryShiftTx {
    async fn lock_shift(&mut self, id: Uuid) -> StoreResult<Option<Shift>> {
        Ok(self.staged.get(&id).cloned())
    }

    async fn lock_staff(&mut self, _staff_id: Uuid) -> StoreResult<()> {
        // The table lock already excludes every other transaction.
        Ok(())
    }

    async fn client_exists(&mut self, client_id: Uuid) -> StoreResult<bool> {
        Ok(self.tables.clients.contains(&client_id))
    }

    async fn staff_exists(&mut self, staff_id: Uuid) -> StoreResult<bool> {
        Ok(self.tables.staff.contains(&staff_id))
    }

    async fn find_by_staff_and_window(
        &mut self,
        staff_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude_shift_id: Option<Uuid>,
    ) -> StoreResult<Vec<Shift>> {
        let mut shifts: Vec<Shift> = self
            .staged
            .values()
            .filter(|s| s.staff_id == Some(staff_id))
            .filter(|s| s.status.occupies_staff())
            .filter(|s| Some(s.id) != exclude_shift_id)
            .filter(|s| s.overlaps(start, end))
            .cloned()
            .collect();
        shifts.sort_by_key(|s| s.start_time);
        Ok(shifts)
    }

    async fn insert_shift(&mut self, shift: &NewShift) -> StoreResult<Shift> {
        let now = Utc::now();
        let row = Shift {
            id: Uuid::new_v4(),
            client_id: shift.client_id,
            staff_id: shift.staff_id,
            start_time: shift.start_time,
            end_time: shift.end_time,
            status: shift.status,
            created_by: shift.created_by,
            created_at: now,
            updated_at: now,
        };
        self.staged.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_shift(&mut self, id: Uuid, update: &ShiftUpdate) -> StoreResult<Option<Shift>> {
        let Some(row) = self.staged.get_mut(&id) else {
            return Ok(None);
        };
        row.client_id = update.client_id;
        row.staff_id = update.staff_id;
        row.start_time = update.start_time;
        row.end_time = update.end_time;
        row.status = update.status;
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn delete_shift(&mut self, id: Uuid) -> StoreResult<bool> {
        Ok(self.staged.remove(&id).is_some())
    }

    async fn commit(mut self) -> StoreResult<()> {
        self.tables.shifts = self.staged;
        Ok(())
    }
}

impl NotificationStore for MemoryStore {
    async fn insert_notification(&self, notification: &NewNotification) -> StoreResult<Notification> {
        let row = Notification {
            id: Uuid::new_v4(),
            title: notification.title.clone(),
            message: notification.message.clone(),
            category: notification.category,
            recipient_id: notification.recipient_id,
            recipient_kind: notification.recipient_kind,
            read: false,
            payload: notification.payload.clone(),
            created_at: Utc::now(),
        };
        self.tables.lock().await.notifications.push(row.clone());
        Ok(row)
    }

    async fn list_notifications(
        &self,
        recipient_id: Uuid,
        unread_only: bool,
    ) -> StoreResult<Vec<Notification>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .notifications
            .iter()
            .rev()
            .filter(|n| n.recipient_id == recipient_id && !(unread_only && n.read))
            .cloned()
            .collect())
    }

    async fn mark_notification_read(
        &self,
        id: Uuid,
        recipient_id: Uuid,
    ) -> StoreResult<Option<Notification>> {
        let mut tables = self.tables.lock().await;
        Ok(tables
            .notifications
            .iter_mut()
            .find(|n| n.id == id && n.recipient_id == recipient_id)
            .map(|n| {
                n.read = true;
                n.clone()
            }))
    }
}

impl AuditStore for MemoryStore {
    async fn append_audit(&self, entry: &NewAuditEntry) -> StoreResult<AuditLogEntry> {
        let row = AuditLogEntry {
            id: Uuid::new_v4(),
            admin_id: entry.admin_id,
            action: entry.action.clone(),
            module: entry.module.clone(),
            details: entry.details.clone(),
            timestamp: Utc::now(),
        };
        self.tables.lock().await.audit_logs.push(row.clone());
        Ok(row)
    }

    async fn query_audit(&self, filter: &AuditFilter) -> StoreResult<(i64, Vec<AuditLogEntry>)> {
        let tables = self.tables.lock().await;
        let matching: Vec<&AuditLogEntry> = tables
            .audit_logs
            .iter()
            .rev()
            .filter(|e| filter.matches(e))
            .collect();
        let total = matching.len() as i64;
        let page = matching
            .into_iter()
            .skip(usize::try_from(filter.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(filter.limit()).unwrap_or(usize::MAX))
            .cloned()
            .collect();
        Ok((total, page))
    }
}

impl TemplateStore for MemoryStore {
    async fn template_client_exists(&self, client_id: Uuid) -> StoreResult<bool> {
        Ok(self.tables.lock().await.clients.contains(&client_id))
    }

    async fn insert_template(&self, input: &ShiftTemplateInput) -> StoreResult<ShiftTemplate> {
        let now = Utc::now();
        let row = ShiftTemplate {
            id: Uuid::new_v4(),
            client_id: input.client_id,
            start_time: input.start_time,
            end_time: input.end_time,
            day_of_week: input.day_of_week,
            recurrence: input.recurrence,
            status: input.status,
            created_at: now,
            updated_at: now,
        };
        self.tables.lock().await.templates.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get_template(&self, id: Uuid) -> StoreResult<Option<ShiftTemplate>> {
        Ok(self.tables.lock().await.templates.get(&id).cloned())
    }

    async fn list_templates(&self, client_id: Option<Uuid>) -> StoreResult<Vec<ShiftTemplate>> {
        let tables = self.tables.lock().await;
        let mut templates: Vec<ShiftTemplate> = tables
            .templates
            .values()
            .filter(|t| client_id.is_none_or(|id| t.client_id == id))
            .cloned()
            .collect();
        templates.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(templates)
    }

    async fn delete_template(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.tables.lock().await.templates.remove(&id).is_some())
    }
}

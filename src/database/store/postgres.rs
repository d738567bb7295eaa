use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::{
    AuditStore, NotificationStore, ShiftStore, ShiftTransaction, StoreResult, TemplateStore,
};
use crate::database::models::{
    AuditFilter, AuditLogEntry, NewAuditEntry, NewNotification, NewShift, Notification, Shift,
    ShiftFilter, ShiftTemplate, ShiftTemplateInput, ShiftUpdate,
};
use crate::database::repositories::{
    audit as audit_repo, notification as notification_repo, shift as shift_repo,
    template as template_repo,
};

/// Store backed by a Postgres connection pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// An open Postgres transaction; rolled back by sqlx on drop.
#[derive(Debug)]
pub struct PgShiftTx {
    tx: Transaction<'static, Postgres>,
}

impl ShiftStore for PgStore {
    type Tx = PgShiftTx;

    async fn begin(&self) -> StoreResult<PgShiftTx> {
        let tx = self.pool.begin().await?;
        Ok(PgShiftTx { tx })
    }

    async fn get_shift(&self, id: Uuid) -> StoreResult<Option<Shift>> {
        Ok(shift_repo::find_by_id(&self.pool, id).await?)
    }

    async fn list_shifts(&self, filter: &ShiftFilter) -> StoreResult<Vec<Shift>> {
        Ok(shift_repo::find_by_filter(&self.pool, filter).await?)
    }

    async fn staff_history(&self, staff_id: Uuid) -> StoreResult<Vec<Shift>> {
        Ok(shift_repo::find_by_staff(&self.pool, staff_id).await?)
    }
}

impl ShiftTransaction for PgShiftTx {
    async fn lock_shift(&mut self, id: Uuid) -> StoreResult<Option<Shift>> {
        Ok(shift_repo::find_by_id_for_update(&mut *self.tx, id).await?)
    }

    async fn lock_staff(&mut self, staff_id: Uuid) -> StoreResult<()> {
        Ok(shift_repo::lock_staff(&mut *self.tx, staff_id).await?)
    }

    async fn client_exists(&mut self, client_id: Uuid) -> StoreResult<bool> {
        Ok(shift_repo::client_exists(&mut *self.tx, client_id).await?)
    }

    async fn staff_exists(&mut self, staff_id: Uuid) -> StoreResult<bool> {
        Ok(shift_repo::staff_exists(&mut *self.tx, staff_id).await?)
    }

    async fn find_by_staff_and_window(
        &mut self,
        staff_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude_shift_id: Option<Uuid>,
    ) -> StoreResult<Vec<Shift>> {
        Ok(
            shift_repo::find_overlapping(&mut *self.tx, staff_id, start, end, exclude_shift_id)
                .await?,
        )
    }

    async fn insert_shift(&mut self, shift: &NewShift) -> StoreResult<Shift> {
        Ok(shift_repo::create_shift(&mut *self.tx, shift).await?)
    }

    async fn update_shift(&mut self, id: Uuid, update: &ShiftUpdate) -> StoreResult<Option<Shift>> {
        Ok(shift_repo::update_shift(&mut *self.tx, id, update).await?)
    }

    async fn delete_shift(&mut self, id: Uuid) -> StoreResult<bool> {
        Ok(shift_repo::delete_shift(&mut *self.tx, id).await?)
    }

    async fn commit(self) -> StoreResult<()> {
        Ok(self.tx.commit().await?)
    }
}

impl NotificationStore for PgStore {
    async fn insert_notification(&self, notification: &NewNotification) -> StoreResult<Notification> {
        Ok(notification_repo::create_notification(&self.pool, notification).await?)
    }

    async fn list_notifications(
        &self,
        recipient_id: Uuid,
        unread_only: bool,
    ) -> StoreResult<Vec<Notification>> {
        Ok(notification_repo::find_by_recipient(&self.pool, recipient_id, unread_only).await?)
    }

    async fn mark_notification_read(
        &self,
        id: Uuid,
        recipient_id: Uuid,
    ) -> StoreResult<Option<Notification>> {
        Ok(notification_repo::mark_read(&self.pool, id, recipient_id).await?)
    }
}

impl AuditStore for PgStore {
    async fn append_audit(&self, entry: &NewAuditEntry) -> StoreResult<AuditLogEntry> {
        Ok(audit_repo::log_action(&self.pool, entry).await?)
    }

    async fn query_audit(&self, filter: &AuditFilter) -> StoreResult<(i64, Vec<AuditLogEntry>)> {
        let total = audit_repo::count(&self.pool, filter).await?;
        let page = audit_repo::find_page(&self.pool, filter).await?;
        Ok((total, page))
    }
}

impl TemplateStore for PgStore {
    async fn template_client_exists(&self, client_id: Uuid) -> StoreResult<bool> {
        Ok(shift_repo::client_exists(&self.pool, client_id).await?)
    }

    async fn insert_template(&self, input: &ShiftTemplateInput) -> StoreResult<ShiftTemplate> {
        Ok(template_repo::create_template(&self.pool, input).await?)
    }

    async fn get_template(&self, id: Uuid) -> StoreResult<Option<ShiftTemplate>> {
        Ok(template_repo::find_by_id(&self.pool, id).await?)
    }

    async fn list_templates(&self, client_id: Option<Uuid>) -> StoreResult<Vec<ShiftTemplate>> {
        Ok(template_repo::find_all(&self.pool, client_id).await?)
    }

    async fn delete_template(&self, id: Uuid) -> StoreResult<bool> {
        Ok(template_repo::delete_template(&self.pool, id).await?)
    }
}

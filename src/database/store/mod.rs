//! Persistence boundary for the scheduling subsystem.
//!
//! Every operation the services need is expressed as a trait so the same
//! lifecycle code runs against Postgres ([`PgStore`]) or the in-process
//! [`MemoryStore`]. Shift writes that depend on an availability check go
//! through a [`ShiftTransaction`]; dropping one without calling
//! [`ShiftTransaction::commit`] rolls it back.

use std::future::Future;

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::{
    AuditFilter, AuditLogEntry, NewAuditEntry, NewNotification, NewShift, Notification, Shift,
    ShiftFilter, ShiftTemplate, ShiftTemplateInput, ShiftUpdate,
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

pub trait ShiftStore: Clone + Send + Sync + 'static {
    type Tx: ShiftTransaction;

    fn begin(&self) -> impl Future<Output = StoreResult<Self::Tx>> + Send;

    fn get_shift(&self, id: Uuid) -> impl Future<Output = StoreResult<Option<Shift>>> + Send;

    /// Matching shifts ordered by start time, earliest first.
    fn list_shifts(
        &self,
        filter: &ShiftFilter,
    ) -> impl Future<Output = StoreResult<Vec<Shift>>> + Send;

    /// Every shift ever held by a staff member, newest first.
    fn staff_history(
        &self,
        staff_id: Uuid,
    ) -> impl Future<Output = StoreResult<Vec<Shift>>> + Send;
}

/// A unit of work against the shift table.
///
/// Locks are taken in the order shift row, then staff member, and held until
/// commit or drop.
pub trait ShiftTransaction: Send {
    /// Loads a shift and holds it against concurrent writers.
    fn lock_shift(&mut self, id: Uuid) -> impl Future<Output = StoreResult<Option<Shift>>> + Send;

    /// Serializes every transaction that schedules this staff member.
    fn lock_staff(&mut self, staff_id: Uuid) -> impl Future<Output = StoreResult<()>> + Send;

    fn client_exists(&mut self, client_id: Uuid) -> impl Future<Output = StoreResult<bool>> + Send;

    fn staff_exists(&mut self, staff_id: Uuid) -> impl Future<Output = StoreResult<bool>> + Send;

    /// Shifts held by `staff_id` whose status occupies the staff member and
    /// whose window intersects `[start, end)`.
    fn find_by_staff_and_window(
        &mut self,
        staff_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude_shift_id: Option<Uuid>,
    ) -> impl Future<Output = StoreResult<Vec<Shift>>> + Send;

    fn insert_shift(&mut self, shift: &NewShift) -> impl Future<Output = StoreResult<Shift>> + Send;

    fn update_shift(
        &mut self,
        id: Uuid,
        update: &ShiftUpdate,
    ) -> impl Future<Output = StoreResult<Option<Shift>>> + Send;

    fn delete_shift(&mut self, id: Uuid) -> impl Future<Output = StoreResult<bool>> + Send;

    fn commit(self) -> impl Future<Output = StoreResult<()>> + Send;
}

pub trait NotificationStore: Clone + Send + Sync + 'static {
    fn insert_notification(
        &self,
        notification: &NewNotification,
    ) -> impl Future<Output = StoreResult<Notification>> + Send;

    /// Newest first.
    fn list_notifications(
        &self,
        recipient_id: Uuid,
        unread_only: bool,
    ) -> impl Future<Output = StoreResult<Vec<Notification>>> + Send;

    /// Returns `None` when no notification with this id belongs to the recipient.
    fn mark_notification_read(
        &self,
        id: Uuid,
        recipient_id: Uuid,
    ) -> impl Future<Output = StoreResult<Option<Notification>>> + Send;
}

pub trait AuditStore: Clone + Send + Sync + 'static {
    fn append_audit(
        &self,
        entry: &NewAuditEntry,
    ) -> impl Future<Output = StoreResult<AuditLogEntry>> + Send;

    /// Total matching rows and the requested page, newest first.
    fn query_audit(
        &self,
        filter: &AuditFilter,
    ) -> impl Future<Output = StoreResult<(i64, Vec<AuditLogEntry>)>> + Send;
}

pub trait TemplateStore: Clone + Send + Sync + 'static {
    fn template_client_exists(
        &self,
        client_id: Uuid,
    ) -> impl Future<Output = StoreResult<bool>> + Send;

    fn insert_template(
        &self,
        input: &ShiftTemplateInput,
    ) -> impl Future<Output = StoreResult<ShiftTemplate>> + Send;

    fn get_template(
        &self,
        id: Uuid,
    ) -> impl Future<Output = StoreResult<Option<ShiftTemplate>>> + Send;

    fn list_templates(
        &self,
        client_id: Option<Uuid>,
    ) -> impl Future<Output = StoreResult<Vec<ShiftTemplate>>> + Send;

    fn delete_template(&self, id: Uuid) -> impl Future<Output = StoreResult<bool>> + Send;
}

/// Everything the HTTP layer needs from one backend.
pub trait Store: ShiftStore + NotificationStore + AuditStore + TemplateStore {}

impl<T> Store for T where T: ShiftStore + NotificationStore + AuditStore + TemplateStore {}

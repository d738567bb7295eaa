use serde_json::json;
use uuid::Uuid;

use crate::database::models::{
    NewNotification, Notification, NotificationCategory, RecipientKind, Shift, ShiftEvent,
};
use crate::database::store::{NotificationStore, StoreResult};
use crate::services::realtime::RealtimeTransport;

/// A notification addressed to one staff member, plus the real-time event
/// pushed alongside it.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub recipient_id: Uuid,
    pub event: &'static str,
    pub category: NotificationCategory,
    pub title: String,
    pub message: String,
    pub payload: serde_json::Value,
}

impl Notice {
    /// Standard wording for a shift event sent to `recipient_id`.
    pub fn shift(event: &'static str, recipient_id: Uuid, shift: &Shift) -> Self {
        let (title, message) = match event {
            ShiftEvent::CREATED => (
                "New Shift Assigned",
                format!(
                    "You have a new shift from {} to {}",
                    shift.start_time.to_rfc3339(),
                    shift.end_time.to_rfc3339()
                ),
            ),
            ShiftEvent::ASSIGNED => (
                "Shift Assigned",
                format!("You have been assigned the shift {}", shift.window()),
            ),
            ShiftEvent::UNASSIGNED => (
                "Shift Unassigned",
                format!("You are no longer assigned to the shift {}", shift.window()),
            ),
            ShiftEvent::UPDATED => (
                "Shift Updated",
                "Your shift details have been updated".to_string(),
            ),
            ShiftEvent::CANCELLED => (
                "Shift Cancelled",
                format!("The shift {} assigned to you was cancelled", shift.window()),
            ),
            _ => ("Shift Notice", format!("Shift {} changed", shift.id)),
        };

        Self {
            recipient_id,
            event,
            category: NotificationCategory::Shift,
            title: title.to_string(),
            payload: json!({ "message": message, "shift": shift }),
            message,
        }
    }

    fn to_record(&self) -> NewNotification {
        NewNotification {
            title: self.title.clone(),
            message: self.message.clone(),
            category: self.category,
            recipient_id: self.recipient_id,
            recipient_kind: RecipientKind::Staff,
            payload: Some(self.payload.clone()),
        }
    }
}

/// Persists a notification, then pushes it to any live connection.
#[derive(Clone)]
pub struct Notifier<N, T> {
    store: N,
    transport: T,
}

impl<N: NotificationStore, T: RealtimeTransport> Notifier<N, T> {
    pub fn new(store: N, transport: T) -> Self {
        Self { store, transport }
    }

    /// The stored row is the record of delivery; a failed push only means
    /// the recipient was offline.
    pub async fn notify(&self, notice: &Notice) -> StoreResult<Notification> {
        let stored = self.store.insert_notification(&notice.to_record()).await?;

        let pushed = self
            .transport
            .send(notice.recipient_id, notice.event, &notice.payload)
            .await;
        if !pushed {
            log::debug!(
                "No live connection for {}; '{}' kept for later reading",
                notice.recipient_id,
                notice.event
            );
        }

        Ok(stored)
    }

    pub async fn list_for_recipient(
        &self,
        recipient_id: Uuid,
        unread_only: bool,
    ) -> StoreResult<Vec<Notification>> {
        self.store.list_notifications(recipient_id, unread_only).await
    }

    pub async fn mark_read(&self, id: Uuid, recipient_id: Uuid) -> StoreResult<Option<Notification>> {
        self.store.mark_notification_read(id, recipient_id).await
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum NotificationCategory {
        Shift => "shift",
        Document => "document",
        #[default]
        General => "general",
    }
}

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum RecipientKind {
        #[default]
        Staff => "staff",
        Client => "client",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    pub category: NotificationCategory,
    pub recipient_id: Uuid,
    pub recipient_kind: RecipientKind,
    pub read: bool,
    pub payload: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNotification {
    pub title: String,
    pub message: String,
    pub category: NotificationCategory,
    pub recipient_id: Uuid,
    pub recipient_kind: RecipientKind,
    pub payload: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationQuery {
    /// Admins may read another recipient's notifications.
    pub recipient_id: Option<Uuid>,
    #[serde(default)]
    pub unread_only: bool,
}

/// Real-time event names pushed alongside shift notifications.
#[allow(non_snake_case)]
pub mod ShiftEvent {
    pub const CREATED: &str = "newShift";
    pub const ASSIGNED: &str = "shiftAssigned";
    pub const UNASSIGNED: &str = "shiftUnassigned";
    pub const UPDATED: &str = "shiftUpdated";
    pub const CANCELLED: &str = "shiftCancelled";
}

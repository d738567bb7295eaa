use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ShiftStatus {
        #[default]
        Pending => "pending",
        Assigned => "assigned",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

impl ShiftStatus {
    /// `completed` and `cancelled` accept no further lifecycle transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ShiftStatus::Completed | ShiftStatus::Cancelled)
    }

    /// Statuses that occupy the assigned staff member's time.
    pub fn occupies_staff(&self) -> bool {
        matches!(self, ShiftStatus::Assigned | ShiftStatus::Completed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub id: Uuid,
    pub client_id: Uuid,
    pub staff_id: Option<Uuid>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: ShiftStatus,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Shift {
    /// Half-open `[start, end)` intersection test.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_time < end && start < self.end_time
    }

    pub fn window(&self) -> String {
        format!("{} - {}", self.start_time.to_rfc3339(), self.end_time.to_rfc3339())
    }

    /// The writable columns of this shift, for building an update.
    pub fn to_update(&self) -> ShiftUpdate {
        ShiftUpdate {
            client_id: self.client_id,
            staff_id: self.staff_id,
            start_time: self.start_time,
            end_time: self.end_time,
            status: self.status,
        }
    }
}

/// Row to insert; id and timestamps are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewShift {
    pub client_id: Uuid,
    pub staff_id: Option<Uuid>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: ShiftStatus,
    pub created_by: Uuid,
}

/// Full replacement of a shift's mutable columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftUpdate {
    pub client_id: Uuid,
    pub staff_id: Option<Uuid>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: ShiftStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShiftInput {
    pub client_id: Uuid,
    pub staff_id: Option<Uuid>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateShiftInput {
    pub client_id: Option<Uuid>,
    pub staff_id: Option<Uuid>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl UpdateShiftInput {
    pub fn is_empty(&self) -> bool {
        self.client_id.is_none()
            && self.staff_id.is_none()
            && self.start_time.is_none()
            && self.end_time.is_none()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftFilter {
    pub status: Option<ShiftStatus>,
    pub staff_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    /// Inclusive lower bound on `start_time`.
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `start_time`.
    pub to: Option<DateTime<Utc>>,
}

impl ShiftFilter {
    pub fn matches(&self, shift: &Shift) -> bool {
        self.status.is_none_or(|s| shift.status == s)
            && self.staff_id.is_none_or(|id| shift.staff_id == Some(id))
            && self.client_id.is_none_or(|id| shift.client_id == id)
            && self.from.is_none_or(|from| shift.start_time >= from)
            && self.to.is_none_or(|to| shift.start_time <= to)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub staff_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Shift being rescheduled, ignored when looking for clashes.
    pub exclude_shift_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityReport {
    pub staff_id: Uuid,
    pub available: bool,
    pub conflicts: Vec<Shift>,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    pub id: Uuid,
    pub admin_id: Uuid,
    pub action: String,
    pub module: String,
    pub details: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAuditEntry {
    pub admin_id: Uuid,
    pub action: String,
    pub module: String,
    pub details: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditFilter {
    /// Acting administrator.
    pub user: Option<Uuid>,
    /// Case-insensitive substring match.
    pub module: Option<String>,
    /// Case-insensitive substring match.
    pub action: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl AuditFilter {
    pub const DEFAULT_LIMIT: i64 = 10;
    pub const MAX_LIMIT: i64 = 100;

    pub fn page(&self) -> i64 {
        self.page.filter(|p| *p > 0).unwrap_or(1)
    }

    pub fn limit(&self) -> i64 {
        self.limit
            .filter(|l| *l > 0)
            .unwrap_or(Self::DEFAULT_LIMIT)
            .min(Self::MAX_LIMIT)
    }

    /// Pages past the end of the log saturate instead of overflowing.
    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.limit())
    }

    pub fn matches(&self, entry: &AuditLogEntry) -> bool {
        fn contains(haystack: &str, needle: &Option<String>) -> bool {
            needle
                .as_ref()
                .is_none_or(|n| haystack.to_lowercase().contains(&n.to_lowercase()))
        }

        self.user.is_none_or(|id| entry.admin_id == id)
            && contains(&entry.module, &self.module)
            && contains(&entry.action, &self.action)
            && self.start_date.is_none_or(|start| entry.timestamp >= start)
            && self.end_date.is_none_or(|end| entry.timestamp <= end)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditPage {
    pub total: i64,
    pub page: i64,
    pub pages: i64,
    pub data: Vec<AuditLogEntry>,
}

impl AuditPage {
    pub fn new(total: i64, filter: &AuditFilter, data: Vec<AuditLogEntry>) -> Self {
        let limit = filter.limit();
        Self {
            total,
            page: filter.page(),
            pages: (total + limit - 1) / limit,
            data,
        }
    }
}

pub const SHIFT_MODULE: &str = "Shift Management";

// Action codes written by the shift subsystem
#[allow(non_snake_case)]
pub mod AuditAction {
    pub const CREATE_SHIFT: &str = "CREATE_SHIFT";
    pub const ASSIGN_SHIFT: &str = "ASSIGN_SHIFT";
    pub const UNASSIGN_SHIFT: &str = "UNASSIGN_SHIFT";
    pub const UPDATE_SHIFT: &str = "UPDATE_SHIFT";
    pub const CANCEL_SHIFT: &str = "CANCEL_SHIFT";
    pub const DELETE_SHIFT: &str = "DELETE_SHIFT";
    pub const COMPLETE_SHIFT: &str = "COMPLETE_SHIFT";
    pub const CREATE_TEMPLATE: &str = "CREATE_TEMPLATE";
    pub const DELETE_TEMPLATE: &str = "DELETE_TEMPLATE";
}

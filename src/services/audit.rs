use uuid::Uuid;

use crate::database::models::{AuditFilter, AuditLogEntry, AuditPage, NewAuditEntry, SHIFT_MODULE};
use crate::database::store::{AuditStore, StoreResult};

/// An administrative action waiting to be written to the audit log.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditRecord {
    pub admin_id: Uuid,
    pub action: &'static str,
    pub module: &'static str,
    pub details: Option<String>,
}

impl AuditRecord {
    pub fn shift(admin_id: Uuid, action: &'static str, details: impl Into<String>) -> Self {
        Self {
            admin_id,
            action,
            module: SHIFT_MODULE,
            details: Some(details.into()),
        }
    }

    /// Appends the request's correlation id so an entry can be traced back
    /// to the access log.
    pub fn with_correlation(mut self, correlation_id: Option<&str>) -> Self {
        if let (Some(details), Some(id)) = (self.details.as_mut(), correlation_id) {
            details.push_str(&format!(" [correlation_id={id}]"));
        }
        self
    }
}

#[derive(Clone)]
pub struct AuditRecorder<A> {
    store: A,
}

impl<A: AuditStore> AuditRecorder<A> {
    pub fn new(store: A) -> Self {
        Self { store }
    }

    pub async fn record(&self, record: &AuditRecord) -> StoreResult<AuditLogEntry> {
        self.store
            .append_audit(&NewAuditEntry {
                admin_id: record.admin_id,
                action: record.action.to_string(),
                module: record.module.to_string(),
                details: record.details.clone(),
            })
            .await
    }

    pub async fn query(&self, filter: &AuditFilter) -> StoreResult<AuditPage> {
        let (total, data) = self.store.query_audit(filter).await?;
        Ok(AuditPage::new(total, filter, data))
    }
}

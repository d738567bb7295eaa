use chrono::Utc;
use sqlx::PgExecutor;

use crate::database::{
    models::{AuditFilter, AuditLogEntry, NewAuditEntry},
    utils::sql,
};

// Shared WHERE clause for the listing and count queries; binds are
// user, user, module, module, action, action, start, start, end, end.
const AUDIT_FILTER: &str = r#"
    (?::uuid IS NULL OR admin_id = ?)
    AND (?::text IS NULL OR module ILIKE '%' || ? || '%')
    AND (?::text IS NULL OR action ILIKE '%' || ? || '%')
    AND (?::timestamptz IS NULL OR timestamp >= ?)
    AND (?::timestamptz IS NULL OR timestamp <= ?)
"#;

/// Append an audit entry
pub async fn log_action<'e, E>(
    executor: E,
    entry: &NewAuditEntry,
) -> Result<AuditLogEntry, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, AuditLogEntry>(&sql(r#"
        INSERT INTO
            audit_logs (
                admin_id,
                action,
                module,
                details,
                timestamp
            )
        VALUES
            (?, ?, ?, ?, ?)
        RETURNING
            id,
            admin_id,
            action,
            module,
            details,
            timestamp
    "#))
    .bind(entry.admin_id)
    .bind(&entry.action)
    .bind(&entry.module)
    .bind(&entry.details)
    .bind(Utc::now())
    .fetch_one(executor)
    .await
}

pub async fn count<'e, E>(executor: E, filter: &AuditFilter) -> Result<i64, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_scalar::<_, i64>(&sql(&format!(
        "SELECT COUNT(*) FROM audit_logs WHERE {AUDIT_FILTER}"
    )))
    .bind(filter.user)
    .bind(filter.user)
    .bind(&filter.module)
    .bind(&filter.module)
    .bind(&filter.action)
    .bind(&filter.action)
    .bind(filter.start_date)
    .bind(filter.start_date)
    .bind(filter.end_date)
    .bind(filter.end_date)
    .fetch_one(executor)
    .await
}

pub async fn find_page<'e, E>(
    executor: E,
    filter: &AuditFilter,
) -> Result<Vec<AuditLogEntry>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, AuditLogEntry>(&sql(&format!(
        r#"
            SELECT
                id,
                admin_id,
                action,
                module,
                details,
                timestamp
            FROM
                audit_logs
            WHERE
                {AUDIT_FILTER}
            ORDER BY
                timestamp DESC
            LIMIT ? OFFSET ?
        "#
    )))
    .bind(filter.user)
    .bind(filter.user)
    .bind(&filter.module)
    .bind(&filter.module)
    .bind(&filter.action)
    .bind(&filter.action)
    .bind(filter.start_date)
    .bind(filter.start_date)
    .bind(filter.end_date)
    .bind(filter.end_date)
    .bind(filter.limit())
    .bind(filter.offset())
    .fetch_all(executor)
    .await
}

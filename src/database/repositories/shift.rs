use chrono::{DateTime, Utc};
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::database::{
    models::{NewShift, Shift, ShiftFilter, ShiftStatus, ShiftUpdate},
    utils::sql,
};

const SHIFT_COLUMNS: &str = r#"
    id,
    client_id,
    staff_id,
    start_time,
    end_time,
    status,
    created_by,
    created_at,
    updated_at
"#;

/// Insert a new shift
pub async fn create_shift<'e, E>(executor: E, input: &NewShift) -> Result<Shift, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let now = Utc::now();

    sqlx::query_as::<_, Shift>(&sql(&format!(
        r#"
            INSERT INTO
                shifts (
                    client_id,
                    staff_id,
                    start_time,
                    end_time,
                    status,
                    created_by,
                    created_at,
                    updated_at
                )
            VALUES
                (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING
                {SHIFT_COLUMNS}
        "#
    )))
    .bind(input.client_id)
    .bind(input.staff_id)
    .bind(input.start_time)
    .bind(input.end_time)
    .bind(input.status)
    .bind(input.created_by)
    .bind(now)
    .bind(now)
    .fetch_one(executor)
    .await
}

pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Shift>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Shift>(&sql(&format!(
        "SELECT {SHIFT_COLUMNS} FROM shifts WHERE id = ?"
    )))
    .bind(id)
    .fetch_optional(executor)
    .await
}

/// Same as [`find_by_id`] but takes a row lock for the rest of the transaction
pub async fn find_by_id_for_update<'e, E>(
    executor: E,
    id: Uuid,
) -> Result<Option<Shift>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Shift>(&sql(&format!(
        "SELECT {SHIFT_COLUMNS} FROM shifts WHERE id = ? FOR UPDATE"
    )))
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub async fn find_by_filter<'e, E>(
    executor: E,
    filter: &ShiftFilter,
) -> Result<Vec<Shift>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Shift>(&sql(&format!(
        r#"
            SELECT
                {SHIFT_COLUMNS}
            FROM
                shifts
            WHERE
                (?::text IS NULL OR status = ?)
                AND (?::uuid IS NULL OR staff_id = ?)
                AND (?::uuid IS NULL OR client_id = ?)
                AND (?::timestamptz IS NULL OR start_time >= ?)
                AND (?::timestamptz IS NULL OR start_time <= ?)
            ORDER BY
                start_time ASC
        "#
    )))
    .bind(filter.status)
    .bind(filter.status)
    .bind(filter.staff_id)
    .bind(filter.staff_id)
    .bind(filter.client_id)
    .bind(filter.client_id)
    .bind(filter.from)
    .bind(filter.from)
    .bind(filter.to)
    .bind(filter.to)
    .fetch_all(executor)
    .await
}

pub async fn find_by_staff<'e, E>(executor: E, staff_id: Uuid) -> Result<Vec<Shift>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Shift>(&sql(&format!(
        "SELECT {SHIFT_COLUMNS} FROM shifts WHERE staff_id = ? ORDER BY start_time DESC"
    )))
    .bind(staff_id)
    .fetch_all(executor)
    .await
}

/// Shifts occupying `staff_id` that intersect `[start, end)`
pub async fn find_overlapping<'e, E>(
    executor: E,
    staff_id: Uuid,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    exclude_shift_id: Option<Uuid>,
) -> Result<Vec<Shift>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Shift>(&sql(&format!(
        r#"
            SELECT
                {SHIFT_COLUMNS}
            FROM
                shifts
            WHERE
                staff_id = ?
                AND status IN (?, ?)
                AND start_time < ?
                AND ? < end_time
                AND (?::uuid IS NULL OR id <> ?)
            ORDER BY
                start_time ASC
        "#
    )))
    .bind(staff_id)
    .bind(ShiftStatus::Assigned)
    .bind(ShiftStatus::Completed)
    .bind(end)
    .bind(start)
    .bind(exclude_shift_id)
    .bind(exclude_shift_id)
    .fetch_all(executor)
    .await
}

pub async fn update_shift<'e, E>(
    executor: E,
    id: Uuid,
    update: &ShiftUpdate,
) -> Result<Option<Shift>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Shift>(&sql(&format!(
        r#"
            UPDATE
                shifts
            SET
                client_id = ?,
                staff_id = ?,
                start_time = ?,
                end_time = ?,
                status = ?,
                updated_at = ?
            WHERE
                id = ?
            RETURNING
                {SHIFT_COLUMNS}
        "#
    )))
    .bind(update.client_id)
    .bind(update.staff_id)
    .bind(update.start_time)
    .bind(update.end_time)
    .bind(update.status)
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub async fn delete_shift<'e, E>(executor: E, id: Uuid) -> Result<bool, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query(&sql("DELETE FROM shifts WHERE id = ?"))
        .bind(id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Transaction-scoped advisory lock on one staff member's schedule
pub async fn lock_staff<'e, E>(executor: E, staff_id: Uuid) -> Result<(), sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query(&sql("SELECT pg_advisory_xact_lock(hashtextextended(?::text, 0))"))
        .bind(staff_id)
        .execute(executor)
        .await?;

    Ok(())
}

pub async fn client_exists<'e, E>(executor: E, client_id: Uuid) -> Result<bool, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_scalar::<_, bool>(&sql("SELECT EXISTS (SELECT 1 FROM clients WHERE id = ?)"))
        .bind(client_id)
        .fetch_one(executor)
        .await
}

pub async fn staff_exists<'e, E>(executor: E, staff_id: Uuid) -> Result<bool, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_scalar::<_, bool>(&sql("SELECT EXISTS (SELECT 1 FROM staff WHERE id = ?)"))
        .bind(staff_id)
        .fetch_one(executor)
        .await
}

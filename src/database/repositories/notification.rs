use chrono::Utc;
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::database::{
    models::{NewNotification, Notification},
    utils::sql,
};

/// Persist a notification for its recipient
pub async fn create_notification<'e, E>(
    executor: E,
    input: &NewNotification,
) -> Result<Notification, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Notification>(&sql(r#"
        INSERT INTO
            notifications (
                title,
                message,
                category,
                recipient_id,
                recipient_kind,
                read,
                payload,
                created_at
            )
        VALUES
            (?, ?, ?, ?, ?, FALSE, ?, ?)
        RETURNING
            id,
            title,
            message,
            category,
            recipient_id,
            recipient_kind,
            read,
            payload,
            created_at
    "#))
    .bind(&input.title)
    .bind(&input.message)
    .bind(input.category)
    .bind(input.recipient_id)
    .bind(input.recipient_kind)
    .bind(&input.payload)
    .bind(Utc::now())
    .fetch_one(executor)
    .await
}

pub async fn find_by_recipient<'e, E>(
    executor: E,
    recipient_id: Uuid,
    unread_only: bool,
) -> Result<Vec<Notification>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Notification>(&sql(r#"
        SELECT
            id,
            title,
            message,
            category,
            recipient_id,
            recipient_kind,
            read,
            payload,
            created_at
        FROM
            notifications
        WHERE
            recipient_id = ?
            AND (NOT ? OR read = FALSE)
        ORDER BY
            created_at DESC
    "#))
    .bind(recipient_id)
    .bind(unread_only)
    .fetch_all(executor)
    .await
}

/// Mark read; scoped to the recipient so one user cannot touch another's inbox
pub async fn mark_read<'e, E>(
    executor: E,
    id: Uuid,
    recipient_id: Uuid,
) -> Result<Option<Notification>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Notification>(&sql(r#"
        UPDATE
            notifications
        SET
            read = TRUE
        WHERE
            id = ?
            AND recipient_id = ?
        RETURNING
            id,
            title,
            message,
            category,
            recipient_id,
            recipient_kind,
            read,
            payload,
            created_at
    "#))
    .bind(id)
    .bind(recipient_id)
    .fetch_optional(executor)
    .await
}

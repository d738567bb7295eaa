use chrono::Utc;
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::database::{
    models::{ShiftTemplate, ShiftTemplateInput},
    utils::sql,
};

const TEMPLATE_COLUMNS: &str = r#"
    id,
    client_id,
    start_time,
    end_time,
    day_of_week,
    recurrence,
    status,
    created_at,
    updated_at
"#;

pub async fn create_template<'e, E>(
    executor: E,
    input: &ShiftTemplateInput,
) -> Result<ShiftTemplate, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let now = Utc::now();

    sqlx::query_as::<_, ShiftTemplate>(&sql(&format!(
        r#"
            INSERT INTO
                shift_templates (
                    client_id,
                    start_time,
                    end_time,
                    day_of_week,
                    recurrence,
                    status,
                    created_at,
                    updated_at
                )
            VALUES
                (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING
                {TEMPLATE_COLUMNS}
        "#
    )))
    .bind(input.client_id)
    .bind(input.start_time)
    .bind(input.end_time)
    .bind(input.day_of_week)
    .bind(input.recurrence)
    .bind(input.status)
    .bind(now)
    .bind(now)
    .fetch_one(executor)
    .await
}

pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<ShiftTemplate>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, ShiftTemplate>(&sql(&format!(
        "SELECT {TEMPLATE_COLUMNS} FROM shift_templates WHERE id = ?"
    )))
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub async fn find_all<'e, E>(
    executor: E,
    client_id: Option<Uuid>,
) -> Result<Vec<ShiftTemplate>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, ShiftTemplate>(&sql(&format!(
        r#"
            SELECT
                {TEMPLATE_COLUMNS}
            FROM
                shift_templates
            WHERE
                ?::uuid IS NULL OR client_id = ?
            ORDER BY
                created_at DESC
        "#
    )))
    .bind(client_id)
    .bind(client_id)
    .fetch_all(executor)
    .await
}

pub async fn delete_template<'e, E>(executor: E, id: Uuid) -> Result<bool, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query(&sql("DELETE FROM shift_templates WHERE id = ?"))
        .bind(id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

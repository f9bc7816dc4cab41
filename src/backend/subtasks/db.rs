//! Subtask database operations

use sqlx::PgPool;
use uuid::Uuid;

use crate::shared::models::Subtask;

pub async fn create_subtask(pool: &PgPool, card_id: Uuid, title: &str) -> Result<Subtask, sqlx::Error> {
    sqlx::query_as::<_, Subtask>(
        r#"
        INSERT INTO subtasks (id, card_id, title, is_done)
        VALUES ($1, $2, $3, FALSE)
        RETURNING id, card_id, title, is_done, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(card_id)
    .bind(title)
    .fetch_one(pool)
    .await
}

pub async fn set_done(pool: &PgPool, id: Uuid, is_done: bool) -> Result<Option<Subtask>, sqlx::Error> {
    sqlx::query_as::<_, Subtask>(
        r#"
        UPDATE subtasks SET is_done = $1
        WHERE id = $2
        RETURNING id, card_id, title, is_done, created_at
        "#,
    )
    .bind(is_done)
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn delete_subtask(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM subtasks WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() == 1)
}

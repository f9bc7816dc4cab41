//! Board database operations

use sqlx::PgPool;
use uuid::Uuid;

use crate::shared::models::Board;

const BOARD_COLUMNS: &str = "id, workspace_id, title, description, position, last_position, created_at";

pub async fn get_board(pool: &PgPool, id: Uuid) -> Result<Option<Board>, sqlx::Error> {
    let query = format!("SELECT {} FROM boards WHERE id = $1", BOARD_COLUMNS);
    sqlx::query_as::<_, Board>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Update title and description; positions are left alone
pub async fn update_details(
    pool: &PgPool,
    id: Uuid,
    title: Option<&str>,
    description: Option<&str>,
) -> Result<Option<Board>, sqlx::Error> {
    let query = format!(
        r#"
        UPDATE boards
        SET title = COALESCE($1, title),
            description = COALESCE($2, description)
        WHERE id = $3
        RETURNING {}
        "#,
        BOARD_COLUMNS
    );
    sqlx::query_as::<_, Board>(&query)
        .bind(title)
        .bind(description)
        .bind(id)
        .fetch_optional(pool)
        .await
}

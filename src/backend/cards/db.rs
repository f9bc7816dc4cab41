//! Card database operations

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::shared::models::Card;

const CARD_COLUMNS: &str =
    "id, board_id, title, description, color, image, deadline, position, created_at";

pub async fn get_card(pool: &PgPool, id: Uuid) -> Result<Option<Card>, sqlx::Error> {
    let query = format!("SELECT {} FROM cards WHERE id = $1", CARD_COLUMNS);
    sqlx::query_as::<_, Card>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Cards of a board in position order
pub async fn cards_in_order(pool: &PgPool, board_id: Uuid) -> Result<Vec<Card>, sqlx::Error> {
    let query = format!(
        "SELECT {} FROM cards WHERE board_id = $1 ORDER BY position ASC",
        CARD_COLUMNS
    );
    sqlx::query_as::<_, Card>(&query)
        .bind(board_id)
        .fetch_all(pool)
        .await
}

/// Fields a card edit may change
#[derive(Debug, Default)]
pub struct CardChanges<'a> {
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub color: Option<&'a str>,
    pub deadline: Option<DateTime<Utc>>,
}

pub async fn update_details(
    pool: &PgPool,
    id: Uuid,
    changes: CardChanges<'_>,
) -> Result<Option<Card>, sqlx::Error> {
    let query = format!(
        r#"
        UPDATE cards
        SET title = COALESCE($1, title),
            description = COALESCE($2, description),
            color = COALESCE($3, color),
            deadline = COALESCE($4, deadline)
        WHERE id = $5
        RETURNING {}
        "#,
        CARD_COLUMNS
    );
    sqlx::query_as::<_, Card>(&query)
        .bind(changes.title)
        .bind(changes.description)
        .bind(changes.color)
        .bind(changes.deadline)
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Workspace a board belongs to
pub async fn board_workspace(pool: &PgPool, board_id: Uuid) -> Result<Option<Uuid>, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>("SELECT workspace_id FROM boards WHERE id = $1")
        .bind(board_id)
        .fetch_optional(pool)
        .await
}

/// Assign `user_id` to a card; `false` when already assigned
pub async fn add_assignee(pool: &PgPool, card_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO card_members (card_id, user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
    )
    .bind(card_id)
    .bind(user_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() == 1)
}

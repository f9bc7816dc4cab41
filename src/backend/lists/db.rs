//! List database operations

use sqlx::PgPool;
use uuid::Uuid;

use crate::shared::models::CardList;

pub async fn create_list(pool: &PgPool, card_id: Uuid, title: &str) -> Result<CardList, sqlx::Error> {
    sqlx::query_as::<_, CardList>(
        r#"
        INSERT INTO lists (id, card_id, title)
        VALUES ($1, $2, $3)
        RETURNING id, card_id, title, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(card_id)
    .bind(title)
    .fetch_one(pool)
    .await
}

pub async fn get_list(pool: &PgPool, id: Uuid) -> Result<Option<CardList>, sqlx::Error> {
    sqlx::query_as::<_, CardList>("SELECT id, card_id, title, created_at FROM lists WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Lists of a card, oldest first
pub async fn lists_for_card(pool: &PgPool, card_id: Uuid) -> Result<Vec<CardList>, sqlx::Error> {
    sqlx::query_as::<_, CardList>(
        r#"
        SELECT id, card_id, title, created_at
        FROM lists
        WHERE card_id = $1
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(card_id)
    .fetch_all(pool)
    .await
}

pub async fn rename_list(pool: &PgPool, id: Uuid, title: &str) -> Result<Option<CardList>, sqlx::Error> {
    sqlx::query_as::<_, CardList>(
        "UPDATE lists SET title = $1 WHERE id = $2 RETURNING id, card_id, title, created_at",
    )
    .bind(title)
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn delete_list(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM lists WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() == 1)
}

/**
 * User Lookups
 *
 * Users are provisioned by the authentication service. These lookups
 * confirm a token's subject still exists and resolve members by id or
 * email. Profile edits and search live in `backend::users`.
 */

use sqlx::PgPool;
use uuid::Uuid;

use crate::shared::models::UserSummary;

/// Get user by ID
pub async fn get_user_by_id(pool: &PgPool, id: Uuid) -> Result<Option<UserSummary>, sqlx::Error> {
    sqlx::query_as::<_, UserSummary>(
        r#"
        SELECT id, name, email, profile
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Get user by email (case-insensitive)
pub async fn get_user_by_email(
    pool: &PgPool,
    email: &str,
) -> Result<Option<UserSummary>, sqlx::Error> {
    sqlx::query_as::<_, UserSummary>(
        r#"
        SELECT id, name, email, profile
        FROM users
        WHERE LOWER(email) = LOWER($1)
        "#,
    )
    .bind(email.trim())
    .fetch_optional(pool)
    .await
}

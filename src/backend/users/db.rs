//! User database operations

use sqlx::PgPool;
use uuid::Uuid;

use crate::shared::models::UserSummary;

/// Set `name` and/or `profile`; `None` leaves a field untouched
///
/// Returns `None` when no user has `id`.
pub async fn update_profile(
    pool: &PgPool,
    id: Uuid,
    name: Option<&str>,
    profile: Option<&str>,
) -> Result<Option<UserSummary>, sqlx::Error> {
    sqlx::query_as::<_, UserSummary>(
        r#"
        UPDATE users
        SET name = COALESCE($1, name),
            profile = COALESCE($2, profile)
        WHERE id = $3
        RETURNING id, name, email, profile
        "#,
    )
    .bind(name)
    .bind(profile)
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Users whose name or email contains `query`, ignoring case
pub async fn search(pool: &PgPool, query: &str) -> Result<Vec<UserSummary>, sqlx::Error> {
    sqlx::query_as::<_, UserSummary>(
        r#"
        SELECT id, name, email, profile
        FROM users
        WHERE name ILIKE $1 ESCAPE '\' OR email ILIKE $1 ESCAPE '\'
        ORDER BY name ASC
        LIMIT $2
        "#,
    )
    .bind(contains_pattern(query))
    .bind(SEARCH_LIMIT)
    .fetch_all(pool)
    .await
}

/// Most users a single search returns
pub const SEARCH_LIMIT: i64 = 50;

/// `LIKE` pattern matching `query` anywhere, with wildcards in `query` taken literally
pub fn contains_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

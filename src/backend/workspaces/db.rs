//! Workspace database operations
//!
//! Workspace and membership rows. Board rows under a workspace are written
//! through positioning batches, including the default boards seeded at
//! creation.

use sqlx::PgPool;
use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::backend::positions::apply_in;
use crate::positioning::store::{Batch, ItemAttributes, NewBoard};
use crate::shared::models::{Board, UserSummary, Workspace, WorkspaceMember};
use crate::shared::ordering::OrderedParent;

/// Create a workspace, enroll its admin and append `boards` in order
///
/// The workspace row, the membership and every board commit in one
/// transaction, so a failure leaves no trace of the workspace.
pub async fn create_workspace(
    pool: &PgPool,
    title: &str,
    admin_id: Uuid,
    boards: &[&str],
) -> Result<Workspace, BackendError> {
    let mut tx = pool.begin().await?;

    let mut workspace = sqlx::query_as::<_, Workspace>(
        r#"
        INSERT INTO workspaces (id, title, admin_id, last_position)
        VALUES ($1, $2, $3, 0)
        RETURNING id, title, admin_id, last_position, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(title)
    .bind(admin_id)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("INSERT INTO workspace_members (id, workspace_id, user_id) VALUES ($1, $2, $3)")
        .bind(Uuid::new_v4())
        .bind(workspace.id)
        .bind(admin_id)
        .execute(&mut *tx)
        .await?;

    if !boards.is_empty() {
        let parent = OrderedParent {
            id: workspace.id,
            last_position: workspace.last_position,
        };
        let attributes = boards
            .iter()
            .map(|title| {
                ItemAttributes::Board(NewBoard {
                    title: title.to_string(),
                    description: None,
                })
            })
            .collect();
        let (batch, placed) = Batch::append_all(&parent, attributes)?;
        apply_in(&mut tx, &batch).await?;
        workspace.last_position += placed.len() as i32;
    }

    tx.commit().await?;
    Ok(workspace)
}

/// Workspaces `user_id` is a member of, newest first
pub async fn list_for_member(pool: &PgPool, user_id: Uuid) -> Result<Vec<Workspace>, sqlx::Error> {
    sqlx::query_as::<_, Workspace>(
        r#"
        SELECT w.id, w.title, w.admin_id, w.last_position, w.created_at
        FROM workspaces w
        JOIN workspace_members m ON m.workspace_id = w.id
        WHERE m.user_id = $1
        ORDER BY w.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn get_workspace(pool: &PgPool, id: Uuid) -> Result<Option<Workspace>, sqlx::Error> {
    sqlx::query_as::<_, Workspace>(
        "SELECT id, title, admin_id, last_position, created_at FROM workspaces WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Boards of a workspace in position order
pub async fn boards_in_order(pool: &PgPool, workspace_id: Uuid) -> Result<Vec<Board>, sqlx::Error> {
    sqlx::query_as::<_, Board>(
        r#"
        SELECT id, workspace_id, title, description, position, last_position, created_at
        FROM boards
        WHERE workspace_id = $1
        ORDER BY position ASC
        "#,
    )
    .bind(workspace_id)
    .fetch_all(pool)
    .await
}

pub async fn rename_workspace(
    pool: &PgPool,
    id: Uuid,
    title: &str,
) -> Result<Option<Workspace>, sqlx::Error> {
    sqlx::query_as::<_, Workspace>(
        r#"
        UPDATE workspaces SET title = $1
        WHERE id = $2
        RETURNING id, title, admin_id, last_position, created_at
        "#,
    )
    .bind(title)
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Delete a workspace; boards, cards and memberships cascade
pub async fn delete_workspace(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM workspaces WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() == 1)
}

/// Enroll `user_id`; `None` when already a member
pub async fn add_member(
    pool: &PgPool,
    workspace_id: Uuid,
    user_id: Uuid,
) -> Result<Option<WorkspaceMember>, sqlx::Error> {
    sqlx::query_as::<_, WorkspaceMember>(
        r#"
        INSERT INTO workspace_members (id, workspace_id, user_id)
        VALUES ($1, $2, $3)
        ON CONFLICT (workspace_id, user_id) DO NOTHING
        RETURNING id, workspace_id, user_id, joined_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(workspace_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Remove `user_id`; `None` when it was not a member
pub async fn remove_member(
    pool: &PgPool,
    workspace_id: Uuid,
    user_id: Uuid,
) -> Result<Option<WorkspaceMember>, sqlx::Error> {
    sqlx::query_as::<_, WorkspaceMember>(
        r#"
        DELETE FROM workspace_members
        WHERE workspace_id = $1 AND user_id = $2
        RETURNING id, workspace_id, user_id, joined_at
        "#,
    )
    .bind(workspace_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub async fn list_members(pool: &PgPool, workspace_id: Uuid) -> Result<Vec<UserSummary>, sqlx::Error> {
    sqlx::query_as::<_, UserSummary>(
        r#"
        SELECT u.id, u.name, u.email, u.profile
        FROM workspace_members m
        JOIN users u ON u.id = m.user_id
        WHERE m.workspace_id = $1
        ORDER BY m.joined_at ASC
        "#,
    )
    .bind(workspace_id)
    .fetch_all(pool)
    .await
}

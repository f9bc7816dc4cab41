/**
 * Access Control
 *
 * The authorization collaborator handlers consult before mutating anything.
 * The positioning engine never sees identities: by the time it runs, the
 * caller has already passed `Authorizer::authorize`.
 *
 * # Rules
 *
 * | Resource  | View             | Edit             | Administer      |
 * |-----------|------------------|------------------|-----------------|
 * | Workspace | member           | member           | workspace admin |
 * | Board     | workspace member | workspace member | workspace admin |
 * | Card      | workspace member | card assignee    | workspace admin |
 * | List      | workspace member | workspace member | workspace admin |
 * | Subtask   | card assignee    | card assignee    | workspace admin |
 */

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use thiserror::Error;
use uuid::Uuid;

/// Something a user may be allowed to touch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Workspace(Uuid),
    Board(Uuid),
    Card(Uuid),
    List(Uuid),
    Subtask(Uuid),
}

impl Resource {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Workspace(_) => "workspace",
            Self::Board(_) => "board",
            Self::Card(_) => "card",
            Self::List(_) => "list",
            Self::Subtask(_) => "subtask",
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            Self::Workspace(id)
            | Self::Board(id)
            | Self::Card(id)
            | Self::List(id)
            | Self::Subtask(id) => *id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    View,
    Edit,
    Administer,
}

/// What the actor must be for an action to pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    WorkspaceMember,
    CardAssignee,
    WorkspaceAdmin,
}

/// Authorization failures
#[derive(Debug, Error)]
pub enum AccessError {
    #[error("access denied: {reason}")]
    Denied { reason: String },

    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: Uuid },

    #[error("authorization lookup failed: {0}")]
    Database(#[from] sqlx::Error),
}

impl AccessError {
    pub fn denied(reason: impl Into<String>) -> Self {
        Self::Denied {
            reason: reason.into(),
        }
    }
}

/// Facts about the actor's relationship to a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Standing {
    pub is_admin: bool,
    pub is_member: bool,
    pub is_assignee: bool,
}

/// Which standing `action` on `resource` requires
pub fn requirement(resource: Resource, action: Action) -> Requirement {
    match (resource, action) {
        (_, Action::Administer) => Requirement::WorkspaceAdmin,
        (Resource::Card(_), Action::Edit) => Requirement::CardAssignee,
        (Resource::Subtask(_), _) => Requirement::CardAssignee,
        _ => Requirement::WorkspaceMember,
    }
}

/// Pure decision from a requirement and the actor's standing
pub fn decide(resource: Resource, required: Requirement, standing: Standing) -> Result<(), AccessError> {
    let allowed = match required {
        Requirement::WorkspaceMember => standing.is_member || standing.is_admin,
        Requirement::CardAssignee => standing.is_assignee,
        Requirement::WorkspaceAdmin => standing.is_admin,
    };
    if allowed {
        return Ok(());
    }

    let reason = match required {
        Requirement::WorkspaceMember => format!("not a member of this {}'s workspace", resource.kind()),
        Requirement::CardAssignee => format!("not assigned to this {}'s card", resource.kind()),
        Requirement::WorkspaceAdmin => format!("only the workspace admin may administer this {}", resource.kind()),
    };
    Err(AccessError::denied(reason))
}

/// Capability check performed by handlers before any mutation
#[async_trait]
pub trait Authorizer: Send + Sync {
    async fn authorize(&self, actor: Uuid, resource: Resource, action: Action) -> Result<(), AccessError>;
}

/// Authorizer backed by the membership tables
#[derive(Debug, Clone)]
pub struct PgAuthorizer {
    pool: PgPool,
}

impl PgAuthorizer {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Resolve the workspace (and card, where there is one) owning `resource`
    async fn owners(&self, resource: Resource) -> Result<(Uuid, Uuid, Option<Uuid>), AccessError> {
        let query = match resource {
            Resource::Workspace(_) => {
                r#"
                SELECT w.id AS workspace_id, w.admin_id, NULL::uuid AS card_id
                FROM workspaces w
                WHERE w.id = $1
                "#
            }
            Resource::Board(_) => {
                r#"
                SELECT w.id AS workspace_id, w.admin_id, NULL::uuid AS card_id
                FROM boards b
                JOIN workspaces w ON w.id = b.workspace_id
                WHERE b.id = $1
                "#
            }
            Resource::Card(_) => {
                r#"
                SELECT w.id AS workspace_id, w.admin_id, c.id AS card_id
                FROM cards c
                JOIN boards b ON b.id = c.board_id
                JOIN workspaces w ON w.id = b.workspace_id
                WHERE c.id = $1
                "#
            }
            Resource::List(_) => {
                r#"
                SELECT w.id AS workspace_id, w.admin_id, c.id AS card_id
                FROM lists l
                JOIN cards c ON c.id = l.card_id
                JOIN boards b ON b.id = c.board_id
                JOIN workspaces w ON w.id = b.workspace_id
                WHERE l.id = $1
                "#
            }
            Resource::Subtask(_) => {
                r#"
                SELECT w.id AS workspace_id, w.admin_id, c.id AS card_id
                FROM subtasks s
                JOIN cards c ON c.id = s.card_id
                JOIN boards b ON b.id = c.board_id
                JOIN workspaces w ON w.id = b.workspace_id
                WHERE s.id = $1
                "#
            }
        };

        let row = sqlx::query(query)
            .bind(resource.id())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AccessError::NotFound {
                kind: resource.kind(),
                id: resource.id(),
            })?;

        Ok((
            row.try_get("workspace_id")?,
            row.try_get("admin_id")?,
            row.try_get("card_id")?,
        ))
    }
}

#[async_trait]
impl Authorizer for PgAuthorizer {
    async fn authorize(&self, actor: Uuid, resource: Resource, action: Action) -> Result<(), AccessError> {
        let (workspace_id, admin_id, card_id) = self.owners(resource).await?;
        let required = requirement(resource, action);

        let mut standing = Standing {
            is_admin: admin_id == actor,
            ..Standing::default()
        };

        match required {
            Requirement::WorkspaceAdmin => {}
            Requirement::WorkspaceMember => {
                standing.is_member = sqlx::query_scalar::<_, bool>(
                    "SELECT EXISTS(SELECT 1 FROM workspace_members WHERE workspace_id = $1 AND user_id = $2)",
                )
                .bind(workspace_id)
                .bind(actor)
                .fetch_one(&self.pool)
                .await?;
            }
            Requirement::CardAssignee => {
                if let Some(card_id) = card_id {
                    standing.is_assignee = sqlx::query_scalar::<_, bool>(
                        "SELECT EXISTS(SELECT 1 FROM card_members WHERE card_id = $1 AND user_id = $2)",
                    )
                    .bind(card_id)
                    .bind(actor)
                    .fetch_one(&self.pool)
                    .await?;
                }
            }
        }

        decide(resource, required, standing).map_err(|e| {
            tracing::warn!(
                "Denied {:?} on {} {} for user {}",
                action,
                resource.kind(),
                resource.id(),
                actor
            );
            e
        })
    }
}

//! Workspace HTTP Handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::db;
use crate::backend::auth::access::{Action, Authorizer, Resource};
use crate::backend::auth::users::get_user_by_id;
use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::models::{
    validate_title, CreateWorkspaceRequest, MessageResponse, UpdateWorkspaceRequest, UserSummary,
    Workspace, WorkspaceDetail, WorkspaceMember, WorkspaceMemberRequest,
};

/// Boards every new workspace starts with, in position order
pub const DEFAULT_BOARDS: [&str; 3] = ["ToDo", "Ongoing", "Finished"];

/// Create a workspace owned by the caller, seeded with the default boards
pub async fn create_workspace(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<CreateWorkspaceRequest>,
) -> Result<(StatusCode, Json<WorkspaceDetail>), BackendError> {
    let pool = state.pool()?;
    let title = validate_title("title", &request.title)?;

    let workspace = db::create_workspace(pool, &title, user.user_id, &DEFAULT_BOARDS).await?;

    tracing::info!("User {} created workspace {}", user.user_id, workspace.id);
    let detail = load_detail(&state, workspace.id).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// Workspaces the caller belongs to
pub async fn list_workspaces(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<Workspace>>, BackendError> {
    let workspaces = db::list_for_member(state.pool()?, user.user_id).await?;
    Ok(Json(workspaces))
}

/// One workspace with its members and its boards in position order
pub async fn get_workspace(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<WorkspaceDetail>, BackendError> {
    state
        .authorizer()?
        .authorize(user.user_id, Resource::Workspace(id), Action::View)
        .await?;

    Ok(Json(load_detail(&state, id).await?))
}

pub async fn rename_workspace(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateWorkspaceRequest>,
) -> Result<Json<Workspace>, BackendError> {
    state
        .authorizer()?
        .authorize(user.user_id, Resource::Workspace(id), Action::Administer)
        .await?;
    let title = validate_title("title", &request.title)?;

    let workspace = db::rename_workspace(state.pool()?, id, &title)
        .await?
        .ok_or_else(|| BackendError::not_found("workspace", id))?;
    Ok(Json(workspace))
}

pub async fn delete_workspace(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, BackendError> {
    state
        .authorizer()?
        .authorize(user.user_id, Resource::Workspace(id), Action::Administer)
        .await?;

    if !db::delete_workspace(state.pool()?, id).await? {
        return Err(BackendError::not_found("workspace", id));
    }
    tracing::info!("User {} deleted workspace {}", user.user_id, id);
    Ok(Json(MessageResponse::success()))
}

pub async fn add_member(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<WorkspaceMemberRequest>,
) -> Result<(StatusCode, Json<WorkspaceMember>), BackendError> {
    let pool = state.pool()?;
    state
        .authorizer()?
        .authorize(user.user_id, Resource::Workspace(request.workspace_id), Action::Edit)
        .await?;

    get_user_by_id(pool, request.member_id)
        .await?
        .ok_or_else(|| BackendError::not_found("user", request.member_id))?;

    let member = db::add_member(pool, request.workspace_id, request.member_id)
        .await?
        .ok_or_else(|| BackendError::handler(StatusCode::CONFLICT, "User is already a member"))?;

    tracing::info!(
        "User {} added {} to workspace {}",
        user.user_id,
        request.member_id,
        request.workspace_id
    );
    Ok((StatusCode::CREATED, Json(member)))
}

pub async fn remove_member(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<WorkspaceMemberRequest>,
) -> Result<Json<WorkspaceMember>, BackendError> {
    let pool = state.pool()?;
    state
        .authorizer()?
        .authorize(user.user_id, Resource::Workspace(request.workspace_id), Action::Edit)
        .await?;

    let workspace = db::get_workspace(pool, request.workspace_id)
        .await?
        .ok_or_else(|| BackendError::not_found("workspace", request.workspace_id))?;
    if workspace.admin_id == request.member_id {
        return Err(BackendError::handler(
            StatusCode::BAD_REQUEST,
            "The workspace admin cannot be removed",
        ));
    }

    let member = db::remove_member(pool, request.workspace_id, request.member_id)
        .await?
        .ok_or_else(|| BackendError::not_found("workspace member", request.member_id))?;

    tracing::info!(
        "User {} removed {} from workspace {}",
        user.user_id,
        request.member_id,
        request.workspace_id
    );
    Ok(Json(member))
}

pub async fn get_workspace_members(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(workspace_id): Path<Uuid>,
) -> Result<Json<Vec<UserSummary>>, BackendError> {
    state
        .authorizer()?
        .authorize(user.user_id, Resource::Workspace(workspace_id), Action::View)
        .await?;

    Ok(Json(db::list_members(state.pool()?, workspace_id).await?))
}

async fn load_detail(state: &AppState, id: Uuid) -> Result<WorkspaceDetail, BackendError> {
    let pool = state.pool()?;
    let workspace = db::get_workspace(pool, id)
        .await?
        .ok_or_else(|| BackendError::not_found("workspace", id))?;
    let members = db::list_members(pool, id).await?;
    let boards = db::boards_in_order(pool, id).await?;
    Ok(WorkspaceDetail {
        workspace,
        members,
        boards,
    })
}

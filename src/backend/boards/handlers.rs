//! Board HTTP Handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::db;
use crate::backend::auth::access::{Action, Authorizer, Resource};
use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::backend::workspaces::db::boards_in_order;
use crate::positioning::store::{ItemAttributes, NewBoard};
use crate::shared::models::{
    validate_title, Board, ChangePositionRequest, CreateBoardRequest, PositionResponse,
    UpdateBoardRequest,
};
use crate::shared::ordering::Collection;

/// Append a board to the end of a workspace
pub async fn create_board(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<CreateBoardRequest>,
) -> Result<(StatusCode, Json<Board>), BackendError> {
    state
        .authorizer()?
        .authorize(user.user_id, Resource::Workspace(request.workspace_id), Action::Edit)
        .await?;
    let title = validate_title("title", &request.title)?;

    let item = state
        .positions()?
        .insert_at_end(
            request.workspace_id,
            ItemAttributes::Board(NewBoard {
                title,
                description: request.description,
            }),
        )
        .await?;

    let board = db::get_board(state.pool()?, item.id)
        .await?
        .ok_or_else(|| BackendError::not_found("board", item.id))?;
    Ok((StatusCode::CREATED, Json(board)))
}

pub async fn get_board(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Board>, BackendError> {
    state
        .authorizer()?
        .authorize(user.user_id, Resource::Board(id), Action::View)
        .await?;

    let board = db::get_board(state.pool()?, id)
        .await?
        .ok_or_else(|| BackendError::not_found("board", id))?;
    Ok(Json(board))
}

/// Boards of a workspace in position order
pub async fn list_workspace_boards(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(workspace_id): Path<Uuid>,
) -> Result<Json<Vec<Board>>, BackendError> {
    state
        .authorizer()?
        .authorize(user.user_id, Resource::Workspace(workspace_id), Action::View)
        .await?;

    Ok(Json(boards_in_order(state.pool()?, workspace_id).await?))
}

pub async fn update_board(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateBoardRequest>,
) -> Result<Json<Board>, BackendError> {
    state
        .authorizer()?
        .authorize(user.user_id, Resource::Board(id), Action::Edit)
        .await?;
    let title = request
        .title
        .as_deref()
        .map(|t| validate_title("title", t))
        .transpose()?;

    let board = db::update_details(state.pool()?, id, title.as_deref(), request.description.as_deref())
        .await?
        .ok_or_else(|| BackendError::not_found("board", id))?;
    Ok(Json(board))
}

/// Delete a board and close the gap it leaves in its workspace
pub async fn delete_board(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<PositionResponse>, BackendError> {
    state
        .authorizer()?
        .authorize(user.user_id, Resource::Board(id), Action::Edit)
        .await?;

    let removed = state.positions()?.remove(Collection::Boards, id).await?;
    Ok(Json(removed.into()))
}

/// Move a board to `newPosition` inside its workspace
pub async fn change_board_position(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<ChangePositionRequest>,
) -> Result<Json<PositionResponse>, BackendError> {
    state
        .authorizer()?
        .authorize(user.user_id, Resource::Board(id), Action::Edit)
        .await?;

    let moved = state
        .positions()?
        .move_within(Collection::Boards, id, request.new_position)
        .await?;
    Ok(Json(moved.into()))
}

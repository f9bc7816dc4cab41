//! Subtask HTTP Handlers

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
use crate::shared::models::{
    validate_title, CreateSubtaskRequest, MessageResponse, Subtask, UpdateSubtaskRequest,
};

pub async fn create_subtask(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<CreateSubtaskRequest>,
) -> Result<(StatusCode, Json<Subtask>), BackendError> {
    state
        .authorizer()?
        .authorize(user.user_id, Resource::Card(request.card_id), Action::Edit)
        .await?;
    let title = validate_title("title", &request.title)?;

    let subtask = db::create_subtask(state.pool()?, request.card_id, &title).await?;
    Ok((StatusCode::CREATED, Json(subtask)))
}

/// Check or uncheck a subtask
pub async fn update_subtask(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateSubtaskRequest>,
) -> Result<Json<Subtask>, BackendError> {
    state
        .authorizer()?
        .authorize(user.user_id, Resource::Subtask(id), Action::Edit)
        .await?;

    let subtask = db::set_done(state.pool()?, id, request.is_done)
        .await?
        .ok_or_else(|| BackendError::not_found("subtask", id))?;
    Ok(Json(subtask))
}

pub async fn delete_subtask(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, BackendError> {
    state
        .authorizer()?
        .authorize(user.user_id, Resource::Subtask(id), Action::Edit)
        .await?;

    if !db::delete_subtask(state.pool()?, id).await? {
        return Err(BackendError::not_found("subtask", id));
    }
    Ok(Json(MessageResponse::success()))
}

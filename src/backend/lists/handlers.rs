//! List HTTP Handlers

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
use crate::shared::models::{validate_title, CardList, CreateListRequest, MessageResponse, UpdateListRequest};

pub async fn create_list(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<CreateListRequest>,
) -> Result<(StatusCode, Json<CardList>), BackendError> {
    state
        .authorizer()?
        .authorize(user.user_id, Resource::Card(request.card_id), Action::View)
        .await?;
    let title = validate_title("title", &request.title)?;

    let list = db::create_list(state.pool()?, request.card_id, &title).await?;
    tracing::info!("User {} created list {} on card {}", user.user_id, list.id, list.card_id);
    Ok((StatusCode::CREATED, Json(list)))
}

pub async fn get_list(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<CardList>, BackendError> {
    state
        .authorizer()?
        .authorize(user.user_id, Resource::List(id), Action::View)
        .await?;

    let list = db::get_list(state.pool()?, id)
        .await?
        .ok_or_else(|| BackendError::not_found("list", id))?;
    Ok(Json(list))
}

pub async fn list_card_lists(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(card_id): Path<Uuid>,
) -> Result<Json<Vec<CardList>>, BackendError> {
    state
        .authorizer()?
        .authorize(user.user_id, Resource::Card(card_id), Action::View)
        .await?;

    Ok(Json(db::lists_for_card(state.pool()?, card_id).await?))
}

pub async fn update_list(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateListRequest>,
) -> Result<Json<CardList>, BackendError> {
    state
        .authorizer()?
        .authorize(user.user_id, Resource::List(id), Action::Edit)
        .await?;
    let title = validate_title("title", &request.title)?;

    let list = db::rename_list(state.pool()?, id, &title)
        .await?
        .ok_or_else(|| BackendError::not_found("list", id))?;
    Ok(Json(list))
}

pub async fn delete_list(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, BackendError> {
    state
        .authorizer()?
        .authorize(user.user_id, Resource::List(id), Action::Edit)
        .await?;

    if !db::delete_list(state.pool()?, id).await? {
        return Err(BackendError::not_found("list", id));
    }
    Ok(Json(MessageResponse::success()))
}

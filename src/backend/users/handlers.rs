//! User HTTP Handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::db;
use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::models::{
    validate_title, SearchUsersRequest, UpdateUserRequest, UserSearchResponse, UserSummary,
};

/// Change the caller's own name or profile picture
pub async fn update_user(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<UserSummary>, BackendError> {
    ensure_self(user.user_id, id)?;

    let name = request
        .name
        .as_deref()
        .map(|n| validate_title("name", n))
        .transpose()?;
    let profile = request
        .profile
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty());
    if name.is_none() && profile.is_none() {
        return Err(BackendError::handler(StatusCode::BAD_REQUEST, "Missing parameters"));
    }

    let updated = db::update_profile(state.pool()?, id, name.as_deref(), profile)
        .await?
        .ok_or_else(|| BackendError::not_found("user", id))?;

    tracing::info!("User {} updated their profile", id);
    Ok(Json(updated))
}

/// Find users by part of their name or email
pub async fn search_users(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Json(request): Json<SearchUsersRequest>,
) -> Result<Json<UserSearchResponse>, BackendError> {
    let query = request.query.trim();
    if query.is_empty() {
        return Err(BackendError::handler(
            StatusCode::BAD_REQUEST,
            "Search query is required",
        ));
    }

    let users = db::search(state.pool()?, query).await?;
    Ok(Json(UserSearchResponse { users }))
}

/// Users may only edit themselves
fn ensure_self(actor: Uuid, target: Uuid) -> Result<(), BackendError> {
    if actor == target {
        Ok(())
    } else {
        Err(BackendError::handler(
            StatusCode::FORBIDDEN,
            "Not authorized to update this user",
        ))
    }
}

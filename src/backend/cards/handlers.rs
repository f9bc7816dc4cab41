//! Card HTTP Handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::db::{self, CardChanges};
use crate::backend::auth::access::{Action, Authorizer, Resource};
use crate::backend::auth::users::get_user_by_email;
use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::positioning::store::{ItemAttributes, NewCard};
use crate::shared::models::{
    validate_title, AddCardMemberRequest, Card, ChangePositionRequest, CreateCardRequest,
    MessageResponse, MoveCardRequest, PositionResponse, UpdateCardRequest,
};
use crate::shared::ordering::Collection;

/// Append a card to the end of a board; the creator becomes its assignee
pub async fn create_card(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<CreateCardRequest>,
) -> Result<(StatusCode, Json<Card>), BackendError> {
    state
        .authorizer()?
        .authorize(user.user_id, Resource::Board(request.board_id), Action::Edit)
        .await?;
    let title = validate_title("title", &request.title)?;

    let item = state
        .positions()?
        .insert_at_end(
            request.board_id,
            ItemAttributes::Card(NewCard {
                title,
                description: request.description,
                color: request.color,
                image: request.image,
                deadline: request.deadline,
                assignee: Some(user.user_id),
            }),
        )
        .await?;

    let card = db::get_card(state.pool()?, item.id)
        .await?
        .ok_or_else(|| BackendError::not_found("card", item.id))?;
    Ok((StatusCode::CREATED, Json(card)))
}

pub async fn get_card(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Card>, BackendError> {
    state
        .authorizer()?
        .authorize(user.user_id, Resource::Card(id), Action::View)
        .await?;

    let card = db::get_card(state.pool()?, id)
        .await?
        .ok_or_else(|| BackendError::not_found("card", id))?;
    Ok(Json(card))
}

/// Cards of a board in position order
pub async fn list_board_cards(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(board_id): Path<Uuid>,
) -> Result<Json<Vec<Card>>, BackendError> {
    state
        .authorizer()?
        .authorize(user.user_id, Resource::Board(board_id), Action::View)
        .await?;

    Ok(Json(db::cards_in_order(state.pool()?, board_id).await?))
}

pub async fn update_card(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCardRequest>,
) -> Result<Json<Card>, BackendError> {
    state
        .authorizer()?
        .authorize(user.user_id, Resource::Card(id), Action::Edit)
        .await?;
    let title = request
        .title
        .as_deref()
        .map(|t| validate_title("title", t))
        .transpose()?;

    let changes = CardChanges {
        title: title.as_deref(),
        description: request.description.as_deref(),
        color: request.color.as_deref(),
        deadline: request.deadline,
    };
    let card = db::update_details(state.pool()?, id, changes)
        .await?
        .ok_or_else(|| BackendError::not_found("card", id))?;
    Ok(Json(card))
}

/// Delete a card and close the gap it leaves in its board
pub async fn delete_card(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<PositionResponse>, BackendError> {
    state
        .authorizer()?
        .authorize(user.user_id, Resource::Card(id), Action::Edit)
        .await?;

    let removed = state.positions()?.remove(Collection::Cards, id).await?;
    Ok(Json(removed.into()))
}

/// Move a card to `newPosition` inside its board
pub async fn change_card_position(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<ChangePositionRequest>,
) -> Result<Json<PositionResponse>, BackendError> {
    state
        .authorizer()?
        .authorize(user.user_id, Resource::Card(id), Action::Edit)
        .await?;

    let moved = state
        .positions()?
        .move_within(Collection::Cards, id, request.new_position)
        .await?;
    Ok(Json(moved.into()))
}

/// Move a card onto another board of the same workspace
pub async fn move_card(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<MoveCardRequest>,
) -> Result<Json<PositionResponse>, BackendError> {
    let pool = state.pool()?;
    let authorizer = state.authorizer()?;
    authorizer
        .authorize(user.user_id, Resource::Card(id), Action::Edit)
        .await?;
    authorizer
        .authorize(user.user_id, Resource::Board(request.new_board_id), Action::Edit)
        .await?;

    let card = db::get_card(pool, id)
        .await?
        .ok_or_else(|| BackendError::not_found("card", id))?;
    let current = db::board_workspace(pool, card.board_id).await?;
    let target = db::board_workspace(pool, request.new_board_id)
        .await?
        .ok_or_else(|| BackendError::not_found("board", request.new_board_id))?;
    ensure_same_workspace(current, target)?;

    let moved = state
        .positions()?
        .move_across_parents(Collection::Cards, id, request.new_board_id, request.new_position)
        .await?;
    Ok(Json(moved.into()))
}

/// Assign another user, found by email, to a card
pub async fn add_card_member(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<AddCardMemberRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), BackendError> {
    let pool = state.pool()?;
    state
        .authorizer()?
        .authorize(user.user_id, Resource::Card(request.card_id), Action::Edit)
        .await?;

    let member = get_user_by_email(pool, &request.email)
        .await?
        .ok_or_else(|| BackendError::not_found("user", &request.email))?;

    if !db::add_assignee(pool, request.card_id, member.id).await? {
        return Err(BackendError::handler(
            StatusCode::CONFLICT,
            "User is already assigned to this card",
        ));
    }

    tracing::info!(
        "User {} assigned {} to card {}",
        user.user_id,
        member.id,
        request.card_id
    );
    Ok((StatusCode::CREATED, Json(MessageResponse::success())))
}

/// Cards never leave their workspace
fn ensure_same_workspace(current: Option<Uuid>, target: Uuid) -> Result<(), BackendError> {
    if current == Some(target) {
        Ok(())
    } else {
        Err(BackendError::handler(
            StatusCode::BAD_REQUEST,
            "Boards belong to a different workspace",
        ))
    }
}

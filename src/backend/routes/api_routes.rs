/**
 * API Routes
 *
 * Every route here lives under `/api/v1` and passes through
 * `auth_middleware`, so handlers can take `AuthUser`.
 *
 * # Routes
 *
 * ## Workspaces
 * - `POST /workspace`, `GET /workspace`
 * - `GET|PUT|DELETE /workspace/{id}`
 * - `POST /workspaceMember/add-member`, `POST /workspaceMember/remove-member`
 * - `GET /workspaceMember/{workspace_id}/members`
 *
 * ## Boards
 * - `POST /board`, `GET|PUT|DELETE /board/{id}`
 * - `GET /board/workspace/{workspace_id}`
 * - `PUT /board/{id}/position`
 *
 * ## Cards
 * - `POST /card`, `GET|PUT|DELETE /card/{id}`
 * - `GET /card/board/{board_id}`
 * - `PUT /card/{id}/position`, `PUT /card/{id}/move`
 * - `POST /card/member`
 *
 * ## Lists and subtasks
 * - `POST /list`, `GET|PUT|DELETE /list/{id}`, `GET /list/card/{card_id}`
 * - `POST /subtask`, `PUT|DELETE /subtask/{id}`
 *
 * ## Users
 * - `PUT /user/{id}` (self only), `POST /user/search`
 */

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::backend::boards;
use crate::backend::cards;
use crate::backend::lists;
use crate::backend::middleware::auth_middleware;
use crate::backend::server::state::AppState;
use crate::backend::subtasks;
use crate::backend::users;
use crate::backend::workspaces;

pub const API_PREFIX: &str = "/api/v1";

/// Mount the authenticated `/api/v1` routes on `router`
pub fn configure_api_routes(router: Router<AppState>, app_state: &AppState) -> Router<AppState> {
    let api = Router::new()
        // Workspaces
        .route(
            "/workspace",
            post(workspaces::create_workspace).get(workspaces::list_workspaces),
        )
        .route(
            "/workspace/{id}",
            get(workspaces::get_workspace)
                .put(workspaces::rename_workspace)
                .delete(workspaces::delete_workspace),
        )
        .route("/workspaceMember/add-member", post(workspaces::add_member))
        .route("/workspaceMember/remove-member", post(workspaces::remove_member))
        .route(
            "/workspaceMember/{workspace_id}/members",
            get(workspaces::get_workspace_members),
        )
        // Boards
        .route("/board", post(boards::create_board))
        .route(
            "/board/{id}",
            get(boards::get_board)
                .put(boards::update_board)
                .delete(boards::delete_board),
        )
        .route(
            "/board/workspace/{workspace_id}",
            get(boards::list_workspace_boards),
        )
        .route("/board/{id}/position", put(boards::change_board_position))
        // Cards
        .route("/card", post(cards::create_card))
        .route("/card/member", post(cards::add_card_member))
        .route(
            "/card/{id}",
            get(cards::get_card)
                .put(cards::update_card)
                .delete(cards::delete_card),
        )
        .route("/card/board/{board_id}", get(cards::list_board_cards))
        .route("/card/{id}/position", put(cards::change_card_position))
        .route("/card/{id}/move", put(cards::move_card))
        // Lists
        .route("/list", post(lists::create_list))
        .route(
            "/list/{id}",
            get(lists::get_list)
                .put(lists::update_list)
                .delete(lists::delete_list),
        )
        .route("/list/card/{card_id}", get(lists::list_card_lists))
        // Subtasks
        .route("/subtask", post(subtasks::create_subtask))
        .route(
            "/subtask/{id}",
            put(subtasks::update_subtask).delete(subtasks::delete_subtask),
        )
        // Users
        .route("/user/search", post(users::search_users))
        .route("/user/{id}", put(users::update_user))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ));

    router.nest(API_PREFIX, api)
}

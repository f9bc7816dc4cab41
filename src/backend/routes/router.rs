/**
 * Router Configuration
 *
 * Combines the health check, the authenticated API routes and the request
 * tracing layer into the application router.
 */

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::backend::error::BackendError;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
///
/// - `GET /health` - unauthenticated liveness check
/// - `/api/v1/...` - see `api_routes`
/// - anything else - JSON 404
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = Router::new().route("/health", get(health));
    let router = configure_api_routes(router, &app_state);

    router
        .fallback(|| async { BackendError::handler(StatusCode::NOT_FOUND, "Route not found") })
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Report liveness and whether a database is configured
async fn health(State(app_state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "database": app_state.db_pool.is_some(),
    }))
}

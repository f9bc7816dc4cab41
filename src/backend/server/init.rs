/**
 * Server Initialization
 *
 * Connects to the database (when configured), runs migrations and builds the
 * router.
 */

use axum::Router;

use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_database, ServerConfig};
use crate::backend::server::state::AppState;

/// Create and configure the Axum application
///
/// A missing or unreachable database does not prevent startup.
pub async fn create_app(config: ServerConfig) -> Router<()> {
    tracing::info!("Initializing kanban backend server");

    let db_pool = load_database(config.database_url.as_deref()).await;
    let app_state = AppState::new(config, db_pool);

    let app = create_router(app_state);
    tracing::info!("Router configured");
    app
}

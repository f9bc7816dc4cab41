/**
 * Application State
 *
 * `AppState` is cloned into every handler. It holds the optional database
 * pool and the server configuration, and hands out the positioning engine
 * and authorizer built on that pool.
 */

use axum::extract::FromRef;
use sqlx::PgPool;
use std::sync::Arc;

use crate::backend::auth::access::PgAuthorizer;
use crate::backend::error::BackendError;
use crate::backend::positions::PgPositionStore;
use crate::backend::server::config::ServerConfig;
use crate::positioning::PositioningEngine;

#[derive(Clone)]
pub struct AppState {
    /// `None` when `DATABASE_URL` is not configured
    pub db_pool: Option<PgPool>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(config: ServerConfig, db_pool: Option<PgPool>) -> Self {
        Self {
            db_pool,
            config: Arc::new(config),
        }
    }

    /// The database pool, or 503 when none is configured
    pub fn pool(&self) -> Result<&PgPool, BackendError> {
        self.db_pool.as_ref().ok_or_else(BackendError::database_unavailable)
    }

    /// Positioning engine over the Postgres store
    pub fn positions(&self) -> Result<PositioningEngine<PgPositionStore>, BackendError> {
        Ok(PositioningEngine::new(PgPositionStore::new(self.pool()?.clone())))
    }

    pub fn authorizer(&self) -> Result<PgAuthorizer, BackendError> {
        Ok(PgAuthorizer::new(self.pool()?.clone()))
    }
}

impl FromRef<AppState> for Option<PgPool> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db_pool.clone()
    }
}

impl FromRef<AppState> for Arc<ServerConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.clone()
    }
}

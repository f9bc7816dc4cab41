/**
 * Backend Error Types
 *
 * This module defines the error type returned by every HTTP handler.
 * Each variant maps to an HTTP status code.
 *
 * # Error Categories
 *
 * ## Handler Errors
 *
 * Request-level failures with an explicit status:
 * - Missing or invalid bearer token
 * - Database not configured
 * - Requests the domain rules veto (e.g. moving a card between workspaces)
 *
 * ## Positioning Errors
 *
 * Failures of the positioning engine, mapped per kind:
 * - Not found → 404
 * - Invalid position → 400
 * - Conflict → 409 (client should reload and retry)
 * - Persistence failure → 503
 *
 * ## Access Errors
 *
 * Denials from the authorization collaborator → 403, or 404 when the
 * resource being authorized does not exist.
 */

use thiserror::Error;
use axum::http::StatusCode;

use crate::backend::auth::access::AccessError;
use crate::shared::error::{PositionError, SharedError};

/// Backend-specific error types
///
/// # Usage
///
/// ```rust
/// use kanban::backend::error::BackendError;
/// use axum::http::StatusCode;
///
/// let err = BackendError::handler(StatusCode::BAD_REQUEST, "Boards belong to a different workspace");
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Handler error with an explicit status code
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
    },

    /// Positioning engine error
    #[error(transparent)]
    Position(#[from] PositionError),

    /// Authorization collaborator error
    #[error(transparent)]
    Access(#[from] AccessError),

    /// Request validation error
    #[error(transparent)]
    SharedError(#[from] SharedError),

    /// Database error outside the positioning engine
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl BackendError {
    /// Create a new handler error with a status code
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    /// 404 for a record looked up outside the positioning engine
    pub fn not_found(kind: &str, id: impl std::fmt::Display) -> Self {
        Self::handler(StatusCode::NOT_FOUND, format!("{} {} not found", kind, id))
    }

    /// 503 when no database pool is configured
    pub fn database_unavailable() -> Self {
        Self::handler(StatusCode::SERVICE_UNAVAILABLE, "Database not configured")
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::HandlerError { status, .. } => *status,
            Self::Position(err) => match err {
                PositionError::ItemNotFound { .. }
                | PositionError::ParentNotFound { .. }
                | PositionError::TargetParentNotFound { .. } => StatusCode::NOT_FOUND,
                PositionError::InvalidPosition { .. } => StatusCode::BAD_REQUEST,
                PositionError::Conflict { .. } => StatusCode::CONFLICT,
                PositionError::PersistenceFailure { .. } => StatusCode::SERVICE_UNAVAILABLE,
            },
            Self::Access(err) => match err {
                AccessError::Denied { .. } => StatusCode::FORBIDDEN,
                AccessError::NotFound { .. } => StatusCode::NOT_FOUND,
                AccessError::Database(_) => StatusCode::SERVICE_UNAVAILABLE,
            },
            Self::SharedError(err) => match err {
                SharedError::SerializationError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
                SharedError::ValidationError { .. } => StatusCode::BAD_REQUEST,
            },
            Self::Database(sqlx::Error::RowNotFound) => StatusCode::NOT_FOUND,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the message sent to the client
    ///
    /// Database details stay in the logs.
    pub fn message(&self) -> String {
        match self {
            Self::HandlerError { message, .. } => message.clone(),
            Self::Position(PositionError::PersistenceFailure { .. }) => {
                "Storage temporarily unavailable".to_string()
            }
            Self::Position(err) => err.to_string(),
            Self::Access(AccessError::Database(_)) => "Storage temporarily unavailable".to_string(),
            Self::Access(err) => err.to_string(),
            Self::SharedError(err) => err.to_string(),
            Self::Database(sqlx::Error::RowNotFound) => "Not found".to_string(),
            Self::Database(_) => "Internal server error".to_string(),
        }
    }
}

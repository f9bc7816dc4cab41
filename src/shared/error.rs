//! Shared Error Types
//!
//! This module defines the error types shared by the positioning core and the
//! HTTP backend.
//!
//! # Error Categories
//!
//! - `PositionError` - Failures of ordered-collection operations
//! - `SharedError` - Request validation and serialization failures
//!
//! # Retry Policy
//!
//! `PositionError::Conflict` and `PositionError::PersistenceFailure` are
//! transient: the caller may reload and retry. Not-found and invalid-position
//! errors are terminal for the request that produced them.
//!
//! # Usage
//!
//! ```rust
//! use kanban::shared::error::{PositionError, SharedError};
//!
//! let error = SharedError::validation("title", "Title is required");
//! let error = PositionError::invalid_position(0, 1, 4);
//! assert!(!error.is_retryable());
//! ```
use thiserror::Error;
use uuid::Uuid;

/// Errors raised by positioning operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PositionError {
    /// The item being moved or removed does not exist
    #[error("{kind} {id} not found")]
    ItemNotFound { kind: &'static str, id: Uuid },

    /// The item's own parent does not exist
    #[error("{kind} {id} not found")]
    ParentNotFound { kind: &'static str, id: Uuid },

    /// The parent an item is being moved into does not exist
    #[error("target {kind} {id} not found")]
    TargetParentNotFound { kind: &'static str, id: Uuid },

    /// The requested position is outside the legal range for the operation
    #[error("invalid position {requested}, expected a value between {min} and {max}")]
    InvalidPosition { requested: i32, min: i32, max: i32 },

    /// The atomic batch was rejected because a concurrent operation changed
    /// the rows it depends on
    #[error("concurrent modification: {message}")]
    Conflict { message: String },

    /// The store could not be reached or failed for infrastructural reasons
    #[error("persistence failure: {message}")]
    PersistenceFailure { message: String },
}

impl PositionError {
    pub fn invalid_position(requested: i32, min: i32, max: i32) -> Self {
        Self::InvalidPosition { requested, min, max }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        Self::PersistenceFailure {
            message: message.into(),
        }
    }

    /// Whether reloading and retrying the operation may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict { .. } | Self::PersistenceFailure { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ItemNotFound { .. } | Self::ParentNotFound { .. } | Self::TargetParentNotFound { .. }
        )
    }
}

/// Validation and serialization errors for request payloads
#[derive(Debug, Error, Clone)]
pub enum SharedError {
    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Human-readable error message
        message: String,
    },

    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}

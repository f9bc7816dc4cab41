//! Shared Module
//!
//! Types used by both the positioning core and the HTTP backend. Nothing here
//! depends on the `ssr` feature.

/// Collections, parents, items and the density check
pub mod ordering;

/// Shared error types
pub mod error;

/// API records and request bodies
pub mod models;

pub use error::{PositionError, SharedError};
pub use ordering::{Collection, OrderedItem, OrderedParent, Placement};

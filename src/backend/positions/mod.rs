//! Positions Module
//!
//! PostgreSQL implementation of the positioning store. Every batch runs in one
//! transaction; each row write is guarded by the state it was planned against
//! and the `(parent, position)` uniqueness constraints are checked at commit.

pub mod store;

pub use store::{apply_in, map_sqlx_error, PgPositionStore};

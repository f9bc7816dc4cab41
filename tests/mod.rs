//! Test suite for the kanban crate
//!
//! - `common` - fixtures and assertion macros
//! - `integration` - engine scenarios, conflicts, and PostgreSQL round trips
//! - `property` - density invariants over random operation sequences

pub mod common;
pub mod integration;
pub mod property;

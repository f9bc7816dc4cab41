//! Common test utilities and helpers

pub mod assertions;
pub mod database;
pub mod fixtures;

pub use fixtures::*;

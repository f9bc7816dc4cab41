//! Integration tests

pub mod concurrency_test;
pub mod engine_test;
#[cfg(feature = "ssr")]
pub mod postgres_test;

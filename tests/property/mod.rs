//! Property-based tests

pub mod positioning_proptest;

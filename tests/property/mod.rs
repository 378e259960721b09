//! Property-based tests

pub mod router_proptest;

//! Property-based tests for JSON recovery

mod repair;

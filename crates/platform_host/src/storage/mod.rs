//! Storage contracts for optional desktop persistence.

pub mod app_state;

//! Virtual file system contracts, models, and the in-memory implementation.

pub mod path;
pub mod service;
pub mod types;

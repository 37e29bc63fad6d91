//! # Core Library
//!
//! Configuration, errors, database models, and repositories for the chat backend.

pub mod config;
pub mod error;
pub mod model;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
pub use model::store::{create_pool, DbPool};

//! # Core Library
//!
//! Configuration, errors, storage, the carbon credit domain and the API DTOs
//! shared by the web layer and the maintenance tools.

pub mod config;
pub mod dto;
pub mod error;
pub mod model;

#[cfg(any(test, feature = "test-utils"))]
pub mod _dev_utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
pub use model::store::{begin_write, create_pool, migrate, DbPool};

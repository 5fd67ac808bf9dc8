//! # Utilities Library
//!
//! Shared utility functions for environment variables, time, numeric rounding, and validation.

pub mod envs;
pub mod numbers;
pub mod time;
pub mod validation;

// Re-export commonly used functions
pub use envs::{get_env, get_env_or, get_env_parse, get_env_parse_or};
pub use numbers::round_to;
pub use time::{days_ago, format_time, now_utc, parse_utc};
pub use validation::{
    validate_in_range, validate_non_negative, validate_not_empty, validate_email, validate_positive,
};

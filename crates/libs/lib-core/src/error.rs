//! # Centralized Error Handling
//!
//! This module defines the application-wide error type [`AppError`] used consistently
//! across all backend modules. It follows the `thiserror` pattern for ergonomic error handling.
//!
//! ## Error Categories
//!
//! 1. **Client Errors** (4xx) - User/input issues
//!    - [`InvalidInput`](AppError::InvalidInput) → 400 Bad Request
//!    - [`InsufficientBalance`](AppError::InsufficientBalance) → 400 Bad Request
//!    - [`Unauthorized`](AppError::Unauthorized) → 401 Unauthorized
//!    - [`NotFound`](AppError::NotFound) → 404 Not Found
//!    - [`Conflict`](AppError::Conflict) → 409 Conflict
//!
//! 2. **Server Errors** (5xx) - Internal/system issues
//!    - [`StorageUnavailable`](AppError::StorageUnavailable) → 503 Service Unavailable (retryable)
//!    - [`Storage`](AppError::Storage) → 500 Internal Server Error
//!    - [`Config`](AppError::Config) / [`Internal`](AppError::Internal) /
//!      [`Decoding`](AppError::Decoding) → 500 Internal Server Error
//!
//! ## Usage Example
//!
//! ```rust
//! use lib_core::error::{AppError, Result};
//!
//! fn check_credits(credits: f64) -> Result<f64> {
//!     if credits <= 0.0 {
//!         return Err(AppError::InvalidInput(
//!             "credits must be greater than zero".to_string()
//!         ));
//!     }
//!     Ok(credits)
//! }
//! ```
//!
//! ## Error Conversion
//!
//! - `From<anyhow::Error>` - Convert anyhow errors to AppError
//! - `From<sqlx::Error>` - Split database errors into unavailable (retryable) and failed
//! - `From<sqlx::migrate::MigrateError>` - Migration failures at startup
//! - `From<JsonRejection>` / `From<QueryRejection>` - Bad request bodies and query strings
//! - `From<serde_json::Error>` - Convert JSON errors to AppError

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Convenience type alias for `Result<T, AppError>`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application-wide error type covering all error scenarios.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration error during startup or environment loading.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid user input (validation failure).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Caller identity missing or not recognised.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Resource not found (farm, user, crop).
    ///
    /// A missing farm is recoverable: the user completes onboarding.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Resource already exists (second farm for a user, duplicate email).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Withdrawal exceeds the farm's available credits. No state was changed.
    #[error("Insufficient carbon credits: requested {requested}, available {available}")]
    InsufficientBalance { requested: f64, available: f64 },

    /// Persistence layer unreachable or timed out. Safe for the caller to retry.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Database statement failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Data decoding error (JSON, stored enum values).
    #[error("Decoding error: {0}")]
    Decoding(String),

    /// Generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) | AppError::InsufficientBalance { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Config(_) | AppError::Storage(_) | AppError::Decoding(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get a user-friendly error message.
    ///
    /// For internal errors, returns a generic message to avoid exposing implementation details.
    pub fn user_message(&self) -> String {
        match self {
            AppError::InvalidInput(msg)
            | AppError::Unauthorized(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg) => msg.clone(),
            AppError::InsufficientBalance { .. } => "Insufficient carbon credits".to_string(),
            AppError::StorageUnavailable(_) => "Service temporarily unavailable, please retry".to_string(),
            AppError::Config(_) | AppError::Storage(_) | AppError::Decoding(_) | AppError::Internal(_) => {
                "Server error".to_string()
            }
        }
    }

    /// Stable machine-readable code for the error body.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "Config",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::NotFound(_) => "NotFound",
            AppError::Conflict(_) => "Conflict",
            AppError::InsufficientBalance { .. } => "InsufficientBalance",
            AppError::StorageUnavailable(_) => "StorageUnavailable",
            AppError::Storage(_) => "Storage",
            AppError::Decoding(_) => "Decoding",
            AppError::Internal(_) => "Internal",
        }
    }

    /// Shorthand for the error every farm-scoped route returns before onboarding.
    pub fn farm_not_found() -> Self {
        AppError::NotFound("Farm not found".to_string())
    }
}

/// Implement Axum's `IntoResponse` for automatic error handling.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("Server error: {}", self);
        } else {
            tracing::debug!("Client error: {}", self);
        }

        let body = Json(json!({
            "success": false,
            "error": self.user_message(),
            "code": self.code(),
        }));

        (status, body).into_response()
    }
}

/// Convert `anyhow::Error` to `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Convert `sqlx::Error` to `AppError`.
///
/// Pool exhaustion, closed pools and I/O failures mean the store could not be
/// reached and are reported as [`AppError::StorageUnavailable`]; a busy/locked
/// SQLite database is treated the same way.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Database record not found".to_string()),
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                AppError::StorageUnavailable(err.to_string())
            }
            sqlx::Error::Database(db_err) => {
                let message = db_err.message().to_string();
                if message.contains("database is locked") || message.contains("database is busy") {
                    AppError::StorageUnavailable(message)
                } else if db_err.is_unique_violation() {
                    AppError::Conflict(message)
                } else {
                    AppError::Storage(format!("Database error: {}", message))
                }
            }
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                AppError::Decoding(format!("Database decode error: {}", err))
            }
            _ => AppError::Storage(format!("Database error: {}", err)),
        }
    }
}

/// Convert migration failures to `AppError`.
impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        AppError::Storage(format!("Migration error: {}", err))
    }
}

/// Malformed or mistyped JSON bodies are invalid input.
impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl From<axum::extract::rejection::QueryRejection> for AppError {
    fn from(rejection: axum::extract::rejection::QueryRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

/// Convert `serde_json::Error` to `AppError`.
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Decoding(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::farm_not_found().status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::InsufficientBalance { requested: 3.0, available: 2.0 }.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::StorageUnavailable("pool timed out".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(AppError::Storage("boom".into()).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let err = AppError::Storage("no such table: farms".into());
        assert_eq!(err.user_message(), "Server error");
        assert_eq!(err.code(), "Storage");
    }

    #[test]
    fn test_sqlx_pool_timeout_is_retryable() {
        let err: AppError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, AppError::StorageUnavailable(_)));
    }
}

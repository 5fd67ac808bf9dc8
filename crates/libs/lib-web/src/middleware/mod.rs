//! # Middleware
//!
//! Axum middleware for caller context, request stamping, logging and response mapping.
//!
//! ## Modules
//!
//! - **[`mw_ctx`]**: Resolves `X-User-Id` into a caller [`Ctx`]
//! - **[`mw_req_stamp`]**: Request ID and timestamp stamping
//! - **[`mw_logging`]**: Request/response logging
//! - **[`mw_res_map`]**: Response mapping

// region: --- Modules
pub mod mw_ctx;
pub mod mw_logging;
pub mod mw_req_stamp;
pub mod mw_res_map;
// endregion: --- Modules

// region: --- Re-exports
pub use mw_ctx::{require_ctx, Ctx, USER_ID_HEADER};
pub use mw_logging::log_requests;
pub use mw_req_stamp::{stamp_req, RequestStamp};
pub use mw_res_map::map_res;
// endregion: --- Re-exports

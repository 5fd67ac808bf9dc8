//! # HTTP Request Handlers
//!
//! Axum handlers organized by feature. Handlers extract the caller context,
//! state and body, then delegate to [`crate::services`].
//!
//! ## Handler Modules
//!
//! - **[`system`]**: `GET /`, `GET /health`
//! - **[`users`]**: `POST /api/users`, `GET /api/users/me`
//! - **[`farm`]**: `POST|GET|PUT /api/farm`
//! - **[`carbon`]**: wallet, calculate, withdraw, history under `/api/carbon`
//! - **[`solar`]**: `POST /api/solar/data`, `GET /api/solar/history`
//! - **[`crop`]**: `POST|GET /api/crop`, `PUT /api/crop/{id}`, `POST /api/crop/recommend`
//! - **[`dashboard`]**: `GET /api/dashboard`
//!
//! ## Handler Architecture
//!
//! ```rust,ignore
//! async fn handler(
//!     State(db): State<DbPool>,           // Shared state
//!     Extension(ctx): Extension<Ctx>,     // Caller from X-User-Id
//!     ApiJson(payload): ApiJson<Body>,    // Request body
//! ) -> Result<Json<ApiResponse<Data>>> {
//!     // Delegate to a service...
//! }
//! ```
//!
//! Errors are `AppError`s and render as
//! `{ "success": false, "error": "...", "code": "..." }`.

pub mod carbon;
pub mod crop;
pub mod dashboard;
pub mod farm;
pub mod solar;
pub mod system;
pub mod users;

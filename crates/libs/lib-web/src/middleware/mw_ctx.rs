//! # Caller Context Middleware
//!
//! Resolves the caller of a request into a [`Ctx`].
//!
//! Identity is established upstream: the gateway in front of this service
//! authenticates the user and forwards their ID in the `X-User-Id` header.
//! This middleware only checks that the ID names an active user.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use axum::{Router, routing::get, middleware::from_fn_with_state};
//! use lib_web::middleware::require_ctx;
//!
//! let app = Router::new()
//!     .route("/api/farm", get(get_farm))
//!     .route_layer(from_fn_with_state(state.clone(), require_ctx));
//! ```
//!
//! Handlers then extract the context with `Extension<Ctx>`:
//!
//! ```rust,ignore
//! use axum::extract::Extension;
//! use lib_web::middleware::Ctx;
//!
//! async fn get_farm(Extension(ctx): Extension<Ctx>) -> String {
//!     format!("Hello, user {}!", ctx.user_id)
//! }
//! ```

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use lib_core::model::store::UserRepository;
use lib_core::{AppError, DbPool};
use tracing::{debug, warn};

/// Header carrying the caller's user ID.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The caller of the current request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ctx {
    pub user_id: i64,
}

/// Caller context middleware.
///
/// - **Known, active user**: continues with [`Ctx`] in the request extensions
/// - **Missing, malformed, unknown or inactive**: `401 Unauthorized`
pub async fn require_ctx(State(db): State<DbPool>, mut req: Request, next: Next) -> Result<Response, AppError> {
    let user_id = req
        .headers()
        .get(USER_ID_HEADER)
        .ok_or_else(|| {
            warn!("[CTX] Missing X-User-Id header");
            AppError::Unauthorized("Missing caller identity".to_string())
        })?
        .to_str()
        .ok()
        .and_then(|v| v.trim().parse::<i64>().ok())
        .ok_or_else(|| {
            warn!("[CTX] Malformed X-User-Id header");
            AppError::Unauthorized("Invalid caller identity".to_string())
        })?;

    let user = UserRepository::find_by_id(&db, user_id)
        .await?
        .filter(|user| user.is_active)
        .ok_or_else(|| {
            warn!("[CTX] Unknown or inactive user: {}", user_id);
            AppError::Unauthorized("Unknown caller".to_string())
        })?;

    debug!("[CTX] Caller: {} (id: {})", user.email, user.id);

    req.extensions_mut().insert(Ctx { user_id: user.id });

    Ok(next.run(req).await)
}

//! # Response Mapping Middleware
//!
//! Post-processes responses: server errors are logged with their request ID,
//! and `503 Service Unavailable` responses get a `Retry-After` header since
//! storage outages are transient.

use crate::middleware::RequestStamp;
use axum::{
    extract::Request,
    http::{header::RETRY_AFTER, HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};
use tracing::error;

/// Seconds a client should wait before retrying after a 503.
const RETRY_AFTER_SECS: &str = "1";

/// Response mapping middleware.
pub async fn map_res(req: Request, next: Next) -> Response {
    let request_id = req
        .extensions()
        .get::<RequestStamp>()
        .map(|s| s.id.clone())
        .unwrap_or_else(|| "unknown".to_string());

    let mut res = next.run(req).await;

    if res.status().is_server_error() {
        error!(request_id = %request_id, "[RESPONSE] Server error: {}", res.status());
    }

    if res.status() == StatusCode::SERVICE_UNAVAILABLE {
        res.headers_mut()
            .insert(RETRY_AFTER, HeaderValue::from_static(RETRY_AFTER_SECS));
    }

    res
}

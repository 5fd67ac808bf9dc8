//! # Request Stamping Middleware
//!
//! Gives every request an ID and a receive time for tracing.
//!
//! A well-formed `X-Request-ID` set by the gateway is kept so log lines can be
//! correlated across services; otherwise a UUID v4 is generated. The ID is
//! echoed back in the `X-Request-ID` response header.
//!
//! Request ID is available in handlers via `Extension<RequestStamp>`:
//!
//! ```rust,ignore
//! use axum::extract::Extension;
//! use lib_web::middleware::RequestStamp;
//!
//! async fn handler(Extension(stamp): Extension<RequestStamp>) -> String {
//!     format!("Request ID: {}", stamp.id)
//! }
//! ```

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use chrono::{DateTime, Utc};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest upstream request ID that is accepted as-is.
const MAX_UPSTREAM_ID_LEN: usize = 64;

/// Request metadata for tracing and debugging.
#[derive(Clone, Debug)]
pub struct RequestStamp {
    /// Unique request identifier
    pub id: String,
    /// When the request was received
    pub received_at: DateTime<Utc>,
}

impl RequestStamp {
    fn from_upstream(upstream: Option<&str>) -> Self {
        let id = upstream
            .map(str::trim)
            .filter(|id| is_acceptable_id(id))
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        Self {
            id,
            received_at: Utc::now(),
        }
    }
}

fn is_acceptable_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_UPSTREAM_ID_LEN
        && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Request stamping middleware.
///
/// Adds a [`RequestStamp`] to the request extensions and the ID to the
/// `X-Request-ID` response header.
pub async fn stamp_req(mut req: Request, next: Next) -> Response {
    let upstream = req.headers().get(REQUEST_ID_HEADER).and_then(|v| v.to_str().ok());
    let stamp = RequestStamp::from_upstream(upstream);

    req.extensions_mut().insert(stamp.clone());

    let mut res = next.run(req).await;

    if let Ok(header_value) = HeaderValue::from_str(&stamp.id) {
        res.headers_mut().insert(REQUEST_ID_HEADER, header_value);
    }

    res
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_id_is_kept() {
        assert_eq!(RequestStamp::from_upstream(Some("gw-123_abc")).id, "gw-123_abc");
    }

    #[test]
    fn test_bad_upstream_id_is_replaced() {
        for bad in [None, Some(""), Some("has space"), Some("x".repeat(65).as_str())] {
            let stamp = RequestStamp::from_upstream(bad);
            assert!(Uuid::parse_str(&stamp.id).is_ok(), "{bad:?} was not replaced");
        }
    }
}

//! Service information and liveness.

use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

/// **Route**: `GET /`
pub async fn root() -> Json<Value> {
    Json(json!({
        "name": "AgroVolt API",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
    }))
}

/// **Route**: `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "OK",
        "timestamp": Utc::now(),
    }))
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{send, test_app};
    use axum::http::{Method, StatusCode};

    #[tokio::test]
    async fn test_health_and_root() {
        let (app, _) = test_app().await;

        let (status, body) = send(&app, Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "OK");

        let (status, body) = send(&app, Method::GET, "/", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "running");
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (app, _) = test_app().await;

        let (status, body) = send(&app, Method::GET, "/api/nope", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "NotFound");
    }
}

//! # User Handlers
//!
//! Profile registration is public; the gateway calls it once when a farmer
//! signs up and afterwards forwards the returned `id` as `X-User-Id`.
//!
//! ```bash
//! curl -X POST http://localhost:5000/api/users \
//!   -H 'content-type: application/json' \
//!   -d '{"name": "Ravi Kumar", "email": "ravi@example.in"}'
//!
//! curl http://localhost:5000/api/users/me -H 'X-User-Id: 1'
//! ```

use crate::extract::ApiJson;
use crate::middleware::Ctx;
use crate::services::UserService;
use axum::{extract::State, http::StatusCode, Extension, Json};
use lib_core::dto::{ApiResponse, CreateUserRequest};
use lib_core::model::store::models::User;
use lib_core::{DbPool, Result};
use tracing::instrument;

/// **Route**: `POST /api/users`
///
/// 201 with the new profile, 400 on invalid fields, 409 on a registered email.
#[instrument(skip_all)]
pub async fn create_user(
    State(db): State<DbPool>,
    ApiJson(req): ApiJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<User>>)> {
    let user = UserService::new(db).register(req).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("User created", user)),
    ))
}

/// **Route**: `GET /api/users/me`
#[instrument(skip_all, fields(user_id = ctx.user_id))]
pub async fn get_me(State(db): State<DbPool>, Extension(ctx): Extension<Ctx>) -> Result<Json<ApiResponse<User>>> {
    let user = UserService::new(db).get(ctx.user_id).await?;
    Ok(Json(ApiResponse::ok(user)))
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{send, test_app};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn test_register_then_me() {
        let (app, _) = test_app().await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/users",
            None,
            Some(json!({ "name": "Ravi Kumar", "email": "ravi@example.in" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = body["data"]["id"].as_i64().unwrap();

        let (status, body) = send(&app, Method::GET, "/api/users/me", Some(id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["email"], "ravi@example.in");
        assert_eq!(body["data"]["carbonBalance"], 0.0);
        assert_eq!(body["data"]["subscriptionPlan"], "free");
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let (app, _) = test_app().await;
        let profile = json!({ "name": "Ravi", "email": "ravi@example.in" });

        send(&app, Method::POST, "/api/users", None, Some(profile.clone())).await;
        let (status, body) = send(&app, Method::POST, "/api/users", None, Some(profile)).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "Conflict");
    }

    #[tokio::test]
    async fn test_caller_identity_required() {
        let (app, _) = test_app().await;

        let (status, body) = send(&app, Method::GET, "/api/users/me", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "Unauthorized");

        let (status, _) = send(&app, Method::GET, "/api/users/me", Some(404), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let (app, _) = test_app().await;

        let (status, body) = send(&app, Method::POST, "/api/users", None, Some(json!({ "name": "Ravi" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "InvalidInput");
    }
}

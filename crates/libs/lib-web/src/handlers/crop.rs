//! # Crop Handlers
//!
//! Crops planted under the panels of the caller's farm.

use crate::extract::ApiJson;
use crate::middleware::Ctx;
use crate::services::{CropService, FarmDirectory};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use lib_core::dto::{ApiResponse, CreateCropRequest, CropRecommendations, RecommendCropsRequest, UpdateCropRequest};
use lib_core::model::store::models::Crop;
use lib_core::{DbPool, Result};
use tracing::instrument;

/// **Route**: `POST /api/crop`
#[instrument(skip_all, fields(user_id = ctx.user_id))]
pub async fn add_crop(
    State(db): State<DbPool>,
    Extension(ctx): Extension<Ctx>,
    ApiJson(req): ApiJson<CreateCropRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Crop>>)> {
    let farm = FarmDirectory::new(db.clone()).for_user(ctx.user_id).await?;
    let crop = CropService::new(db).add(&farm, req).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::with_message("Crop added", crop))))
}

/// **Route**: `GET /api/crop`
///
/// Every crop of the farm, newest first.
#[instrument(skip_all, fields(user_id = ctx.user_id))]
pub async fn get_crops(State(db): State<DbPool>, Extension(ctx): Extension<Ctx>) -> Result<Json<ApiResponse<Vec<Crop>>>> {
    let farm = FarmDirectory::new(db.clone()).for_user(ctx.user_id).await?;
    let crops = CropService::new(db).list(&farm).await?;
    Ok(Json(ApiResponse::ok(crops)))
}

/// **Route**: `PUT /api/crop/{id}`
///
/// 404 when the crop belongs to another farm.
#[instrument(skip_all, fields(user_id = ctx.user_id, crop_id = crop_id))]
pub async fn update_crop(
    State(db): State<DbPool>,
    Extension(ctx): Extension<Ctx>,
    Path(crop_id): Path<i64>,
    ApiJson(req): ApiJson<UpdateCropRequest>,
) -> Result<Json<ApiResponse<Crop>>> {
    let farm = FarmDirectory::new(db.clone()).for_user(ctx.user_id).await?;
    let crop = CropService::new(db).update(&farm, crop_id, req).await?;
    Ok(Json(ApiResponse::with_message("Crop updated", crop)))
}

/// **Route**: `POST /api/crop/recommend`
///
/// Crops suited to the farm's soil and rainfall. An empty object uses the
/// farm's soil type, 600 mm of rain and the kharif season.
#[instrument(skip_all, fields(user_id = ctx.user_id))]
pub async fn recommend_crops(
    State(db): State<DbPool>,
    Extension(ctx): Extension<Ctx>,
    ApiJson(req): ApiJson<RecommendCropsRequest>,
) -> Result<Json<ApiResponse<CropRecommendations>>> {
    let farm = FarmDirectory::new(db.clone()).for_user(ctx.user_id).await?;
    let recommendations = CropService::new(db).recommend(&farm, req)?;
    Ok(Json(ApiResponse::ok(recommendations)))
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{send, test_app};
    use axum::http::{Method, StatusCode};
    use lib_core::_dev_utils::seed_farm;
    use serde_json::json;

    fn paddy() -> serde_json::Value {
        json!({
            "cropName": "Paddy",
            "season": "kharif",
            "sowingDate": "2026-06-15T00:00:00Z",
            "expectedHarvestDate": "2026-10-20T00:00:00Z",
            "predictedYield": 18
        })
    }

    #[tokio::test]
    async fn test_add_list_update() {
        let (app, pool) = test_app().await;
        let (user, _) = seed_farm(&pool, "ravi@example.in").await;

        let (status, body) = send(&app, Method::POST, "/api/crop", Some(user.id), Some(paddy())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["status"], "sown");
        let crop_id = body["data"]["id"].as_i64().unwrap();

        let (_, body) = send(&app, Method::GET, "/api/crop", Some(user.id), None).await;
        assert_eq!(body["data"].as_array().map(Vec::len), Some(1));

        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/api/crop/{}", crop_id),
            Some(user.id),
            Some(json!({ "status": "harvested", "actualYield": 17.5 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "harvested");
        assert_eq!(body["data"]["actualYield"], 17.5);
    }

    #[tokio::test]
    async fn test_foreign_crop_is_not_found() {
        let (app, pool) = test_app().await;
        let (owner, _) = seed_farm(&pool, "owner@example.in").await;
        let (other, _) = seed_farm(&pool, "other@example.in").await;

        let (_, body) = send(&app, Method::POST, "/api/crop", Some(owner.id), Some(paddy())).await;
        let crop_id = body["data"]["id"].as_i64().unwrap();

        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/api/crop/{}", crop_id),
            Some(other.id),
            Some(json!({ "healthScore": 50 })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Crop not found");
    }

    #[tokio::test]
    async fn test_harvest_before_sowing() {
        let (app, pool) = test_app().await;
        let (user, _) = seed_farm(&pool, "ravi@example.in").await;

        let mut body = paddy();
        body["expectedHarvestDate"] = json!("2026-01-01T00:00:00Z");

        let (status, _) = send(&app, Method::POST, "/api/crop", Some(user.id), Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_recommend_crops() {
        let (app, pool) = test_app().await;
        let (user, _) = seed_farm(&pool, "ravi@example.in").await;

        let (status, body) = send(&app, Method::POST, "/api/crop/recommend", Some(user.id), Some(json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["recommendations"][0]["name"], "Tomato");
        assert_eq!(body["data"]["recommendations"][0]["yield"], 250.0);
        assert_eq!(body["data"]["criteria"]["rainfall"], 600.0);
        assert_eq!(body["data"]["criteria"]["season"], "kharif");
        assert_eq!(body["data"]["farmDetails"]["soilType"], "loamy");
        assert_eq!(body["data"]["farmDetails"]["solarInstalled"], true);

        let (_, body) = send(
            &app,
            Method::POST,
            "/api/crop/recommend",
            Some(user.id),
            Some(json!({ "rainfall": 320, "season": "rabi" })),
        )
        .await;
        assert_eq!(body["data"]["recommendations"][0]["name"], "Millet");
        assert_eq!(body["data"]["criteria"]["season"], "rabi");
    }
}

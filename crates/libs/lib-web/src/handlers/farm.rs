//! # Farm Handlers
//!
//! Onboarding and profile of the caller's farm.

use crate::extract::ApiJson;
use crate::middleware::Ctx;
use crate::services::FarmDirectory;
use axum::{extract::State, http::StatusCode, Extension, Json};
use lib_core::dto::{ApiResponse, CreateFarmRequest, UpdateFarmRequest};
use lib_core::model::store::models::Farm;
use lib_core::{DbPool, Result};
use tracing::instrument;

/// **Route**: `POST /api/farm`
///
/// 201 with the farm; 409 if the caller already has one.
#[instrument(skip_all, fields(user_id = ctx.user_id))]
pub async fn create_farm(
    State(db): State<DbPool>,
    Extension(ctx): Extension<Ctx>,
    ApiJson(req): ApiJson<CreateFarmRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Farm>>)> {
    let farm = FarmDirectory::new(db).onboard(ctx.user_id, req).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Farm created successfully", farm)),
    ))
}

/// **Route**: `GET /api/farm`
#[instrument(skip_all, fields(user_id = ctx.user_id))]
pub async fn get_farm(State(db): State<DbPool>, Extension(ctx): Extension<Ctx>) -> Result<Json<ApiResponse<Farm>>> {
    let farm = FarmDirectory::new(db).for_user(ctx.user_id).await?;
    Ok(Json(ApiResponse::ok(farm)))
}

/// **Route**: `PUT /api/farm`
#[instrument(skip_all, fields(user_id = ctx.user_id))]
pub async fn update_farm(
    State(db): State<DbPool>,
    Extension(ctx): Extension<Ctx>,
    ApiJson(req): ApiJson<UpdateFarmRequest>,
) -> Result<Json<ApiResponse<Farm>>> {
    let farm = FarmDirectory::new(db).update(ctx.user_id, req).await?;
    Ok(Json(ApiResponse::with_message("Farm updated successfully", farm)))
}

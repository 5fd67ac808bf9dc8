//! Solar production log of the caller's farm.

use crate::extract::{ApiJson, ApiQuery};
use crate::middleware::Ctx;
use crate::services::{FarmDirectory, SolarService};
use axum::{extract::State, http::StatusCode, Extension, Json};
use lib_core::dto::{AddSolarDataRequest, ApiResponse, SolarHistoryQuery, SolarHistoryResponse};
use lib_core::model::store::models::SolarReading;
use lib_core::{Config, DbPool, Result};
use tracing::instrument;

/// **Route**: `POST /api/solar/data`
///
/// ```json
/// { "energyProduced": 22.5, "efficiency": 84, "dustLevel": "light", "panelTemperature": 41 }
/// ```
#[instrument(skip_all, fields(user_id = ctx.user_id))]
pub async fn add_solar_data(
    State(db): State<DbPool>,
    State(config): State<Config>,
    Extension(ctx): Extension<Ctx>,
    ApiJson(req): ApiJson<AddSolarDataRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SolarReading>>)> {
    let farm = FarmDirectory::new(db.clone()).for_user(ctx.user_id).await?;
    let reading = SolarService::new(db, config.solar_tariff_per_kwh)
        .add_reading(&farm, req)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Solar data added successfully", reading)),
    ))
}

/// **Route**: `GET /api/solar/history?days=30`
#[instrument(skip_all, fields(user_id = ctx.user_id))]
pub async fn get_solar_history(
    State(db): State<DbPool>,
    State(config): State<Config>,
    Extension(ctx): Extension<Ctx>,
    ApiQuery(query): ApiQuery<SolarHistoryQuery>,
) -> Result<Json<ApiResponse<SolarHistoryResponse>>> {
    let farm = FarmDirectory::new(db.clone()).for_user(ctx.user_id).await?;
    let history = SolarService::new(db, config.solar_tariff_per_kwh)
        .history(&farm, query.days)
        .await?;

    Ok(Json(ApiResponse::ok(history)))
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{send, test_app};
    use axum::http::{Method, StatusCode};
    use lib_core::_dev_utils::seed_farm;
    use serde_json::json;

    #[tokio::test]
    async fn test_log_and_history() {
        let (app, pool) = test_app().await;
        let (user, _) = seed_farm(&pool, "ravi@example.in").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/solar/data",
            Some(user.id),
            Some(json!({ "energyProduced": 20, "dustLevel": "moderate" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["revenue"], 120.0);
        assert_eq!(body["data"]["dustLevel"], "moderate");

        let (status, body) = send(&app, Method::GET, "/api/solar/history?days=7", Some(user.id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["summary"]["days"], 1);
        assert_eq!(body["data"]["summary"]["totalEnergy"], 20.0);
    }

    #[tokio::test]
    async fn test_rejects_negative_energy() {
        let (app, pool) = test_app().await;
        let (user, _) = seed_farm(&pool, "ravi@example.in").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/solar/data",
            Some(user.id),
            Some(json!({ "energyProduced": -1 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "InvalidInput");
    }
}

//! Farm dashboard.

use crate::middleware::Ctx;
use crate::services::{DashboardService, FarmDirectory};
use axum::{extract::State, Extension, Json};
use lib_core::dto::{ApiResponse, DashboardView};
use lib_core::model::carbon::CarbonLedger;
use lib_core::{Config, DbPool, Result};
use std::sync::Arc;
use tracing::instrument;

/// **Route**: `GET /api/dashboard`
///
/// Farm profile, 30-day solar output and income estimate, active crops and
/// earned carbon credits priced at the current rate.
#[instrument(skip_all, fields(user_id = ctx.user_id))]
pub async fn get_dashboard(
    State(db): State<DbPool>,
    State(config): State<Config>,
    State(ledger): State<Arc<CarbonLedger>>,
    Extension(ctx): Extension<Ctx>,
) -> Result<Json<ApiResponse<DashboardView>>> {
    let farm = FarmDirectory::new(db.clone()).for_user(ctx.user_id).await?;
    let view = DashboardService::new(db, config, ledger.current_rate())
        .build(farm)
        .await?;

    Ok(Json(ApiResponse::ok(view)))
}

//! # Carbon Credit Handlers
//!
//! Wallet, accrual, withdrawal and history for the caller's farm. All routes
//! require `X-User-Id` and act on the single farm owned by that user.
//!
//! ## Endpoints
//!
//! ### GET /api/carbon/wallet
//!
//! Balances, impact, market rate and the 10 most recent ledger entries.
//!
//! ### POST /api/carbon/calculate
//!
//! **Request Body**:
//! ```json
//! { "energyKWh": 1000, "waterLiters": 50000, "description": "March savings" }
//! ```
//!
//! Appends an `earned` entry of `(energyKWh * 0.82 + waterLiters * 0.002) / 1000`
//! credits and returns it with the calculation breakdown.
//!
//! ### POST /api/carbon/withdraw
//!
//! **Request Body**:
//! ```json
//! { "credits": 0.5, "method": "UPI" }
//! ```
//!
//! **Errors**:
//! - `400 InsufficientBalance`: more credits than available
//! - `400 InvalidInput`: non-positive credits
//!
//! ### GET /api/carbon/history?days=90
//!
//! Ledger entries newest first.

use crate::extract::{ApiJson, ApiQuery};
use crate::middleware::Ctx;
use crate::services::{CarbonService, FarmDirectory};
use axum::{extract::State, http::StatusCode, Extension, Json};
use lib_core::dto::{
    ApiResponse, CalculateCreditsRequest, CalculateCreditsResponse, HistoryQuery, WalletView, WithdrawRequest,
    WithdrawResponse,
};
use lib_core::model::carbon::CarbonLedger;
use lib_core::model::store::models::CarbonTransaction;
use lib_core::{DbPool, Result};
use std::sync::Arc;
use tracing::{info, instrument};

fn service(ledger: Arc<CarbonLedger>, db: DbPool) -> CarbonService {
    CarbonService::new(ledger, FarmDirectory::new(db))
}

/// **Route**: `GET /api/carbon/wallet`
#[instrument(skip_all, fields(user_id = ctx.user_id))]
pub async fn get_wallet(
    State(ledger): State<Arc<CarbonLedger>>,
    State(db): State<DbPool>,
    Extension(ctx): Extension<Ctx>,
) -> Result<Json<ApiResponse<WalletView>>> {
    let wallet = service(ledger, db).wallet(ctx.user_id).await?;
    Ok(Json(ApiResponse::ok(wallet)))
}

/// **Route**: `POST /api/carbon/calculate`
#[instrument(skip_all, fields(user_id = ctx.user_id))]
pub async fn calculate_credits(
    State(ledger): State<Arc<CarbonLedger>>,
    State(db): State<DbPool>,
    Extension(ctx): Extension<Ctx>,
    ApiJson(req): ApiJson<CalculateCreditsRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CalculateCreditsResponse>>)> {
    let result = service(ledger, db).calculate(ctx.user_id, req).await?;
    info!("[CARBON] Accrued {} credits", result.calculation.credits);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Carbon credits calculated and added", result)),
    ))
}

/// **Route**: `POST /api/carbon/withdraw`
#[instrument(skip_all, fields(user_id = ctx.user_id))]
pub async fn withdraw_credits(
    State(ledger): State<Arc<CarbonLedger>>,
    State(db): State<DbPool>,
    Extension(ctx): Extension<Ctx>,
    ApiJson(req): ApiJson<WithdrawRequest>,
) -> Result<(StatusCode, Json<ApiResponse<WithdrawResponse>>)> {
    let result = service(ledger, db).withdraw(ctx.user_id, req).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Withdrawal request submitted", result)),
    ))
}

/// **Route**: `GET /api/carbon/history`
#[instrument(skip_all, fields(user_id = ctx.user_id))]
pub async fn get_history(
    State(ledger): State<Arc<CarbonLedger>>,
    State(db): State<DbPool>,
    Extension(ctx): Extension<Ctx>,
    ApiQuery(query): ApiQuery<HistoryQuery>,
) -> Result<Json<ApiResponse<Vec<CarbonTransaction>>>> {
    let history = service(ledger, db).history(ctx.user_id, query.days).await?;
    Ok(Json(ApiResponse::ok(history)))
}

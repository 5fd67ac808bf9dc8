//! # Carbon DTOs
//!
//! Request and response bodies of the `/api/carbon` routes.
//!
//! ## Endpoints Using These DTOs
//!
//! - `GET  /api/carbon/wallet` -> [`WalletView`]
//! - `POST /api/carbon/calculate` - [`CalculateCreditsRequest`] -> [`CalculateCreditsResponse`]
//! - `POST /api/carbon/withdraw` - [`WithdrawRequest`] -> [`WithdrawResponse`]
//! - `GET  /api/carbon/history?days=90` - [`HistoryQuery`] -> `Vec<CarbonTransaction>`
//!
//! ## Example
//!
//! ```text
//! POST /api/carbon/calculate
//!
//! { "energyKWh": 1000, "waterLiters": 50000 }
//! ```
//!
//! Response:
//! ```text
//! {
//!   "success": true,
//!   "message": "Carbon credits calculated and added",
//!   "data": {
//!     "transaction": { "creditsEarned": 0.92, "transactionType": "earned", ... },
//!     "calculation": { "credits": 0.92, "co2Reduced": 920, "breakdown": { "fromSolar": 820, "fromWater": 100 } }
//!   }
//! }
//! ```

use crate::model::carbon::CreditBreakdown;
use crate::model::store::models::CarbonTransaction;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Processing time quoted for every withdrawal.
pub const WITHDRAWAL_PROCESSING_TIME: &str = "3-5 business days";

// region: --- Requests

/// Body of `POST /api/carbon/calculate`. Absent amounts count as zero.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct CalculateCreditsRequest {
    #[serde(rename = "energyKWh")]
    pub energy_kwh: Option<f64>,
    #[serde(rename = "waterLiters")]
    pub water_liters: Option<f64>,
    pub description: Option<String>,
}

/// Body of `POST /api/carbon/withdraw`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct WithdrawRequest {
    pub credits: f64,
    /// Payout method, e.g. "UPI". Defaults to "bank transfer".
    pub method: Option<String>,
}

/// Query of `GET /api/carbon/history`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct HistoryQuery {
    pub days: Option<i64>,
}

// endregion: --- Requests

// region: --- Responses

/// Rounded calculation returned with a new accrual.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalculationView {
    /// 3 decimal places
    pub credits: f64,
    /// kg, 2 decimal places
    pub co2_reduced: f64,
    pub breakdown: CreditBreakdown,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CalculateCreditsResponse {
    pub transaction: CarbonTransaction,
    pub calculation: CalculationView,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawResponse {
    pub transaction: CarbonTransaction,
    pub processing_time: String,
    /// Currency value of the withdrawn credits
    pub amount: f64,
}

/// Credit balances of the wallet.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WalletBalances {
    pub total_credits: f64,
    pub withdrawn_credits: f64,
    pub available_credits: f64,
    pub monetary_value: f64,
}

/// Environmental equivalents of all recorded reductions.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImpactView {
    /// Liters
    pub water_saved: f64,
    /// kg
    pub co2_reduced: f64,
    pub trees_equivalent: f64,
    pub car_miles_offset: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MarketInfo {
    pub current_rate: f64,
    pub trend: String,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WalletInsights {
    pub monthly_average: f64,
    pub projected_annual: f64,
}

/// Body of `GET /api/carbon/wallet`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WalletView {
    pub wallet: WalletBalances,
    pub impact: ImpactView,
    pub market_info: MarketInfo,
    /// The most recent transactions, newest first
    pub transactions: Vec<CarbonTransaction>,
    pub insights: WalletInsights,
}

// endregion: --- Responses

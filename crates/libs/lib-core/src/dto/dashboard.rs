//! # Dashboard DTOs
//!
//! Body of `GET /api/dashboard`: one summary of the caller's farm across the
//! solar log, the crop tracker and the carbon ledger.

use crate::model::store::models::{Crop, Location, SolarReading};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmSummary {
    pub name: String,
    /// Acres
    pub size: f64,
    pub health_score: i64,
    pub location: Location,
}

/// Estimated income in currency units, rounded to whole units.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct IncomeSummary {
    pub solar: f64,
    pub crop: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolarOverview {
    pub installed: bool,
    /// kW
    pub capacity: f64,
    /// kWh over the last 30 days
    pub energy_produced: f64,
    /// Efficiency of the latest reading, 0 without readings
    pub efficiency: f64,
    pub recent_data: Vec<SolarReading>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CropOverview {
    pub active: usize,
    pub list: Vec<Crop>,
}

/// Earned-side carbon figures.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CarbonOverview {
    pub credits: f64,
    pub water_saved: f64,
    pub co2_reduced: f64,
    pub monetary_value: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub farm: FarmSummary,
    pub income: IncomeSummary,
    pub solar: SolarOverview,
    pub crops: CropOverview,
    pub carbon: CarbonOverview,
}

//! Solar production log DTOs.

use crate::model::store::models::{DustLevel, SolarReading};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/solar/data`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AddSolarDataRequest {
    /// kWh
    pub energy_produced: f64,
    /// Percent, defaults to 85
    pub efficiency: Option<f64>,
    pub dust_level: Option<DustLevel>,
    /// Celsius, defaults to 25
    pub panel_temperature: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct SolarHistoryQuery {
    pub days: Option<i64>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SolarSummary {
    pub total_energy: f64,
    pub total_revenue: f64,
    pub avg_efficiency: f64,
    /// Number of readings in the window
    pub days: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SolarHistoryResponse {
    pub history: Vec<SolarReading>,
    pub summary: SolarSummary,
}

//! # Farm DTOs
//!
//! Onboarding and profile edits for the caller's farm.
//!
//! ```json
//! {
//!   "farmName": "Green Acres",
//!   "location": { "latitude": 20.29, "longitude": 85.82, "district": "Khordha", "state": "Odisha" },
//!   "farmSize": 2.5,
//!   "soilType": "loamy",
//!   "solarInstalled": true,
//!   "solarCapacityKW": 5
//! }
//! ```

use crate::model::store::models::{Location, SoilType};
use serde::Deserialize;

/// Body of `POST /api/farm`.
///
/// Unset panel fields fall back to 3 m height, 25° tilt and no panels.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateFarmRequest {
    pub farm_name: String,
    pub location: Location,
    /// Acres
    pub farm_size: f64,
    pub soil_type: Option<SoilType>,
    pub solar_installed: Option<bool>,
    #[serde(rename = "solarCapacityKW")]
    pub solar_capacity_kw: Option<f64>,
    pub panel_height: Option<f64>,
    pub panel_tilt: Option<f64>,
    pub panel_count: Option<i64>,
}

/// Partial location change; unset fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LocationPatch {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub district: Option<String>,
    pub state: Option<String>,
}

/// Body of `PUT /api/farm`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFarmRequest {
    pub farm_name: Option<String>,
    pub location: Option<LocationPatch>,
    pub farm_size: Option<f64>,
    pub soil_type: Option<SoilType>,
    pub solar_installed: Option<bool>,
    #[serde(rename = "solarCapacityKW")]
    pub solar_capacity_kw: Option<f64>,
    pub panel_height: Option<f64>,
    pub panel_tilt: Option<f64>,
    pub panel_count: Option<i64>,
    pub health_score: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_wire_names() {
        let req: CreateFarmRequest = serde_json::from_str(
            r#"{
                "farmName": "Green Acres",
                "location": { "latitude": 20.29, "longitude": 85.82 },
                "farmSize": 2.5,
                "soilType": "sandy",
                "solarCapacityKW": 5
            }"#,
        )
        .unwrap();

        assert_eq!(req.soil_type, Some(SoilType::Sandy));
        assert_eq!(req.solar_capacity_kw, Some(5.0));
        assert_eq!(req.location.district, None);
        assert_eq!(req.panel_tilt, None);
    }
}

//! Crop tracker DTOs.

use crate::model::store::models::{CropStatus, Season, SoilType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/crop`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateCropRequest {
    pub crop_name: String,
    pub season: Season,
    pub sowing_date: DateTime<Utc>,
    pub expected_harvest_date: DateTime<Utc>,
    /// Quintals
    pub predicted_yield: Option<f64>,
}

/// Body of `PUT /api/crop/{id}`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCropRequest {
    pub crop_name: Option<String>,
    pub season: Option<Season>,
    pub sowing_date: Option<DateTime<Utc>>,
    pub expected_harvest_date: Option<DateTime<Utc>>,
    pub predicted_yield: Option<f64>,
    pub actual_yield: Option<f64>,
    pub health_score: Option<i64>,
    pub risk_score: Option<i64>,
    pub status: Option<CropStatus>,
}

/// Body of `POST /api/crop/recommend`.
///
/// Unset fields fall back to the farm's soil type, 600 mm of rainfall and
/// the kharif season.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecommendCropsRequest {
    pub soil_type: Option<SoilType>,
    /// Seasonal rainfall, mm
    pub rainfall: Option<f64>,
    pub season: Option<Season>,
}

/// One crop suited to growing under panels.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CropRecommendation {
    pub name: &'static str,
    /// Quintals per acre
    #[serde(rename = "yield")]
    pub expected_yield: f64,
    /// Currency units per acre
    pub revenue: f64,
    pub water_req: &'static str,
    pub shade_tolerance: &'static str,
}

/// Conditions the recommendations were made for, after defaults.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationCriteria {
    pub soil_type: SoilType,
    pub rainfall: f64,
    pub season: Season,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FarmDetails {
    pub soil_type: SoilType,
    /// Acres
    pub size: f64,
    pub solar_installed: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CropRecommendations {
    pub recommendations: Vec<CropRecommendation>,
    pub criteria: RecommendationCriteria,
    pub farm_details: FarmDetails,
}

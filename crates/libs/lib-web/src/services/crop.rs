//! # Crop Service
//!
//! Crop cycles planted on the caller's farm, and rule-based suggestions of
//! what to plant under the panels.

use lib_core::dto::{
    CreateCropRequest, CropRecommendation, CropRecommendations, FarmDetails, RecommendCropsRequest,
    RecommendationCriteria, UpdateCropRequest,
};
use lib_core::model::store::models::{Crop, CropForCreate, CropForUpdate, CropStatus, Farm, Season, SoilType};
use lib_core::model::store::CropRepository;
use lib_core::{AppError, DbPool, Result};
use lib_utils::{validate_non_negative, validate_not_empty};
use tracing::{info, instrument};

/// Rainfall assumed when a recommendation request names none, mm.
pub const DEFAULT_RAINFALL_MM: f64 = 600.0;

/// Rainfall separating wet-season from dry-land suggestions, mm.
const RAINFALL_THRESHOLD_MM: f64 = 500.0;

pub struct CropService {
    db: DbPool,
}

impl CropService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    /// Record a newly sown crop.
    #[instrument(skip(self, farm, req), fields(farm_id = farm.id, crop = %req.crop_name))]
    pub async fn add(&self, farm: &Farm, req: CreateCropRequest) -> Result<Crop> {
        validate_not_empty(&req.crop_name, "cropName").map_err(AppError::InvalidInput)?;
        if req.expected_harvest_date < req.sowing_date {
            return Err(AppError::InvalidInput(
                "expectedHarvestDate cannot be before sowingDate".to_string(),
            ));
        }
        let predicted_yield = req.predicted_yield.unwrap_or(0.0);
        validate_non_negative(predicted_yield, "predictedYield").map_err(AppError::InvalidInput)?;

        let crop = CropRepository::create(
            &self.db,
            &CropForCreate {
                farm_id: farm.id,
                crop_name: req.crop_name.trim().to_string(),
                season: req.season,
                sowing_date: req.sowing_date,
                expected_harvest_date: req.expected_harvest_date,
                predicted_yield,
                status: CropStatus::Sown,
            },
        )
        .await?;

        info!("[CROP] Added crop {} to farm {}", crop.id, farm.id);
        Ok(crop)
    }

    /// All crops of the farm, newest first.
    pub async fn list(&self, farm: &Farm) -> Result<Vec<Crop>> {
        Ok(CropRepository::find_by_farm(&self.db, farm.id).await?)
    }

    /// Edit a crop of the farm.
    ///
    /// # Errors
    ///
    /// [`AppError::NotFound`] if `crop_id` does not belong to `farm`.
    #[instrument(skip(self, farm, req), fields(farm_id = farm.id))]
    pub async fn update(&self, farm: &Farm, crop_id: i64, req: UpdateCropRequest) -> Result<Crop> {
        validate_update(&req)?;

        let current = CropRepository::find_for_farm(&self.db, farm.id, crop_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Crop not found".to_string()))?;

        let sowing = req.sowing_date.unwrap_or(current.sowing_date);
        let harvest = req.expected_harvest_date.unwrap_or(current.expected_harvest_date);
        if harvest < sowing {
            return Err(AppError::InvalidInput(
                "expectedHarvestDate cannot be before sowingDate".to_string(),
            ));
        }

        let changes = CropForUpdate {
            crop_name: req.crop_name.map(|n| n.trim().to_string()),
            season: req.season,
            sowing_date: req.sowing_date,
            expected_harvest_date: req.expected_harvest_date,
            predicted_yield: req.predicted_yield,
            actual_yield: req.actual_yield,
            health_score: req.health_score,
            risk_score: req.risk_score,
            status: req.status,
        };

        let crop = CropRepository::update(&self.db, farm.id, crop_id, &changes)
            .await?
            .ok_or_else(|| AppError::NotFound("Crop not found".to_string()))?;

        info!("[CROP] Updated crop {} ({})", crop.id, crop.status);
        Ok(crop)
    }

    /// Suggest crops for the farm. Unset criteria come from the farm or the defaults.
    #[instrument(skip(self, farm, req), fields(farm_id = farm.id))]
    pub fn recommend(&self, farm: &Farm, req: RecommendCropsRequest) -> Result<CropRecommendations> {
        let rainfall = req.rainfall.unwrap_or(DEFAULT_RAINFALL_MM);
        validate_non_negative(rainfall, "rainfall").map_err(AppError::InvalidInput)?;

        let criteria = RecommendationCriteria {
            soil_type: req.soil_type.unwrap_or(farm.soil_type),
            rainfall,
            season: req.season.unwrap_or(Season::Kharif),
        };

        Ok(CropRecommendations {
            recommendations: recommend_crops(criteria.soil_type, criteria.rainfall),
            criteria,
            farm_details: FarmDetails {
                soil_type: farm.soil_type,
                size: farm.farm_size,
                solar_installed: farm.solar_installed,
            },
        })
    }
}

fn validate_score(score: Option<i64>, field_name: &str) -> Result<()> {
    match score {
        Some(value) if !(0..=100).contains(&value) => Err(AppError::InvalidInput(format!(
            "{} must be between 0 and 100",
            field_name
        ))),
        _ => Ok(()),
    }
}

fn validate_update(req: &UpdateCropRequest) -> Result<()> {
    if let Some(name) = &req.crop_name {
        validate_not_empty(name, "cropName").map_err(AppError::InvalidInput)?;
    }
    if let Some(predicted) = req.predicted_yield {
        validate_non_negative(predicted, "predictedYield").map_err(AppError::InvalidInput)?;
    }
    if let Some(actual) = req.actual_yield {
        validate_non_negative(actual, "actualYield").map_err(AppError::InvalidInput)?;
    }
    validate_score(req.health_score, "healthScore")?;
    validate_score(req.risk_score, "riskScore")
}

// region: --- Recommendations

const fn crop(
    name: &'static str,
    expected_yield: f64,
    revenue: f64,
    water_req: &'static str,
    shade_tolerance: &'static str,
) -> CropRecommendation {
    CropRecommendation {
        name,
        expected_yield,
        revenue,
        water_req,
        shade_tolerance,
    }
}

/// Shade-tolerant crops for the given soil and rainfall.
///
/// Loamy soil with rainfall above 500 mm suits wet-season crops; sandy soil
/// or rainfall below 500 mm suits dry-land crops; anything else gets a mixed
/// list.
pub fn recommend_crops(soil_type: SoilType, rainfall: f64) -> Vec<CropRecommendation> {
    if soil_type == SoilType::Loamy && rainfall > RAINFALL_THRESHOLD_MM {
        vec![
            crop("Tomato", 250.0, 500_000.0, "Medium", "High"),
            crop("Turmeric", 180.0, 540_000.0, "Medium", "High"),
            crop("Rice", 300.0, 450_000.0, "High", "Medium"),
        ]
    } else if soil_type == SoilType::Sandy || rainfall < RAINFALL_THRESHOLD_MM {
        vec![
            crop("Millet", 150.0, 225_000.0, "Low", "High"),
            crop("Wheat", 200.0, 400_000.0, "Medium", "Medium"),
            crop("Groundnut", 120.0, 360_000.0, "Low", "Medium"),
        ]
    } else {
        vec![
            crop("Wheat", 200.0, 400_000.0, "Medium", "Medium"),
            crop("Millet", 150.0, 225_000.0, "Low", "High"),
            crop("Soybean", 180.0, 360_000.0, "Medium", "High"),
        ]
    }
}

// endregion: --- Recommendations

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use lib_core::_dev_utils::{init_test_db, seed_farm};

    fn request() -> CreateCropRequest {
        let sowing = Utc::now();
        CreateCropRequest {
            crop_name: "Turmeric".to_string(),
            season: Season::Kharif,
            sowing_date: sowing,
            expected_harvest_date: sowing + Duration::days(240),
            predicted_yield: Some(18.0),
        }
    }

    #[tokio::test]
    async fn test_add_and_harvest() {
        let pool = init_test_db().await;
        let (_, farm) = seed_farm(&pool, "ravi@example.in").await;
        let service = CropService::new(pool);

        let crop = service.add(&farm, request()).await.unwrap();
        assert_eq!(crop.status, CropStatus::Sown);

        let harvested = service
            .update(
                &farm,
                crop.id,
                UpdateCropRequest {
                    status: Some(CropStatus::Harvested),
                    actual_yield: Some(19.5),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(harvested.status, CropStatus::Harvested);
        assert_eq!(harvested.actual_yield, 19.5);
    }

    #[tokio::test]
    async fn test_harvest_before_sowing_rejected() {
        let pool = init_test_db().await;
        let (_, farm) = seed_farm(&pool, "ravi@example.in").await;

        let mut req = request();
        req.expected_harvest_date = req.sowing_date - Duration::days(1);

        let err = CropService::new(pool).add(&farm, req).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_update_other_farms_crop() {
        let pool = init_test_db().await;
        let (_, farm) = seed_farm(&pool, "ravi@example.in").await;
        let (_, other) = seed_farm(&pool, "meera@example.in").await;
        let service = CropService::new(pool);
        let crop = service.add(&farm, request()).await.unwrap();

        let err = service
            .update(&other, crop.id, UpdateCropRequest { health_score: Some(50), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    fn names(recommendations: &[CropRecommendation]) -> Vec<&'static str> {
        recommendations.iter().map(|c| c.name).collect()
    }

    #[test]
    fn test_recommendation_rules() {
        assert_eq!(names(&recommend_crops(SoilType::Loamy, 800.0)), ["Tomato", "Turmeric", "Rice"]);
        assert_eq!(names(&recommend_crops(SoilType::Sandy, 800.0)), ["Millet", "Wheat", "Groundnut"]);
        assert_eq!(names(&recommend_crops(SoilType::Loamy, 300.0)), ["Millet", "Wheat", "Groundnut"]);
        assert_eq!(names(&recommend_crops(SoilType::Clay, 800.0)), ["Wheat", "Millet", "Soybean"]);
        // Exactly 500 mm is neither wet nor dry
        assert_eq!(names(&recommend_crops(SoilType::Loamy, 500.0)), ["Wheat", "Millet", "Soybean"]);
    }

    #[tokio::test]
    async fn test_recommend_defaults_from_farm() {
        let pool = init_test_db().await;
        let (_, farm) = seed_farm(&pool, "ravi@example.in").await;
        let service = CropService::new(pool);

        let result = service.recommend(&farm, RecommendCropsRequest::default()).unwrap();
        assert_eq!(result.criteria.soil_type, SoilType::Loamy);
        assert_eq!(result.criteria.rainfall, DEFAULT_RAINFALL_MM);
        assert_eq!(result.criteria.season, Season::Kharif);
        assert_eq!(names(&result.recommendations), ["Tomato", "Turmeric", "Rice"]);
        assert_eq!(result.farm_details.size, 2.5);
        assert!(result.farm_details.solar_installed);

        let dry = service
            .recommend(
                &farm,
                RecommendCropsRequest {
                    soil_type: Some(SoilType::Sandy),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(names(&dry.recommendations), ["Millet", "Wheat", "Groundnut"]);
        assert_eq!(dry.farm_details.soil_type, SoilType::Loamy);

        let err = service
            .recommend(&farm, RecommendCropsRequest { rainfall: Some(-1.0), ..Default::default() })
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_score_bounds() {
        let req = UpdateCropRequest {
            risk_score: Some(101),
            ..Default::default()
        };
        assert!(validate_update(&req).is_err());
    }
}

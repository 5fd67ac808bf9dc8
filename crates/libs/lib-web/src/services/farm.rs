//! # Farm Directory
//!
//! Resolves a user to their single farm and manages onboarding and profile
//! edits. Every farm-scoped feature goes through [`FarmDirectory::for_user`]
//! so a caller without a farm consistently gets `404 Farm not found`.

use lib_core::dto::{CreateFarmRequest, UpdateFarmRequest};
use lib_core::model::store::models::{Farm, FarmForCreate, FarmForUpdate, Location, SoilType};
use lib_core::model::store::FarmRepository;
use lib_core::{AppError, DbPool, Result};
use lib_utils::{validate_in_range, validate_non_negative, validate_not_empty, validate_positive};
use tracing::{info, instrument};

const DEFAULT_PANEL_HEIGHT_M: f64 = 3.0;
const DEFAULT_PANEL_TILT_DEG: f64 = 25.0;

#[derive(Clone)]
pub struct FarmDirectory {
    db: DbPool,
}

impl FarmDirectory {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    /// The farm owned by `user_id`.
    ///
    /// # Errors
    ///
    /// [`AppError::NotFound`] ("Farm not found") when the user has not onboarded yet.
    pub async fn for_user(&self, user_id: i64) -> Result<Farm> {
        FarmRepository::find_by_user(&self.db, user_id)
            .await?
            .ok_or_else(AppError::farm_not_found)
    }

    /// Register the caller's farm.
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidInput`] on out-of-range fields
    /// - [`AppError::Conflict`] if the user already has a farm
    #[instrument(skip(self, req), fields(farm_name = %req.farm_name))]
    pub async fn onboard(&self, user_id: i64, req: CreateFarmRequest) -> Result<Farm> {
        validate_create(&req)?;

        if FarmRepository::find_by_user(&self.db, user_id).await?.is_some() {
            return Err(AppError::Conflict("Farm already exists for this user".to_string()));
        }

        let farm = FarmRepository::create(
            &self.db,
            &FarmForCreate {
                user_id,
                farm_name: req.farm_name.trim().to_string(),
                location: req.location,
                farm_size: req.farm_size,
                soil_type: req.soil_type.unwrap_or(SoilType::Loamy),
                solar_installed: req.solar_installed.unwrap_or(false),
                solar_capacity_kw: req.solar_capacity_kw.unwrap_or(0.0),
                panel_height: req.panel_height.unwrap_or(DEFAULT_PANEL_HEIGHT_M),
                panel_tilt: req.panel_tilt.unwrap_or(DEFAULT_PANEL_TILT_DEG),
                panel_count: req.panel_count.unwrap_or(0),
            },
        )
        .await?;

        info!("[FARM] Onboarded farm {} for user {}", farm.id, user_id);
        Ok(farm)
    }

    /// Apply a partial edit to the caller's farm.
    #[instrument(skip(self, req))]
    pub async fn update(&self, user_id: i64, req: UpdateFarmRequest) -> Result<Farm> {
        validate_update(&req)?;
        let farm = self.for_user(user_id).await?;

        let location = req.location.unwrap_or_default();
        let changes = FarmForUpdate {
            farm_name: req.farm_name.map(|n| n.trim().to_string()),
            latitude: location.latitude,
            longitude: location.longitude,
            address: location.address,
            district: location.district,
            state: location.state,
            farm_size: req.farm_size,
            soil_type: req.soil_type,
            solar_installed: req.solar_installed,
            solar_capacity_kw: req.solar_capacity_kw,
            panel_height: req.panel_height,
            panel_tilt: req.panel_tilt,
            panel_count: req.panel_count,
            health_score: req.health_score,
        };

        let updated = FarmRepository::update(&self.db, farm.id, &changes)
            .await?
            .ok_or_else(AppError::farm_not_found)?;

        info!("[FARM] Updated farm {}", updated.id);
        Ok(updated)
    }
}

// region: --- Validation

fn validate_location(location: &Location) -> Result<()> {
    validate_in_range(location.latitude, -90.0, 90.0, "latitude").map_err(AppError::InvalidInput)?;
    validate_in_range(location.longitude, -180.0, 180.0, "longitude").map_err(AppError::InvalidInput)?;
    Ok(())
}

fn validate_panels(
    solar_capacity_kw: Option<f64>,
    panel_height: Option<f64>,
    panel_tilt: Option<f64>,
    panel_count: Option<i64>,
) -> Result<()> {
    if let Some(capacity) = solar_capacity_kw {
        validate_non_negative(capacity, "solarCapacityKW").map_err(AppError::InvalidInput)?;
    }
    if let Some(height) = panel_height {
        validate_non_negative(height, "panelHeight").map_err(AppError::InvalidInput)?;
    }
    if let Some(tilt) = panel_tilt {
        validate_in_range(tilt, 0.0, 90.0, "panelTilt").map_err(AppError::InvalidInput)?;
    }
    if panel_count.is_some_and(|count| count < 0) {
        return Err(AppError::InvalidInput("panelCount must be a non-negative number".to_string()));
    }
    Ok(())
}

fn validate_create(req: &CreateFarmRequest) -> Result<()> {
    validate_not_empty(&req.farm_name, "farmName").map_err(AppError::InvalidInput)?;
    validate_location(&req.location)?;
    validate_positive(req.farm_size, "farmSize").map_err(AppError::InvalidInput)?;
    validate_panels(req.solar_capacity_kw, req.panel_height, req.panel_tilt, req.panel_count)
}

fn validate_update(req: &UpdateFarmRequest) -> Result<()> {
    if let Some(name) = &req.farm_name {
        validate_not_empty(name, "farmName").map_err(AppError::InvalidInput)?;
    }
    if let Some(location) = &req.location {
        if let Some(latitude) = location.latitude {
            validate_in_range(latitude, -90.0, 90.0, "latitude").map_err(AppError::InvalidInput)?;
        }
        if let Some(longitude) = location.longitude {
            validate_in_range(longitude, -180.0, 180.0, "longitude").map_err(AppError::InvalidInput)?;
        }
    }
    if let Some(size) = req.farm_size {
        validate_positive(size, "farmSize").map_err(AppError::InvalidInput)?;
    }
    if let Some(score) = req.health_score {
        if !(0..=100).contains(&score) {
            return Err(AppError::InvalidInput("healthScore must be between 0 and 100".to_string()));
        }
    }
    validate_panels(req.solar_capacity_kw, req.panel_height, req.panel_tilt, req.panel_count)
}

// endregion: --- Validation

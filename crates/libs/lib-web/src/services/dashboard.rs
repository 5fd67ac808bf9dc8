//! # Dashboard Service
//!
//! One-call summary of a farm: 30-day solar output and income, active crops
//! and earned carbon credits.

use lib_core::dto::{CarbonOverview, CropOverview, DashboardView, FarmSummary, IncomeSummary, SolarOverview};
use lib_core::model::store::models::{Farm, TransactionType};
use lib_core::model::store::{CarbonRepository, CropRepository, SolarRepository};
use lib_core::{Config, DbPool, Result};
use lib_utils::{days_ago, round_to};
use tracing::instrument;

/// Look-back window for solar figures, in days.
const SOLAR_WINDOW_DAYS: i64 = 30;

/// Readings listed under `solar.recentData`.
const RECENT_READINGS: usize = 7;

pub struct DashboardService {
    db: DbPool,
    config: Config,
    credit_rate: f64,
}

impl DashboardService {
    pub fn new(db: DbPool, config: Config, credit_rate: f64) -> Self {
        Self { db, config, credit_rate }
    }

    #[instrument(skip(self, farm), fields(farm_id = farm.id))]
    pub async fn build(&self, farm: Farm) -> Result<DashboardView> {
        let mut readings = SolarRepository::find_since(&self.db, farm.id, days_ago(SOLAR_WINDOW_DAYS)).await?;
        readings.reverse();

        let total_energy: f64 = readings.iter().map(|r| r.energy_produced).sum();
        let latest_efficiency = readings.first().map(|r| r.efficiency).unwrap_or(0.0);
        readings.truncate(RECENT_READINGS);

        let crops = CropRepository::find_active(&self.db, farm.id).await?;

        let solar_income = total_energy * self.config.solar_tariff_per_kwh;
        let crop_income: f64 = crops
            .iter()
            .map(|c| c.predicted_yield * self.config.crop_price_per_quintal)
            .sum();

        let earned = CarbonRepository::totals_by_type(&self.db, farm.id)
            .await?
            .into_iter()
            .find(|t| t.transaction_type == TransactionType::Earned);
        let (credits, water_saved, co2_reduced) = earned
            .map(|t| (t.credits, t.water_saved_liters, t.co2_reduced_kg))
            .unwrap_or_default();

        Ok(DashboardView {
            farm: FarmSummary {
                name: farm.farm_name,
                size: farm.farm_size,
                health_score: farm.health_score,
                location: farm.location,
            },
            income: IncomeSummary {
                solar: solar_income.round(),
                crop: crop_income.round(),
                total: (solar_income + crop_income).round(),
            },
            solar: SolarOverview {
                installed: farm.solar_installed,
                capacity: farm.solar_capacity_kw,
                energy_produced: total_energy.round(),
                efficiency: latest_efficiency,
                recent_data: readings,
            },
            crops: CropOverview {
                active: crops.len(),
                list: crops,
            },
            carbon: CarbonOverview {
                credits: round_to(credits, 2),
                water_saved: water_saved.round(),
                co2_reduced: round_to(co2_reduced, 2),
                monetary_value: (credits * self.credit_rate).round(),
            },
        })
    }
}

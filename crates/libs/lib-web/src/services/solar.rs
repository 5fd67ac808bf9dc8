//! # Solar Service
//!
//! Daily production log of a farm's panels. Revenue is priced at the
//! configured tariff when the reading is recorded.

use chrono::Utc;
use lib_core::dto::{AddSolarDataRequest, SolarHistoryResponse, SolarSummary};
use lib_core::model::store::models::{DustLevel, Farm, SolarReading, SolarReadingForCreate};
use lib_core::model::store::SolarRepository;
use lib_core::{AppError, DbPool, Result};
use lib_utils::{days_ago, round_to, validate_in_range, validate_non_negative};
use tracing::{info, instrument};

pub const DEFAULT_SOLAR_HISTORY_DAYS: i64 = 30;
const MAX_SOLAR_HISTORY_DAYS: i64 = 3650;
const DEFAULT_EFFICIENCY: f64 = 85.0;
const DEFAULT_PANEL_TEMPERATURE: f64 = 25.0;

pub struct SolarService {
    db: DbPool,
    tariff_per_kwh: f64,
}

impl SolarService {
    pub fn new(db: DbPool, tariff_per_kwh: f64) -> Self {
        Self { db, tariff_per_kwh }
    }

    #[instrument(skip(self, farm, req), fields(farm_id = farm.id))]
    pub async fn add_reading(&self, farm: &Farm, req: AddSolarDataRequest) -> Result<SolarReading> {
        validate_non_negative(req.energy_produced, "energyProduced").map_err(AppError::InvalidInput)?;
        let efficiency = req.efficiency.unwrap_or(DEFAULT_EFFICIENCY);
        validate_in_range(efficiency, 0.0, 100.0, "efficiency").map_err(AppError::InvalidInput)?;
        let panel_temperature = req.panel_temperature.unwrap_or(DEFAULT_PANEL_TEMPERATURE);
        validate_in_range(panel_temperature, -50.0, 150.0, "panelTemperature").map_err(AppError::InvalidInput)?;

        let reading = SolarRepository::create(
            &self.db,
            &SolarReadingForCreate {
                farm_id: farm.id,
                date: Utc::now(),
                energy_produced: req.energy_produced,
                efficiency,
                dust_level: req.dust_level.unwrap_or(DustLevel::Clean),
                panel_temperature,
                revenue: req.energy_produced * self.tariff_per_kwh,
            },
        )
        .await?;

        info!("[SOLAR] Recorded {} kWh for farm {}", reading.energy_produced, farm.id);
        Ok(reading)
    }

    /// Readings of the last `days` days (default 30), oldest first, with a summary.
    pub async fn history(&self, farm: &Farm, days: Option<i64>) -> Result<SolarHistoryResponse> {
        let days = days.unwrap_or(DEFAULT_SOLAR_HISTORY_DAYS);
        if !(0..=MAX_SOLAR_HISTORY_DAYS).contains(&days) {
            return Err(AppError::InvalidInput(format!(
                "days must be between 0 and {}",
                MAX_SOLAR_HISTORY_DAYS
            )));
        }

        let history = SolarRepository::find_since(&self.db, farm.id, days_ago(days)).await?;
        let summary = summarize(&history);
        Ok(SolarHistoryResponse { history, summary })
    }
}

/// Totals over a set of readings.
pub fn summarize(readings: &[SolarReading]) -> SolarSummary {
    let total_energy: f64 = readings.iter().map(|r| r.energy_produced).sum();
    let total_revenue: f64 = readings.iter().map(|r| r.revenue).sum();
    let avg_efficiency = if readings.is_empty() {
        0.0
    } else {
        readings.iter().map(|r| r.efficiency).sum::<f64>() / readings.len() as f64
    };

    SolarSummary {
        total_energy: round_to(total_energy, 1),
        total_revenue: total_revenue.round(),
        avg_efficiency: round_to(avg_efficiency, 1),
        days: readings.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lib_core::_dev_utils::{init_test_db, seed_farm};

    fn reading(energy: f64, efficiency: f64, revenue: f64) -> SolarReading {
        SolarReading {
            id: 0,
            farm_id: 1,
            date: Utc::now(),
            energy_produced: energy,
            efficiency,
            dust_level: DustLevel::Clean,
            panel_temperature: 25.0,
            weather_impact_score: 100,
            revenue,
        }
    }

    #[test]
    fn test_summarize() {
        let summary = summarize(&[reading(20.04, 85.0, 120.24), reading(18.0, 80.5, 108.0)]);

        assert_eq!(summary.total_energy, 38.0);
        assert_eq!(summary.total_revenue, 228.0);
        assert_eq!(summary.avg_efficiency, 82.8);
        assert_eq!(summary.days, 2);
    }

    #[test]
    fn test_summarize_empty() {
        let summary = summarize(&[]);
        assert_eq!(summary.avg_efficiency, 0.0);
        assert_eq!(summary.days, 0);
    }

    #[tokio::test]
    async fn test_add_reading_prices_revenue() {
        let pool = init_test_db().await;
        let (_, farm) = seed_farm(&pool, "ravi@example.in").await;
        let service = SolarService::new(pool, 6.0);

        let reading = service
            .add_reading(
                &farm,
                AddSolarDataRequest {
                    energy_produced: 22.5,
                    efficiency: None,
                    dust_level: None,
                    panel_temperature: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(reading.revenue, 135.0);
        assert_eq!(reading.efficiency, 85.0);
        assert_eq!(reading.dust_level, DustLevel::Clean);

        let history = service.history(&farm, None).await.unwrap();
        assert_eq!(history.summary.days, 1);
        assert!(service.history(&farm, Some(-1)).await.is_err());
    }
}

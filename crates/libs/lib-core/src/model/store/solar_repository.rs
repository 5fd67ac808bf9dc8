//! # Solar Repository
//!
//! Time-series storage for solar production readings.

use super::models::{SolarReading, SolarReadingForCreate};
use super::DbPool;
use chrono::{DateTime, Utc};
use sqlx::query_as;

pub struct SolarRepository;

impl SolarRepository {
    pub async fn create(pool: &DbPool, reading: &SolarReadingForCreate) -> Result<SolarReading, sqlx::Error> {
        query_as::<_, SolarReading>(
            r#"
            INSERT INTO solar_readings (farm_id, date, energy_produced, efficiency, dust_level, panel_temperature, weather_impact_score, revenue)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, 100, ?7)
            RETURNING *
            "#,
        )
        .bind(reading.farm_id)
        .bind(reading.date)
        .bind(reading.energy_produced)
        .bind(reading.efficiency)
        .bind(reading.dust_level.as_str())
        .bind(reading.panel_temperature)
        .bind(reading.revenue)
        .fetch_one(pool)
        .await
    }

    /// Readings dated on or after `since`, oldest first.
    pub async fn find_since(
        pool: &DbPool,
        farm_id: i64,
        since: DateTime<Utc>,
    ) -> Result<Vec<SolarReading>, sqlx::Error> {
        query_as::<_, SolarReading>(
            "SELECT * FROM solar_readings WHERE farm_id = ? AND date >= ? ORDER BY date ASC, id ASC",
        )
        .bind(farm_id)
        .bind(since)
        .fetch_all(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::_dev_utils::{init_test_db, seed_farm};
    use crate::model::store::models::DustLevel;
    use chrono::Duration;

    #[tokio::test]
    async fn test_find_since_is_chronological() {
        let pool = init_test_db().await;
        let (_, farm) = seed_farm(&pool, "ravi@example.in").await;
        let now = Utc::now();

        for days in [2, 40, 1, 10] {
            SolarRepository::create(
                &pool,
                &SolarReadingForCreate {
                    farm_id: farm.id,
                    date: now - Duration::days(days),
                    energy_produced: 20.0,
                    efficiency: 85.0,
                    dust_level: DustLevel::Clean,
                    panel_temperature: 25.0,
                    revenue: 120.0,
                },
            )
            .await
            .unwrap();
        }

        let readings = SolarRepository::find_since(&pool, farm.id, now - Duration::days(30)).await.unwrap();
        assert_eq!(readings.len(), 3);
        assert!(readings.windows(2).all(|w| w[0].date <= w[1].date));
        assert_eq!(readings[0].weather_impact_score, 100);
    }
}

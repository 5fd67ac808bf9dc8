//! # Crop Repository
//!
//! Crop cycles belonging to a farm. Lookups and updates are always scoped by
//! `farm_id` so one farm can never touch another farm's crops.

use super::models::{Crop, CropForCreate, CropForUpdate, CropStatus};
use super::DbPool;
use chrono::Utc;
use sqlx::query_as;

pub struct CropRepository;

impl CropRepository {
    pub async fn create(pool: &DbPool, crop: &CropForCreate) -> Result<Crop, sqlx::Error> {
        let now = Utc::now();

        query_as::<_, Crop>(
            r#"
            INSERT INTO crops (
                farm_id, crop_name, season, sowing_date, expected_harvest_date,
                predicted_yield, actual_yield, health_score, risk_score, status, created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, 80, 20, ?7, ?8, ?8)
            RETURNING *
            "#,
        )
        .bind(crop.farm_id)
        .bind(&crop.crop_name)
        .bind(crop.season.as_str())
        .bind(crop.sowing_date)
        .bind(crop.expected_harvest_date)
        .bind(crop.predicted_yield)
        .bind(crop.status.as_str())
        .bind(now)
        .fetch_one(pool)
        .await
    }

    /// All crops of a farm, newest first.
    pub async fn find_by_farm(pool: &DbPool, farm_id: i64) -> Result<Vec<Crop>, sqlx::Error> {
        query_as::<_, Crop>("SELECT * FROM crops WHERE farm_id = ? ORDER BY created_at DESC, id DESC")
            .bind(farm_id)
            .fetch_all(pool)
            .await
    }

    /// Crops that have not been harvested yet, newest first.
    pub async fn find_active(pool: &DbPool, farm_id: i64) -> Result<Vec<Crop>, sqlx::Error> {
        query_as::<_, Crop>(
            "SELECT * FROM crops WHERE farm_id = ? AND status != ? ORDER BY created_at DESC, id DESC",
        )
        .bind(farm_id)
        .bind(CropStatus::Harvested.as_str())
        .fetch_all(pool)
        .await
    }

    pub async fn find_for_farm(pool: &DbPool, farm_id: i64, id: i64) -> Result<Option<Crop>, sqlx::Error> {
        query_as::<_, Crop>("SELECT * FROM crops WHERE id = ? AND farm_id = ?")
            .bind(id)
            .bind(farm_id)
            .fetch_optional(pool)
            .await
    }

    /// Apply a partial update to a crop of `farm_id`.
    ///
    /// Returns `Ok(None)` when the crop does not exist on that farm.
    pub async fn update(
        pool: &DbPool,
        farm_id: i64,
        id: i64,
        changes: &CropForUpdate,
    ) -> Result<Option<Crop>, sqlx::Error> {
        query_as::<_, Crop>(
            r#"
            UPDATE crops SET
                crop_name = COALESCE(?1, crop_name),
                season = COALESCE(?2, season),
                sowing_date = COALESCE(?3, sowing_date),
                expected_harvest_date = COALESCE(?4, expected_harvest_date),
                predicted_yield = COALESCE(?5, predicted_yield),
                actual_yield = COALESCE(?6, actual_yield),
                health_score = COALESCE(?7, health_score),
                risk_score = COALESCE(?8, risk_score),
                status = COALESCE(?9, status),
                updated_at = ?10
            WHERE id = ?11 AND farm_id = ?12
            RETURNING *
            "#,
        )
        .bind(&changes.crop_name)
        .bind(changes.season.map(|s| s.as_str()))
        .bind(changes.sowing_date)
        .bind(changes.expected_harvest_date)
        .bind(changes.predicted_yield)
        .bind(changes.actual_yield)
        .bind(changes.health_score)
        .bind(changes.risk_score)
        .bind(changes.status.map(|s| s.as_str()))
        .bind(Utc::now())
        .bind(id)
        .bind(farm_id)
        .fetch_optional(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::_dev_utils::{init_test_db, seed_farm};
    use crate::model::store::models::Season;
    use chrono::Duration;

    fn tomato(farm_id: i64) -> CropForCreate {
        let sowing = Utc::now();
        CropForCreate {
            farm_id,
            crop_name: "Tomato".to_string(),
            season: Season::Kharif,
            sowing_date: sowing,
            expected_harvest_date: sowing + Duration::days(90),
            predicted_yield: 25.0,
            status: CropStatus::Sown,
        }
    }

    #[tokio::test]
    async fn test_create_defaults() {
        let pool = init_test_db().await;
        let (_, farm) = seed_farm(&pool, "ravi@example.in").await;

        let crop = CropRepository::create(&pool, &tomato(farm.id)).await.unwrap();
        assert_eq!(crop.health_score, 80);
        assert_eq!(crop.risk_score, 20);
        assert_eq!(crop.status, CropStatus::Sown);
        assert_eq!(crop.actual_yield, 0.0);
    }

    #[tokio::test]
    async fn test_update_is_scoped_to_farm() {
        let pool = init_test_db().await;
        let (_, farm) = seed_farm(&pool, "ravi@example.in").await;
        let (_, other_farm) = seed_farm(&pool, "meera@example.in").await;
        let crop = CropRepository::create(&pool, &tomato(farm.id)).await.unwrap();

        let changes = CropForUpdate {
            status: Some(CropStatus::Harvested),
            actual_yield: Some(27.5),
            ..Default::default()
        };

        assert!(CropRepository::update(&pool, other_farm.id, crop.id, &changes).await.unwrap().is_none());

        let updated = CropRepository::update(&pool, farm.id, crop.id, &changes).await.unwrap().unwrap();
        assert_eq!(updated.status, CropStatus::Harvested);
        assert_eq!(updated.actual_yield, 27.5);
        assert_eq!(updated.crop_name, "Tomato");

        assert!(CropRepository::find_active(&pool, farm.id).await.unwrap().is_empty());
        assert_eq!(CropRepository::find_by_farm(&pool, farm.id).await.unwrap().len(), 1);
    }
}

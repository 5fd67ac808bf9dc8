//! # Farm Repository
//!
//! Database access for farm profiles. The `farms.user_id` column is UNIQUE,
//! which enforces one farm per user at the storage level.

use super::models::{Farm, FarmForCreate, FarmForUpdate};
use super::DbPool;
use chrono::Utc;
use sqlx::query_as;

pub struct FarmRepository;

impl FarmRepository {
    /// Insert a new farm.
    ///
    /// # Errors
    ///
    /// Returns a UNIQUE constraint violation if the user already has a farm.
    pub async fn create(pool: &DbPool, farm: &FarmForCreate) -> Result<Farm, sqlx::Error> {
        let now = Utc::now();

        query_as::<_, Farm>(
            r#"
            INSERT INTO farms (
                user_id, farm_name, latitude, longitude, address, district, state,
                farm_size, soil_type, solar_installed, solar_capacity_kw,
                panel_height, panel_tilt, panel_count, health_score, created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, 75, ?15, ?15)
            RETURNING *
            "#,
        )
        .bind(farm.user_id)
        .bind(&farm.farm_name)
        .bind(farm.location.latitude)
        .bind(farm.location.longitude)
        .bind(&farm.location.address)
        .bind(&farm.location.district)
        .bind(&farm.location.state)
        .bind(farm.farm_size)
        .bind(farm.soil_type.as_str())
        .bind(farm.solar_installed)
        .bind(farm.solar_capacity_kw)
        .bind(farm.panel_height)
        .bind(farm.panel_tilt)
        .bind(farm.panel_count)
        .bind(now)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &DbPool, id: i64) -> Result<Option<Farm>, sqlx::Error> {
        query_as::<_, Farm>("SELECT * FROM farms WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the farm owned by a user.
    pub async fn find_by_user(pool: &DbPool, user_id: i64) -> Result<Option<Farm>, sqlx::Error> {
        query_as::<_, Farm>("SELECT * FROM farms WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Apply a partial update. Unset fields keep their stored value.
    ///
    /// Returns `Ok(None)` when no farm has this ID.
    pub async fn update(pool: &DbPool, id: i64, changes: &FarmForUpdate) -> Result<Option<Farm>, sqlx::Error> {
        query_as::<_, Farm>(
            r#"
            UPDATE farms SET
                farm_name = COALESCE(?1, farm_name),
                latitude = COALESCE(?2, latitude),
                longitude = COALESCE(?3, longitude),
                address = COALESCE(?4, address),
                district = COALESCE(?5, district),
                state = COALESCE(?6, state),
                farm_size = COALESCE(?7, farm_size),
                soil_type = COALESCE(?8, soil_type),
                solar_installed = COALESCE(?9, solar_installed),
                solar_capacity_kw = COALESCE(?10, solar_capacity_kw),
                panel_height = COALESCE(?11, panel_height),
                panel_tilt = COALESCE(?12, panel_tilt),
                panel_count = COALESCE(?13, panel_count),
                health_score = COALESCE(?14, health_score),
                updated_at = ?15
            WHERE id = ?16
            RETURNING *
            "#,
        )
        .bind(&changes.farm_name)
        .bind(changes.latitude)
        .bind(changes.longitude)
        .bind(&changes.address)
        .bind(&changes.district)
        .bind(&changes.state)
        .bind(changes.farm_size)
        .bind(changes.soil_type.map(|s| s.as_str()))
        .bind(changes.solar_installed)
        .bind(changes.solar_capacity_kw)
        .bind(changes.panel_height)
        .bind(changes.panel_tilt)
        .bind(changes.panel_count)
        .bind(changes.health_score)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::_dev_utils::{init_test_db, seed_user, sample_farm};
    use crate::model::store::models::SoilType;

    #[tokio::test]
    async fn test_create_and_find_by_user() {
        let pool = init_test_db().await;
        let user = seed_user(&pool, "ravi@example.in").await;

        let farm = FarmRepository::create(&pool, &sample_farm(user.id)).await.unwrap();
        assert_eq!(farm.user_id, user.id);
        assert_eq!(farm.soil_type, SoilType::Loamy);
        assert_eq!(farm.health_score, 75);
        assert_eq!(farm.location.district.as_deref(), Some("Khordha"));

        let found = FarmRepository::find_by_user(&pool, user.id).await.unwrap().unwrap();
        assert_eq!(found.id, farm.id);
    }

    #[tokio::test]
    async fn test_second_farm_for_user_is_rejected() {
        let pool = init_test_db().await;
        let user = seed_user(&pool, "ravi@example.in").await;

        FarmRepository::create(&pool, &sample_farm(user.id)).await.unwrap();
        let err = FarmRepository::create(&pool, &sample_farm(user.id)).await.unwrap_err();

        match err {
            sqlx::Error::Database(db_err) => assert!(db_err.is_unique_violation()),
            other => panic!("expected unique violation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_partial_update_keeps_other_fields() {
        let pool = init_test_db().await;
        let user = seed_user(&pool, "ravi@example.in").await;
        let farm = FarmRepository::create(&pool, &sample_farm(user.id)).await.unwrap();

        let changes = FarmForUpdate {
            solar_installed: Some(true),
            solar_capacity_kw: Some(10.0),
            soil_type: Some(SoilType::Clay),
            ..Default::default()
        };
        let updated = FarmRepository::update(&pool, farm.id, &changes).await.unwrap().unwrap();

        assert!(updated.solar_installed);
        assert_eq!(updated.solar_capacity_kw, 10.0);
        assert_eq!(updated.soil_type, SoilType::Clay);
        assert_eq!(updated.farm_name, farm.farm_name);
        assert_eq!(updated.farm_size, farm.farm_size);

        assert!(FarmRepository::update(&pool, 9999, &changes).await.unwrap().is_none());
    }
}

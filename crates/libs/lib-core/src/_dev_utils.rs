//! # Development Utilities
//!
//! Test databases and seed data for tests across the workspace.

use crate::model::store::models::{Farm, FarmForCreate, Location, SoilType, User, UserForCreate};
use crate::model::store::{create_pool, migrate, DbPool, FarmRepository, UserRepository};
use crate::Config;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use tempfile::TempDir;

/// Workspace migrations directory, resolved from this crate's manifest.
pub const MIGRATIONS_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../../migrations");

/// Create a migrated in-memory database.
///
/// The pool holds exactly one connection that never expires, so the
/// in-memory database lives as long as the pool.
pub async fn init_test_db() -> DbPool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("valid in-memory url")
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("Failed to create test database");

    migrate(&pool, Path::new(MIGRATIONS_DIR))
        .await
        .expect("Failed to run migrations");

    pool
}

/// Create a migrated file-backed database behind the production pool
/// settings (WAL, busy timeout) with `max_connections` connections.
///
/// The database lives in the returned directory; keep it alive for the
/// duration of the test.
pub async fn init_file_db(max_connections: u32) -> (DbPool, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = Config {
        database_url: format!("sqlite:{}", dir.path().join("agrovolt-test.db").display()),
        db_max_connections: max_connections,
        ..Config::default()
    };

    let pool = create_pool(&config).await.expect("Failed to create file database");
    migrate(&pool, Path::new(MIGRATIONS_DIR))
        .await
        .expect("Failed to run migrations");

    (pool, dir)
}

/// Insert a farmer profile with the given email.
pub async fn seed_user(pool: &DbPool, email: &str) -> User {
    UserRepository::create(pool, &UserForCreate::new("Test Farmer".to_string(), email.to_string()))
        .await
        .expect("Failed to seed user")
}

/// Onboarding data for a small loamy farm near Bhubaneswar.
pub fn sample_farm(user_id: i64) -> FarmForCreate {
    FarmForCreate {
        user_id,
        farm_name: "Green Acres".to_string(),
        location: Location {
            latitude: 20.2961,
            longitude: 85.8245,
            address: None,
            district: Some("Khordha".to_string()),
            state: Some("Odisha".to_string()),
        },
        farm_size: 2.5,
        soil_type: SoilType::Loamy,
        solar_installed: true,
        solar_capacity_kw: 5.0,
        panel_height: 3.0,
        panel_tilt: 25.0,
        panel_count: 12,
    }
}

/// Insert a user and their farm.
pub async fn seed_farm(pool: &DbPool, email: &str) -> (User, Farm) {
    let user = seed_user(pool, email).await;
    let farm = FarmRepository::create(pool, &sample_farm(user.id))
        .await
        .expect("Failed to seed farm");
    (user, farm)
}

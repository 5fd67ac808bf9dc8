//! # Database Store
//!
//! Database connection pool, migrations and repository implementations.

// region: --- Modules
pub mod carbon_repository;
pub mod crop_repository;
pub mod farm_repository;
pub mod models;
pub mod solar_repository;
pub mod user_repository;
// endregion: --- Modules

// region: --- Re-exports
pub use carbon_repository::{CarbonRepository, TypeTotals};
pub use crop_repository::CropRepository;
pub use farm_repository::FarmRepository;
pub use solar_repository::SolarRepository;
pub use user_repository::UserRepository;
// endregion: --- Re-exports

// region: --- Types and Functions
use crate::Config;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Type alias for SQLite connection pool.
pub type DbPool = SqlitePool;

/// How long a statement waits on a locked database, and a request waits for a pooled connection.
const STORAGE_TIMEOUT: Duration = Duration::from_secs(5);

/// Create a new SQLite connection pool.
///
/// WAL journaling lets readers proceed while a ledger write is in flight.
pub async fn create_pool(config: &Config) -> anyhow::Result<DbPool> {
    let options = config
        .database_url
        .parse::<SqliteConnectOptions>()?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(STORAGE_TIMEOUT);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(STORAGE_TIMEOUT)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Begin a transaction that takes the database write lock up front.
///
/// Use for any transaction that reads before it writes. Under WAL a deferred
/// transaction cannot upgrade to a writer once another connection has
/// committed, and that failure skips the busy timeout.
pub async fn begin_write(pool: &DbPool) -> Result<Transaction<'static, Sqlite>, sqlx::Error> {
    pool.begin_with("BEGIN IMMEDIATE").await
}

/// Apply the SQL migrations found in `dir`.
pub async fn migrate(pool: &DbPool, dir: &Path) -> crate::Result<()> {
    info!("Running database migrations from: {}", dir.display());
    let migrator = sqlx::migrate::Migrator::new(dir).await?;
    migrator.run(pool).await?;
    Ok(())
}
// endregion: --- Types and Functions

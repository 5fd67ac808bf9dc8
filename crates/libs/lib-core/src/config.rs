//! # Application Configuration
//!
//! This module manages application configuration loaded from environment variables.
//! All configuration is validated on startup to fail fast if misconfigured.
//!
//! ```rust,no_run
//! use lib_core::Config;
//!
//! let config = Config::from_env()?;
//! config.validate()?;
//! # Ok::<(), String>(())
//! ```

use lib_utils::{get_env_or, get_env_parse_or};

/// Default credit rate in currency units (INR) per carbon credit.
pub const DEFAULT_CREDIT_RATE: f64 = 1500.0;

/// Application configuration loaded from environment variables.
#[derive(Clone, Debug)]
pub struct Config {
    /// SQLite database connection URL
    pub database_url: String,

    /// Maximum number of pooled database connections
    pub db_max_connections: u32,

    /// Currency units paid per carbon credit (1 credit = 1 t CO2e)
    ///
    /// Captured on every ledger row at creation time, so changing it
    /// only affects new transactions.
    pub credit_rate: f64,

    /// Revenue per kWh of solar energy produced
    pub solar_tariff_per_kwh: f64,

    /// Average sale price per quintal, used for crop income estimates
    pub crop_price_per_quintal: f64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        let database_url = get_env_or("DATABASE_URL", "sqlite:data/agrovolt.db");

        let db_max_connections = get_env_parse_or("DB_MAX_CONNECTIONS", 5u32)
            .map_err(|e| format!("DB_MAX_CONNECTIONS must be a valid number: {}", e))?;

        let credit_rate = get_env_parse_or("CARBON_CREDIT_RATE", DEFAULT_CREDIT_RATE)
            .map_err(|e| format!("CARBON_CREDIT_RATE must be a valid number: {}", e))?;

        let solar_tariff_per_kwh = get_env_parse_or("SOLAR_TARIFF_PER_KWH", 6.0)
            .map_err(|e| format!("SOLAR_TARIFF_PER_KWH must be a valid number: {}", e))?;

        let crop_price_per_quintal = get_env_parse_or("CROP_PRICE_PER_QUINTAL", 2000.0)
            .map_err(|e| format!("CROP_PRICE_PER_QUINTAL must be a valid number: {}", e))?;

        Ok(Self {
            database_url,
            db_max_connections,
            credit_rate,
            solar_tariff_per_kwh,
            crop_price_per_quintal,
        })
    }

    /// Validate configuration values against business rules.
    pub fn validate(&self) -> Result<(), String> {
        if !self.database_url.starts_with("sqlite:") {
            return Err("DATABASE_URL must be a sqlite: URL".to_string());
        }

        if self.db_max_connections < 1 || self.db_max_connections > 100 {
            return Err("DB_MAX_CONNECTIONS must be between 1 and 100".to_string());
        }

        if !self.credit_rate.is_finite() || self.credit_rate <= 0.0 {
            return Err("CARBON_CREDIT_RATE must be greater than zero".to_string());
        }

        if !self.solar_tariff_per_kwh.is_finite() || self.solar_tariff_per_kwh < 0.0 {
            return Err("SOLAR_TARIFF_PER_KWH must not be negative".to_string());
        }

        if !self.crop_price_per_quintal.is_finite() || self.crop_price_per_quintal < 0.0 {
            return Err("CROP_PRICE_PER_QUINTAL must not be negative".to_string());
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite:data/agrovolt.db".to_string(),
            db_max_connections: 5,
            credit_rate: DEFAULT_CREDIT_RATE,
            solar_tariff_per_kwh: 6.0,
            crop_price_per_quintal: 2000.0,
        }
    }
}

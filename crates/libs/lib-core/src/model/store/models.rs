use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Declares a closed set of lowercase string values stored as TEXT.
///
/// Generates `as_str`, `Display`, `FromStr` and `TryFrom<String>` (used by
/// `#[sqlx(try_from = "String")]` when decoding rows).
macro_rules! text_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($text => Ok($name::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($name), s)),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = String;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                s.parse()
            }
        }
    };
}

text_enum!(
    /// Role of a registered user.
    Role { Farmer => "farmer", Epc => "epc", Admin => "admin" }
);

text_enum!(
    /// Subscription tier of a user.
    SubscriptionPlan { Free => "free", Basic => "basic", Premium => "premium" }
);

text_enum!(
    SoilType {
        Clay => "clay",
        Loamy => "loamy",
        Sandy => "sandy",
        Silt => "silt",
        Peat => "peat",
        Chalk => "chalk",
    }
);

text_enum!(
    /// Kind of carbon ledger entry.
    ///
    /// Only `Earned` and `Withdrawn` take part in the balance; `Traded`
    /// entries are recorded but excluded from both sides.
    TransactionType { Earned => "earned", Withdrawn => "withdrawn", Traded => "traded" }
);

text_enum!(
    DustLevel { Clean => "clean", Light => "light", Moderate => "moderate", Heavy => "heavy" }
);

text_enum!(
    /// Indian cropping season.
    Season { Kharif => "kharif", Rabi => "rabi", Zaid => "zaid" }
);

text_enum!(
    CropStatus { Planned => "planned", Sown => "sown", Growing => "growing", Harvested => "harvested" }
);

// region: --- User

/// User entity representing a complete user record from the database.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    #[sqlx(try_from = "String")]
    pub role: Role,
    #[sqlx(try_from = "String")]
    pub subscription_plan: SubscriptionPlan,
    pub language: String,
    /// Cached available carbon credits; always equal to the ledger balance of the user's farm.
    pub carbon_balance: f64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data structure for creating a new user.
#[derive(Debug, Clone)]
pub struct UserForCreate {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
    pub language: String,
}

impl UserForCreate {
    /// Create a new farmer profile with the default language.
    pub fn new(name: String, email: String) -> Self {
        Self {
            name,
            email,
            phone: None,
            role: Role::Farmer,
            language: "hindi".to_string(),
        }
    }
}

// endregion: --- User

// region: --- Farm

/// Geographic location of a farm.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    pub district: Option<String>,
    pub state: Option<String>,
}

/// Farm entity. At most one per user.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Farm {
    pub id: i64,
    pub user_id: i64,
    pub farm_name: String,
    #[sqlx(flatten)]
    pub location: Location,
    /// Land size in acres
    pub farm_size: f64,
    #[sqlx(try_from = "String")]
    pub soil_type: SoilType,
    pub solar_installed: bool,
    #[serde(rename = "solarCapacityKW")]
    pub solar_capacity_kw: f64,
    /// Meters
    pub panel_height: f64,
    /// Degrees
    pub panel_tilt: f64,
    pub panel_count: i64,
    pub health_score: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data structure for onboarding a new farm.
#[derive(Debug, Clone)]
pub struct FarmForCreate {
    pub user_id: i64,
    pub farm_name: String,
    pub location: Location,
    pub farm_size: f64,
    pub soil_type: SoilType,
    pub solar_installed: bool,
    pub solar_capacity_kw: f64,
    pub panel_height: f64,
    pub panel_tilt: f64,
    pub panel_count: i64,
}

/// Data structure for editing a farm profile.
///
/// All fields are optional - only provided fields will be updated.
#[derive(Debug, Clone, Default)]
pub struct FarmForUpdate {
    pub farm_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub district: Option<String>,
    pub state: Option<String>,
    pub farm_size: Option<f64>,
    pub soil_type: Option<SoilType>,
    pub solar_installed: Option<bool>,
    pub solar_capacity_kw: Option<f64>,
    pub panel_height: Option<f64>,
    pub panel_tilt: Option<f64>,
    pub panel_count: Option<i64>,
    pub health_score: Option<i64>,
}

// endregion: --- Farm

// region: --- Carbon

/// Immutable carbon ledger entry.
///
/// For `Withdrawn` rows `credits_earned` holds the withdrawn amount.
#[derive(Debug, Clone, FromRow, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CarbonTransaction {
    pub id: i64,
    pub user_id: i64,
    pub farm_id: i64,
    pub credits_earned: f64,
    pub water_saved_liters: f64,
    pub co2_reduced_kg: f64,
    #[sqlx(try_from = "String")]
    pub transaction_type: TransactionType,
    pub monetary_value: f64,
    /// Credit rate in force when the row was written
    pub rate_applied: f64,
    pub description: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Data structure for appending a ledger entry.
#[derive(Debug, Clone)]
pub struct CarbonTransactionForCreate {
    pub user_id: i64,
    pub farm_id: i64,
    pub credits: f64,
    pub water_saved_liters: f64,
    pub co2_reduced_kg: f64,
    pub transaction_type: TransactionType,
    pub rate_applied: f64,
    pub description: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl CarbonTransactionForCreate {
    /// `credits * rate_applied`, the value recorded on the row.
    pub fn monetary_value(&self) -> f64 {
        self.credits * self.rate_applied
    }
}

// endregion: --- Carbon

// region: --- Solar

/// One solar production record.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolarReading {
    pub id: i64,
    pub farm_id: i64,
    pub date: DateTime<Utc>,
    /// kWh
    pub energy_produced: f64,
    /// Percent
    pub efficiency: f64,
    #[sqlx(try_from = "String")]
    pub dust_level: DustLevel,
    /// Celsius
    pub panel_temperature: f64,
    pub weather_impact_score: i64,
    pub revenue: f64,
}

#[derive(Debug, Clone)]
pub struct SolarReadingForCreate {
    pub farm_id: i64,
    pub date: DateTime<Utc>,
    pub energy_produced: f64,
    pub efficiency: f64,
    pub dust_level: DustLevel,
    pub panel_temperature: f64,
    pub revenue: f64,
}

// endregion: --- Solar

// region: --- Crop

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Crop {
    pub id: i64,
    pub farm_id: i64,
    pub crop_name: String,
    #[sqlx(try_from = "String")]
    pub season: Season,
    pub sowing_date: DateTime<Utc>,
    pub expected_harvest_date: DateTime<Utc>,
    /// Quintals
    pub predicted_yield: f64,
    pub actual_yield: f64,
    pub health_score: i64,
    pub risk_score: i64,
    #[sqlx(try_from = "String")]
    pub status: CropStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CropForCreate {
    pub farm_id: i64,
    pub crop_name: String,
    pub season: Season,
    pub sowing_date: DateTime<Utc>,
    pub expected_harvest_date: DateTime<Utc>,
    pub predicted_yield: f64,
    pub status: CropStatus,
}

/// All fields are optional - only provided fields will be updated.
#[derive(Debug, Clone, Default)]
pub struct CropForUpdate {
    pub crop_name: Option<String>,
    pub season: Option<Season>,
    pub sowing_date: Option<DateTime<Utc>>,
    pub expected_harvest_date: Option<DateTime<Utc>>,
    pub predicted_yield: Option<f64>,
    pub actual_yield: Option<f64>,
    pub health_score: Option<i64>,
    pub risk_score: Option<i64>,
    pub status: Option<CropStatus>,
}

// endregion: --- Crop

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_type_text_roundtrip() {
        assert_eq!(TransactionType::Withdrawn.to_string(), "withdrawn");
        assert_eq!("EARNED".parse::<TransactionType>().unwrap(), TransactionType::Earned);
        assert!("burned".parse::<TransactionType>().is_err());
    }

    #[test]
    fn test_enum_serde_is_lowercase() {
        assert_eq!(serde_json::to_string(&Season::Kharif).unwrap(), "\"kharif\"");
        let parsed: SoilType = serde_json::from_str("\"sandy\"").unwrap();
        assert_eq!(parsed, SoilType::Sandy);
    }

    #[test]
    fn test_monetary_value_uses_row_rate() {
        let entry = CarbonTransactionForCreate {
            user_id: 1,
            farm_id: 1,
            credits: 0.92,
            water_saved_liters: 50_000.0,
            co2_reduced_kg: 920.0,
            transaction_type: TransactionType::Earned,
            rate_applied: 1500.0,
            description: None,
            timestamp: Utc::now(),
        };
        assert!((entry.monetary_value() - 1380.0).abs() < 1e-9);
    }
}

//! # Credit Calculator
//!
//! Converts avoided grid energy and saved irrigation water into CO2 reduced
//! and carbon credits. Pure and deterministic; callers validate inputs.

use serde::Serialize;

/// Grid emission factor, kg CO2 per kWh.
pub const GRID_EMISSION_KG_PER_KWH: f64 = 0.82;

/// Pumping energy avoided per liter of water saved, in kg CO2.
pub const WATER_PUMPING_KG_PER_LITER: f64 = 0.002;

/// One carbon credit is one metric ton of CO2.
pub const KG_PER_CREDIT: f64 = 1000.0;

/// CO2 reduction split by source, in kg.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditBreakdown {
    pub from_solar: f64,
    pub from_water: f64,
}

/// Result of a credit calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditCalculation {
    pub credits: f64,
    /// Total kg CO2 reduced
    pub co2_reduced: f64,
    pub breakdown: CreditBreakdown,
}

/// Compute credits for `energy_kwh` of solar energy and `water_liters` of water saved.
///
/// ```rust
/// use lib_core::model::carbon::calculate_credits;
///
/// let calc = calculate_credits(1000.0, 50_000.0);
/// assert!((calc.credits - 0.92).abs() < 1e-12);
/// assert!((calc.co2_reduced - 920.0).abs() < 1e-9);
/// ```
pub fn calculate_credits(energy_kwh: f64, water_liters: f64) -> CreditCalculation {
    let from_solar = energy_kwh * GRID_EMISSION_KG_PER_KWH;
    let from_water = water_liters * WATER_PUMPING_KG_PER_LITER;
    let co2_reduced = from_solar + from_water;

    CreditCalculation {
        credits: co2_reduced / KG_PER_CREDIT,
        co2_reduced,
        breakdown: CreditBreakdown { from_solar, from_water },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_reference_scenario() {
        let calc = calculate_credits(1000.0, 50_000.0);

        assert!((calc.breakdown.from_solar - 820.0).abs() < 1e-9);
        assert!((calc.breakdown.from_water - 100.0).abs() < 1e-9);
        assert!((calc.co2_reduced - 920.0).abs() < 1e-9);
        assert!((calc.credits - 0.92).abs() < 1e-12);
    }

    #[test]
    fn test_zero_inputs() {
        let calc = calculate_credits(0.0, 0.0);
        assert_eq!(calc.credits, 0.0);
        assert_eq!(calc.co2_reduced, 0.0);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(calculate_credits(10.0, 0.0)).unwrap();
        assert!(json.get("co2Reduced").is_some());
        assert!(json["breakdown"].get("fromSolar").is_some());
    }

    proptest! {
        #[test]
        fn prop_matches_formula(energy in 0.0f64..1.0e7, water in 0.0f64..1.0e9) {
            let calc = calculate_credits(energy, water);
            prop_assert_eq!(calc.credits, (energy * 0.82 + water * 0.002) / 1000.0);
        }

        #[test]
        fn prop_is_deterministic(energy in 0.0f64..1.0e7, water in 0.0f64..1.0e9) {
            prop_assert_eq!(calculate_credits(energy, water), calculate_credits(energy, water));
        }

        #[test]
        fn prop_non_negative_for_non_negative_inputs(energy in 0.0f64..1.0e7, water in 0.0f64..1.0e9) {
            let calc = calculate_credits(energy, water);
            prop_assert!(calc.credits >= 0.0);
            prop_assert!(calc.co2_reduced >= calc.breakdown.from_solar);
        }
    }
}

//! # Wallet View
//!
//! Read-side aggregation of a farm's carbon ledger into the wallet shown to
//! the farmer: balances, currency value, environmental equivalents and
//! insights. Pure; the carbon service supplies totals and recent rows.

use chrono::{DateTime, Utc};
use lib_core::dto::{ImpactView, MarketInfo, WalletBalances, WalletInsights, WalletView};
use lib_core::model::carbon::LedgerTotals;
use lib_core::model::store::models::CarbonTransaction;
use lib_utils::round_to;

/// Number of transactions listed in the wallet.
pub const RECENT_TRANSACTIONS: u32 = 10;

/// kg CO2 one tree absorbs per year.
const KG_CO2_PER_TREE: f64 = 21.0;

/// kg CO2 emitted per mile driven.
const KG_CO2_PER_CAR_MILE: f64 = 0.404;

/// Credit prices are fixed, so the trend never moves.
const MARKET_TREND: &str = "stable";

/// Assemble the wallet of a farm.
pub fn build_wallet_view(
    totals: &LedgerTotals,
    rate: f64,
    recent: Vec<CarbonTransaction>,
    now: DateTime<Utc>,
) -> WalletView {
    let monthly_average = totals.earned / 12.0;

    WalletView {
        wallet: WalletBalances {
            total_credits: round_to(totals.earned, 3),
            withdrawn_credits: round_to(totals.withdrawn, 3),
            available_credits: round_to(totals.available, 3),
            monetary_value: (totals.available * rate).round(),
        },
        impact: ImpactView {
            water_saved: totals.water_saved_liters.round(),
            co2_reduced: round_to(totals.co2_reduced_kg, 2),
            trees_equivalent: (totals.co2_reduced_kg / KG_CO2_PER_TREE).round(),
            car_miles_offset: (totals.co2_reduced_kg / KG_CO2_PER_CAR_MILE).round(),
        },
        market_info: MarketInfo {
            current_rate: rate,
            trend: MARKET_TREND.to_string(),
            last_updated: now,
        },
        transactions: recent,
        insights: WalletInsights {
            monthly_average: round_to(monthly_average, 3),
            // Annualizes the monthly figure back to the yearly total
            projected_annual: round_to(monthly_average * 12.0, 3),
        },
    }
}

//! # Carbon Domain
//!
//! Credit calculation, the credit rate and the carbon ledger.

// region: --- Modules
pub mod calculator;
pub mod ledger;
pub mod rate;
// endregion: --- Modules

// region: --- Re-exports
pub use calculator::{calculate_credits, CreditBreakdown, CreditCalculation};
pub use ledger::{
    Accrual, AccrualInput, CarbonLedger, LedgerTotals, DEFAULT_ACCRUAL_DESCRIPTION, DEFAULT_HISTORY_DAYS,
    DEFAULT_WITHDRAWAL_METHOD,
};
pub use rate::{FixedRate, RateProvider};
// endregion: --- Re-exports

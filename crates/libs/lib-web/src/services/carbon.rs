//! # Carbon Service
//!
//! Carbon routes on behalf of a caller: resolves the caller's farm, validates
//! input and drives the [`CarbonLedger`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! # use lib_web::services::{CarbonService, FarmDirectory};
//! # use lib_core::dto::WithdrawRequest;
//! # async fn example(state: lib_web::AppState) -> lib_core::Result<()> {
//! let service = CarbonService::new(state.ledger.clone(), FarmDirectory::new(state.db.clone()));
//!
//! let wallet = service.wallet(1).await?;
//! println!("{} credits available", wallet.wallet.available_credits);
//!
//! service.withdraw(1, WithdrawRequest { credits: 0.5, method: Some("UPI".into()) }).await?;
//! # Ok(())
//! # }
//! ```

use super::farm::FarmDirectory;
use super::wallet::{build_wallet_view, RECENT_TRANSACTIONS};
use chrono::Utc;
use lib_core::dto::{
    CalculateCreditsRequest, CalculateCreditsResponse, CalculationView, WalletView, WithdrawRequest,
    WithdrawResponse, WITHDRAWAL_PROCESSING_TIME,
};
use lib_core::model::carbon::{AccrualInput, CarbonLedger, DEFAULT_HISTORY_DAYS};
use lib_core::model::store::models::CarbonTransaction;
use lib_core::{AppError, Result};
use lib_utils::{round_to, validate_non_negative, validate_positive};
use std::sync::Arc;
use tracing::{info, instrument};

/// Longest history window a caller may ask for.
pub const MAX_HISTORY_DAYS: i64 = 3650;

pub struct CarbonService {
    ledger: Arc<CarbonLedger>,
    farms: FarmDirectory,
}

impl CarbonService {
    pub fn new(ledger: Arc<CarbonLedger>, farms: FarmDirectory) -> Self {
        Self { ledger, farms }
    }

    /// Wallet of the caller's farm.
    #[instrument(skip(self))]
    pub async fn wallet(&self, user_id: i64) -> Result<WalletView> {
        let farm = self.farms.for_user(user_id).await?;

        let (totals, recent) = self.ledger.snapshot(farm.id, RECENT_TRANSACTIONS).await?;

        Ok(build_wallet_view(&totals, self.ledger.current_rate(), recent, Utc::now()))
    }

    /// Turn energy and water savings into credits on the caller's farm.
    ///
    /// Absent amounts count as zero; negative or non-finite ones are rejected.
    #[instrument(skip(self, req))]
    pub async fn calculate(&self, user_id: i64, req: CalculateCreditsRequest) -> Result<CalculateCreditsResponse> {
        let energy_kwh = req.energy_kwh.unwrap_or(0.0);
        let water_liters = req.water_liters.unwrap_or(0.0);
        validate_non_negative(energy_kwh, "energyKWh").map_err(AppError::InvalidInput)?;
        validate_non_negative(water_liters, "waterLiters").map_err(AppError::InvalidInput)?;

        let farm = self.farms.for_user(user_id).await?;

        let accrual = self
            .ledger
            .accrue(
                user_id,
                farm.id,
                AccrualInput {
                    energy_kwh,
                    water_liters,
                    description: req.description,
                },
            )
            .await?;

        Ok(CalculateCreditsResponse {
            transaction: accrual.transaction,
            calculation: CalculationView {
                credits: round_to(accrual.calculation.credits, 3),
                co2_reduced: round_to(accrual.calculation.co2_reduced, 2),
                breakdown: accrual.calculation.breakdown,
            },
        })
    }

    /// Withdraw credits from the caller's farm.
    #[instrument(skip(self, req), fields(credits = req.credits))]
    pub async fn withdraw(&self, user_id: i64, req: WithdrawRequest) -> Result<WithdrawResponse> {
        validate_positive(req.credits, "credits").map_err(AppError::InvalidInput)?;

        let farm = self.farms.for_user(user_id).await?;
        let transaction = self.ledger.withdraw(farm.id, req.credits, req.method.as_deref()).await?;

        info!("[CARBON] Withdrawal request submitted for user {}", user_id);

        Ok(WithdrawResponse {
            amount: transaction.monetary_value,
            transaction,
            processing_time: WITHDRAWAL_PROCESSING_TIME.to_string(),
        })
    }

    /// Ledger entries of the last `days` days (default 90), newest first.
    #[instrument(skip(self))]
    pub async fn history(&self, user_id: i64, days: Option<i64>) -> Result<Vec<CarbonTransaction>> {
        let days = days.unwrap_or(i64::from(DEFAULT_HISTORY_DAYS));
        if !(0..=MAX_HISTORY_DAYS).contains(&days) {
            return Err(AppError::InvalidInput(format!(
                "days must be between 0 and {}",
                MAX_HISTORY_DAYS
            )));
        }

        let farm = self.farms.for_user(user_id).await?;
        // Bounded by MAX_HISTORY_DAYS above
        let window = u32::try_from(days).map_err(|e| AppError::Internal(e.to_string()))?;

        self.ledger.history(farm.id, window).await
    }
}

//! # Carbon Ledger
//!
//! Append-only record of credits earned and withdrawn per farm. The available
//! balance is always derived from the full history; `users.carbon_balance`
//! is a cache that is only written inside the same transaction as the ledger
//! row that changes it.
//!
//! Writes for one farm are serialized by an in-process async mutex held for
//! the whole database transaction, so a withdrawal's balance check and its
//! insert cannot interleave with another write on the same farm. Each write
//! transaction begins with `BEGIN IMMEDIATE`, so writes on other farms wait
//! on the busy timeout instead of failing the read-to-write upgrade.
//!
//! ```rust,no_run
//! # use lib_core::model::carbon::{AccrualInput, CarbonLedger, FixedRate};
//! # use std::sync::Arc;
//! # async fn example(pool: lib_core::DbPool) -> lib_core::Result<()> {
//! let ledger = CarbonLedger::new(pool, Arc::new(FixedRate(1500.0)));
//!
//! ledger.accrue(1, 1, AccrualInput::new(1000.0, 50_000.0)).await?;
//! let withdrawal = ledger.withdraw(1, 0.5, None).await?;
//! assert_eq!(withdrawal.credits_earned, 0.5);
//! # Ok(())
//! # }
//! ```

use super::calculator::{calculate_credits, CreditCalculation};
use super::rate::RateProvider;
use crate::error::{AppError, Result};
use crate::model::store::models::{CarbonTransaction, CarbonTransactionForCreate, TransactionType};
use crate::model::store::{begin_write, CarbonRepository, DbPool, FarmRepository, TypeTotals, UserRepository};
use chrono::Utc;
use lib_utils::days_ago;
use sqlx::{Executor, Sqlite};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::OwnedMutexGuard;
use tracing::{info, instrument, warn};

/// Description stored on accruals that do not carry their own.
pub const DEFAULT_ACCRUAL_DESCRIPTION: &str = "Carbon credits from agrivoltaic farming";

/// Payout method used when a withdrawal names none.
pub const DEFAULT_WITHDRAWAL_METHOD: &str = "bank transfer";

/// Default look-back window for history queries, in days.
pub const DEFAULT_HISTORY_DAYS: u32 = 90;

// region: --- Types

/// Inputs for one accrual.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccrualInput {
    pub energy_kwh: f64,
    pub water_liters: f64,
    pub description: Option<String>,
}

impl AccrualInput {
    pub fn new(energy_kwh: f64, water_liters: f64) -> Self {
        Self {
            energy_kwh,
            water_liters,
            description: None,
        }
    }
}

/// Result of an accrual: the stored row and the calculation behind it.
#[derive(Debug, Clone)]
pub struct Accrual {
    pub transaction: CarbonTransaction,
    pub calculation: CreditCalculation,
}

/// Aggregates over a farm's whole ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LedgerTotals {
    pub earned: f64,
    pub withdrawn: f64,
    /// Recorded but not part of the balance.
    pub traded: f64,
    /// `earned - withdrawn`
    pub available: f64,
    /// Over all transaction types
    pub water_saved_liters: f64,
    /// Over all transaction types
    pub co2_reduced_kg: f64,
    pub transaction_count: i64,
}

impl LedgerTotals {
    /// Fold per-type sums into ledger totals.
    pub fn from_type_totals(rows: &[TypeTotals]) -> Self {
        let mut totals = LedgerTotals::default();

        for row in rows {
            match row.transaction_type {
                TransactionType::Earned => totals.earned += row.credits,
                TransactionType::Withdrawn => totals.withdrawn += row.credits,
                TransactionType::Traded => totals.traded += row.credits,
            }
            totals.water_saved_liters += row.water_saved_liters;
            totals.co2_reduced_kg += row.co2_reduced_kg;
            totals.transaction_count += row.count;
        }

        totals.available = totals.earned - totals.withdrawn;
        totals
    }
}

/// Exclusive hold on one farm's writes.
///
/// On drop the farm's entry leaves the lock map unless another task holds or
/// awaits it.
struct FarmGuard<'a> {
    ledger: &'a CarbonLedger,
    farm_id: i64,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for FarmGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());

        let mut locks = self.ledger.farm_locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if locks.get(&self.farm_id).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            locks.remove(&self.farm_id);
        }
    }
}

// endregion: --- Types

/// Carbon credit ledger service.
pub struct CarbonLedger {
    pool: DbPool,
    rates: Arc<dyn RateProvider>,
    farm_locks: Mutex<HashMap<i64, Arc<tokio::sync::Mutex<()>>>>,
}

impl CarbonLedger {
    pub fn new(pool: DbPool, rates: Arc<dyn RateProvider>) -> Self {
        Self {
            pool,
            rates,
            farm_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Current value of one credit.
    pub fn current_rate(&self) -> f64 {
        self.rates.current_rate()
    }

    async fn lock_farm(&self, farm_id: i64) -> FarmGuard<'_> {
        // Clone under the map lock; FarmGuard::drop relies on it
        let lock = {
            let mut locks = self.farm_locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            locks.entry(farm_id).or_default().clone()
        };

        FarmGuard {
            ledger: self,
            farm_id,
            guard: Some(lock.lock_owned().await),
        }
    }

    /// Credit a farm for avoided emissions.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the farm does not exist or belongs to another user
    /// - [`AppError::StorageUnavailable`] / [`AppError::Storage`] on persistence failure
    #[instrument(skip(self, input), fields(energy_kwh = input.energy_kwh, water_liters = input.water_liters))]
    pub async fn accrue(&self, user_id: i64, farm_id: i64, input: AccrualInput) -> Result<Accrual> {
        let farm = FarmRepository::find_by_id(&self.pool, farm_id)
            .await?
            .filter(|farm| farm.user_id == user_id)
            .ok_or_else(AppError::farm_not_found)?;

        let calculation = calculate_credits(input.energy_kwh, input.water_liters);
        let entry = CarbonTransactionForCreate {
            user_id,
            farm_id: farm.id,
            credits: calculation.credits,
            water_saved_liters: input.water_liters,
            co2_reduced_kg: calculation.co2_reduced,
            transaction_type: TransactionType::Earned,
            rate_applied: self.rates.current_rate(),
            description: Some(
                input
                    .description
                    .filter(|d| !d.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_ACCRUAL_DESCRIPTION.to_string()),
            ),
            timestamp: Utc::now(),
        };

        let _guard = self.lock_farm(farm.id).await;

        let mut tx = begin_write(&self.pool).await?;
        let transaction = CarbonRepository::create(&mut *tx, &entry).await?;
        UserRepository::adjust_carbon_balance(&mut *tx, user_id, calculation.credits).await?;
        tx.commit().await?;

        info!(
            "[CARBON] Accrued {:.6} credits for farm {} ({:.2} kg CO2)",
            calculation.credits, farm.id, calculation.co2_reduced
        );

        Ok(Accrual { transaction, calculation })
    }

    /// Available credits of a farm, recomputed from its full history.
    pub async fn compute_balance(&self, farm_id: i64) -> Result<f64> {
        Ok(Self::totals_with(&self.pool, farm_id).await?.available)
    }

    /// Ledger aggregates of a farm.
    pub async fn totals(&self, farm_id: i64) -> Result<LedgerTotals> {
        Self::totals_with(&self.pool, farm_id).await
    }

    async fn totals_with<'e, E>(executor: E, farm_id: i64) -> Result<LedgerTotals>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let rows = CarbonRepository::totals_by_type(executor, farm_id).await?;
        Ok(LedgerTotals::from_type_totals(&rows))
    }

    /// Withdraw credits from a farm's available balance.
    ///
    /// The balance check, the ledger insert and the cache update run in one
    /// database transaction while holding the farm's lock.
    ///
    /// # Errors
    ///
    /// - [`AppError::InsufficientBalance`] if `credits` exceeds the available balance; nothing is written
    /// - [`AppError::NotFound`] if the farm does not exist
    /// - [`AppError::StorageUnavailable`] / [`AppError::Storage`] on persistence failure
    #[instrument(skip(self))]
    pub async fn withdraw(&self, farm_id: i64, credits: f64, method: Option<&str>) -> Result<CarbonTransaction> {
        let farm = FarmRepository::find_by_id(&self.pool, farm_id)
            .await?
            .ok_or_else(AppError::farm_not_found)?;

        let method = method
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_WITHDRAWAL_METHOD);

        let _guard = self.lock_farm(farm.id).await;

        let mut tx = begin_write(&self.pool).await?;

        let available = Self::totals_with(&mut *tx, farm.id).await?.available;
        if credits > available {
            warn!(
                "[CARBON] Withdrawal of {} credits rejected for farm {} (available {})",
                credits, farm.id, available
            );
            tx.rollback().await?;
            return Err(AppError::InsufficientBalance {
                requested: credits,
                available,
            });
        }

        let entry = CarbonTransactionForCreate {
            user_id: farm.user_id,
            farm_id: farm.id,
            credits,
            water_saved_liters: 0.0,
            co2_reduced_kg: 0.0,
            transaction_type: TransactionType::Withdrawn,
            rate_applied: self.rates.current_rate(),
            description: Some(format!("Withdrawal via {}", method)),
            timestamp: Utc::now(),
        };

        let transaction = CarbonRepository::create(&mut *tx, &entry).await?;
        UserRepository::adjust_carbon_balance(&mut *tx, farm.user_id, -credits).await?;
        tx.commit().await?;

        info!(
            "[CARBON] Withdrew {} credits from farm {} via {} ({} remaining)",
            credits,
            farm.id,
            method,
            available - credits
        );

        Ok(transaction)
    }

    /// Totals and the `limit` most recent transactions, read from one snapshot.
    pub async fn snapshot(&self, farm_id: i64, limit: u32) -> Result<(LedgerTotals, Vec<CarbonTransaction>)> {
        let mut tx = self.pool.begin().await?;
        let totals = Self::totals_with(&mut *tx, farm_id).await?;
        let recent = CarbonRepository::find_recent(&mut *tx, farm_id, i64::from(limit)).await?;
        tx.commit().await?;

        Ok((totals, recent))
    }

    /// Transactions from the last `window_days` days, newest first.
    pub async fn history(&self, farm_id: i64, window_days: u32) -> Result<Vec<CarbonTransaction>> {
        let since = days_ago(i64::from(window_days));
        Ok(CarbonRepository::find_since(&self.pool, farm_id, since).await?)
    }

    /// The `limit` most recent transactions, newest first.
    pub async fn recent(&self, farm_id: i64, limit: u32) -> Result<Vec<CarbonTransaction>> {
        Ok(CarbonRepository::find_recent(&self.pool, farm_id, i64::from(limit)).await?)
    }
}

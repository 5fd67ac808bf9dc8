//! # Reconcile Balances Utility
//!
//! Rebuilds the cached `carbon_balance` of each user from the carbon ledger.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --package reconcile-balances --bin reconcile_balances
//! ```
//!
//! The program will:
//! 1. Connect to the database
//! 2. Recompute the ledger balance of every user's farm
//! 3. Print each user whose cache has drifted
//! 4. Ask for confirmation
//! 5. Rewrite the drifted caches in one write-locked transaction, recomputing
//!    each ledger balance inside it

use lib_core::model::carbon::LedgerTotals;
use lib_core::model::store::{CarbonRepository, FarmRepository, UserRepository};
use lib_core::{begin_write, create_pool, Config, DbPool};
use std::io::{self, Write};

/// Differences below this are float noise, not drift.
const TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq)]
struct Drift {
    user_id: i64,
    farm_id: Option<i64>,
    email: String,
    cached: f64,
    ledger: f64,
}

/// Users whose cached balance disagrees with their farm's ledger.
///
/// A user without a farm has a ledger balance of zero.
async fn find_drifts(pool: &DbPool) -> anyhow::Result<Vec<Drift>> {
    let mut drifts = Vec::new();

    for user in UserRepository::list_all(pool).await? {
        let farm_id = FarmRepository::find_by_user(pool, user.id).await?.map(|farm| farm.id);
        let ledger = match farm_id {
            Some(farm_id) => {
                let totals = CarbonRepository::totals_by_type(pool, farm_id).await?;
                LedgerTotals::from_type_totals(&totals).available
            }
            None => 0.0,
        };

        if (user.carbon_balance - ledger).abs() > TOLERANCE {
            drifts.push(Drift {
                user_id: user.id,
                farm_id,
                email: user.email,
                cached: user.carbon_balance,
                ledger,
            });
        }
    }

    Ok(drifts)
}

/// Overwrite every drifted cache with its ledger value, all or nothing.
///
/// Balances are recomputed under the write lock; the values shown at the
/// prompt may be stale by now.
async fn apply(pool: &DbPool, drifts: &[Drift]) -> anyhow::Result<u64> {
    let mut tx = begin_write(pool).await?;
    let mut updated = 0;

    for drift in drifts {
        let ledger = match drift.farm_id {
            Some(farm_id) => {
                let totals = CarbonRepository::totals_by_type(&mut *tx, farm_id).await?;
                LedgerTotals::from_type_totals(&totals).available
            }
            None => 0.0,
        };
        updated += UserRepository::set_carbon_balance(&mut *tx, drift.user_id, ledger).await?;
    }

    tx.commit().await?;
    Ok(updated)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    println!("============================================");
    println!("  Reconcile Balances Utility");
    println!("============================================");
    println!();

    println!("Connecting to database...");
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;
    let pool = create_pool(&config).await?;
    println!("Connected successfully.");
    println!();

    let drifts = find_drifts(&pool).await?;
    if drifts.is_empty() {
        println!("All cached balances match the ledger.");
        return Ok(());
    }

    println!("Found {} drifted balance(s):", drifts.len());
    for drift in &drifts {
        println!(
            "  user {} <{}>: cached {:.6}, ledger {:.6}",
            drift.user_id, drift.email, drift.cached, drift.ledger
        );
    }
    println!();

    print!("Rewrite these balances from the ledger? (yes/no): ");
    io::stdout().flush()?;

    let mut confirmation = String::new();
    io::stdin().read_line(&mut confirmation)?;
    let confirmation = confirmation.trim().to_lowercase();

    if confirmation != "yes" && confirmation != "y" {
        println!("Operation cancelled.");
        return Ok(());
    }

    let updated = apply(&pool, &drifts).await?;
    println!("Reconciled {} balance(s).", updated);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lib_core::_dev_utils::{init_test_db, seed_farm, seed_user};
    use lib_core::model::carbon::{AccrualInput, CarbonLedger, FixedRate};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_detects_and_repairs_drift() {
        let pool = init_test_db().await;
        let (user, farm) = seed_farm(&pool, "ravi@example.in").await;
        let ledger = CarbonLedger::new(pool.clone(), Arc::new(FixedRate(1500.0)));
        ledger
            .accrue(user.id, farm.id, AccrualInput::new(1000.0, 50_000.0))
            .await
            .unwrap();

        assert!(find_drifts(&pool).await.unwrap().is_empty());

        UserRepository::set_carbon_balance(&pool, user.id, 7.0).await.unwrap();
        let drifts = find_drifts(&pool).await.unwrap();
        assert_eq!(drifts.len(), 1);
        assert!((drifts[0].ledger - 0.92).abs() < 1e-9);

        assert_eq!(apply(&pool, &drifts).await.unwrap(), 1);
        assert!(find_drifts(&pool).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_apply_keeps_writes_made_after_the_scan() {
        let pool = init_test_db().await;
        let (user, farm) = seed_farm(&pool, "ravi@example.in").await;
        let ledger = CarbonLedger::new(pool.clone(), Arc::new(FixedRate(1500.0)));
        ledger
            .accrue(user.id, farm.id, AccrualInput::new(1000.0, 50_000.0))
            .await
            .unwrap();

        UserRepository::set_carbon_balance(&pool, user.id, 7.0).await.unwrap();
        let drifts = find_drifts(&pool).await.unwrap();
        assert_eq!(drifts.len(), 1);

        // Lands while the operator is reading the prompt
        ledger
            .accrue(user.id, farm.id, AccrualInput::new(1000.0, 0.0))
            .await
            .unwrap();

        apply(&pool, &drifts).await.unwrap();

        let cached = UserRepository::find_by_id(&pool, user.id).await.unwrap().unwrap().carbon_balance;
        let balance = ledger.compute_balance(farm.id).await.unwrap();
        assert!((balance - 1.74).abs() < 1e-9);
        assert!((cached - balance).abs() < 1e-9);
        assert!(find_drifts(&pool).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_user_without_farm() {
        let pool = init_test_db().await;
        let user = seed_user(&pool, "nofarm@example.in").await;

        UserRepository::set_carbon_balance(&pool, user.id, 1.0).await.unwrap();
        let drifts = find_drifts(&pool).await.unwrap();

        assert_eq!(drifts.len(), 1);
        assert_eq!(drifts[0].ledger, 0.0);
    }
}

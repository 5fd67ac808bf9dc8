//! Property-based tests for carbon ledger invariants
//!
//! Random sequences of accruals and withdrawals are replayed against an
//! in-memory database; after every step the derived balance must stay
//! non-negative and match the cached balance on the user.

use lib_core::_dev_utils::{init_test_db, seed_farm};
use lib_core::model::carbon::{AccrualInput, CarbonLedger, FixedRate};
use lib_core::model::store::{CarbonRepository, UserRepository};
use lib_core::{AppError, DbPool};
use proptest::prelude::*;
use std::sync::Arc;

const TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone)]
enum Op {
    Accrue { energy_kwh: f64, water_liters: f64 },
    Withdraw { credits: f64 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0.0f64..5_000.0, 0.0f64..200_000.0)
            .prop_map(|(energy_kwh, water_liters)| Op::Accrue { energy_kwh, water_liters }),
        (0.001f64..5.0).prop_map(|credits| Op::Withdraw { credits }),
    ]
}

async fn setup() -> (DbPool, i64, i64) {
    let pool = init_test_db().await;
    let (user, farm) = seed_farm(&pool, "asha@example.in").await;
    (pool, user.id, farm.id)
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Property: balance = Σearned − Σwithdrawn ≥ 0 and the cache agrees, after every step
    #[test]
    fn balance_invariants_hold(ops in prop::collection::vec(op_strategy(), 1..25)) {
        runtime().block_on(async {
            let (pool, user_id, farm_id) = setup().await;
            let ledger = CarbonLedger::new(pool.clone(), Arc::new(FixedRate(1500.0)));

            let mut earned = 0.0;
            let mut withdrawn = 0.0;
            let mut rows = 0;

            for op in ops {
                match op {
                    Op::Accrue { energy_kwh, water_liters } => {
                        let accrual = ledger
                            .accrue(user_id, farm_id, AccrualInput::new(energy_kwh, water_liters))
                            .await
                            .unwrap();
                        earned += accrual.calculation.credits;
                        rows += 1;
                    }
                    Op::Withdraw { credits } => {
                        let before = ledger.compute_balance(farm_id).await.unwrap();
                        match ledger.withdraw(farm_id, credits, None).await {
                            Ok(_) => {
                                prop_assert!(credits <= before);
                                withdrawn += credits;
                                rows += 1;
                            }
                            Err(AppError::InsufficientBalance { available, .. }) => {
                                prop_assert!(credits > before);
                                prop_assert_eq!(available, before);
                            }
                            Err(other) => panic!("unexpected error: {other:?}"),
                        }
                    }
                }

                let balance = ledger.compute_balance(farm_id).await.unwrap();
                let cached = UserRepository::find_by_id(&pool, user_id).await.unwrap().unwrap().carbon_balance;

                prop_assert!(balance >= -TOLERANCE);
                prop_assert!((balance - (earned - withdrawn)).abs() < TOLERANCE);
                prop_assert!((cached - balance).abs() < TOLERANCE);
                prop_assert_eq!(CarbonRepository::count_by_farm(&pool, farm_id).await.unwrap(), rows);
            }
            Ok::<(), TestCaseError>(())
        })?;
    }
}

//! # Carbon Repository
//!
//! Storage for the append-only carbon ledger. There is deliberately no update
//! or delete method; the schema also rejects both with triggers.
//!
//! Write and aggregate methods are generic over the executor so the ledger
//! can run them inside a single database transaction.

use super::models::{CarbonTransaction, CarbonTransactionForCreate, TransactionType};
use super::DbPool;
use chrono::{DateTime, Utc};
use sqlx::{query_as, Executor, FromRow, Sqlite};

/// Per-type sums over a farm's ledger.
#[derive(Debug, Clone, FromRow, PartialEq)]
pub struct TypeTotals {
    #[sqlx(try_from = "String")]
    pub transaction_type: TransactionType,
    pub credits: f64,
    pub water_saved_liters: f64,
    pub co2_reduced_kg: f64,
    pub count: i64,
}

pub struct CarbonRepository;

impl CarbonRepository {
    /// Append a ledger entry and return the stored row.
    pub async fn create<'e, E>(executor: E, entry: &CarbonTransactionForCreate) -> Result<CarbonTransaction, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        query_as::<_, CarbonTransaction>(
            r#"
            INSERT INTO carbon_transactions (
                user_id, farm_id, credits_earned, water_saved_liters, co2_reduced_kg,
                transaction_type, monetary_value, rate_applied, description, timestamp
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            RETURNING *
            "#,
        )
        .bind(entry.user_id)
        .bind(entry.farm_id)
        .bind(entry.credits)
        .bind(entry.water_saved_liters)
        .bind(entry.co2_reduced_kg)
        .bind(entry.transaction_type.as_str())
        .bind(entry.monetary_value())
        .bind(entry.rate_applied)
        .bind(&entry.description)
        .bind(entry.timestamp)
        .fetch_one(executor)
        .await
    }

    /// Sum credits, water and CO2 per transaction type for one farm.
    ///
    /// Types with no rows are absent from the result.
    pub async fn totals_by_type<'e, E>(executor: E, farm_id: i64) -> Result<Vec<TypeTotals>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        query_as::<_, TypeTotals>(
            r#"
            SELECT transaction_type,
                   TOTAL(credits_earned) AS credits,
                   TOTAL(water_saved_liters) AS water_saved_liters,
                   TOTAL(co2_reduced_kg) AS co2_reduced_kg,
                   COUNT(*) AS count
            FROM carbon_transactions
            WHERE farm_id = ?
            GROUP BY transaction_type
            "#,
        )
        .bind(farm_id)
        .fetch_all(executor)
        .await
    }

    /// Entries with `timestamp >= since`, newest first.
    pub async fn find_since(
        pool: &DbPool,
        farm_id: i64,
        since: DateTime<Utc>,
    ) -> Result<Vec<CarbonTransaction>, sqlx::Error> {
        query_as::<_, CarbonTransaction>(
            "SELECT * FROM carbon_transactions WHERE farm_id = ? AND timestamp >= ? ORDER BY timestamp DESC, id DESC",
        )
        .bind(farm_id)
        .bind(since)
        .fetch_all(pool)
        .await
    }

    /// The `limit` most recent entries, newest first.
    pub async fn find_recent<'e, E>(executor: E, farm_id: i64, limit: i64) -> Result<Vec<CarbonTransaction>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        query_as::<_, CarbonTransaction>(
            "SELECT * FROM carbon_transactions WHERE farm_id = ? ORDER BY timestamp DESC, id DESC LIMIT ?",
        )
        .bind(farm_id)
        .bind(limit)
        .fetch_all(executor)
        .await
    }

    pub async fn count_by_farm(pool: &DbPool, farm_id: i64) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = query_as("SELECT COUNT(*) FROM carbon_transactions WHERE farm_id = ?")
            .bind(farm_id)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}

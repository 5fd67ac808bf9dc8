//! # User Repository
//!
//! Provides database access layer for user profiles and the cached carbon balance.
//!
//! ## Example
//!
//! ```rust,no_run
//! # use lib_core::model::store::{UserRepository, models::UserForCreate};
//! # async fn example(pool: &lib_core::DbPool) -> Result<(), sqlx::Error> {
//! let user = UserRepository::create(
//!     pool,
//!     &UserForCreate::new("Ravi".to_string(), "ravi@example.in".to_string()),
//! ).await?;
//!
//! let found = UserRepository::find_by_email(pool, "ravi@example.in").await?;
//! assert!(found.is_some());
//! # Ok(())
//! # }
//! ```

use super::models::{SubscriptionPlan, User, UserForCreate};
use super::DbPool;
use chrono::Utc;
use sqlx::{query_as, Executor, Sqlite};

/// User repository for database operations.
pub struct UserRepository;

impl UserRepository {
    /// Create a new user profile.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` if the email is already registered (UNIQUE constraint violation)
    /// or the database connection fails.
    pub async fn create(pool: &DbPool, user: &UserForCreate) -> Result<User, sqlx::Error> {
        let now = Utc::now();

        query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, phone, role, subscription_plan, language, carbon_balance, is_active, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, 1, ?7, ?7)
            RETURNING *
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(user.role.as_str())
        .bind(SubscriptionPlan::Free.as_str())
        .bind(&user.language)
        .bind(now)
        .fetch_one(pool)
        .await
    }

    /// Find a user by ID.
    pub async fn find_by_id(pool: &DbPool, id: i64) -> Result<Option<User>, sqlx::Error> {
        query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email address.
    pub async fn find_by_email(pool: &DbPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// List every user, oldest first.
    pub async fn list_all(pool: &DbPool) -> Result<Vec<User>, sqlx::Error> {
        query_as::<_, User>("SELECT * FROM users ORDER BY id")
            .fetch_all(pool)
            .await
    }

    /// Add `delta` credits to the cached balance.
    ///
    /// Runs on whatever executor the caller passes so it can share the
    /// ledger insert's transaction. Returns the number of rows touched
    /// (0 when the user does not exist).
    pub async fn adjust_carbon_balance<'e, E>(executor: E, user_id: i64, delta: f64) -> Result<u64, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            "UPDATE users SET carbon_balance = carbon_balance + ?1, updated_at = ?2 WHERE id = ?3",
        )
        .bind(delta)
        .bind(Utc::now())
        .bind(user_id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    /// Overwrite the cached balance. Used only when reconciling against the ledger.
    pub async fn set_carbon_balance<'e, E>(executor: E, user_id: i64, balance: f64) -> Result<u64, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("UPDATE users SET carbon_balance = ?1, updated_at = ?2 WHERE id = ?3")
            .bind(balance)
            .bind(Utc::now())
            .bind(user_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::_dev_utils::init_test_db;
    use crate::model::store::models::Role;

    #[tokio::test]
    async fn test_create_user_defaults() {
        let pool = init_test_db().await;

        let user = UserRepository::create(
            &pool,
            &UserForCreate::new("Ravi".to_string(), "ravi@example.in".to_string()),
        )
        .await
        .unwrap();

        assert_eq!(user.name, "Ravi");
        assert_eq!(user.role, Role::Farmer);
        assert_eq!(user.subscription_plan, SubscriptionPlan::Free);
        assert_eq!(user.language, "hindi");
        assert_eq!(user.carbon_balance, 0.0);
        assert!(user.is_active);
    }

    #[tokio::test]
    async fn test_create_user_duplicate_email() {
        let pool = init_test_db().await;
        let user = UserForCreate::new("Ravi".to_string(), "ravi@example.in".to_string());

        UserRepository::create(&pool, &user).await.unwrap();
        let err = UserRepository::create(&pool, &user).await.unwrap_err();

        match err {
            sqlx::Error::Database(db_err) => assert!(db_err.is_unique_violation()),
            other => panic!("expected unique violation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_adjust_carbon_balance() {
        let pool = init_test_db().await;
        let user = UserRepository::create(
            &pool,
            &UserForCreate::new("Ravi".to_string(), "ravi@example.in".to_string()),
        )
        .await
        .unwrap();

        assert_eq!(UserRepository::adjust_carbon_balance(&pool, user.id, 0.92).await.unwrap(), 1);
        assert_eq!(UserRepository::adjust_carbon_balance(&pool, user.id, -0.5).await.unwrap(), 1);

        let reloaded = UserRepository::find_by_id(&pool, user.id).await.unwrap().unwrap();
        assert!((reloaded.carbon_balance - 0.42).abs() < 1e-9);

        assert_eq!(UserRepository::adjust_carbon_balance(&pool, 9999, 1.0).await.unwrap(), 0);
    }
}

//! # User Service
//!
//! Farmer profile registration and lookup.

use lib_core::dto::CreateUserRequest;
use lib_core::model::store::models::{User, UserForCreate};
use lib_core::model::store::UserRepository;
use lib_core::{AppError, DbPool, Result};
use lib_utils::{validate_email, validate_not_empty};
use tracing::{info, instrument, warn};

#[derive(Clone)]
pub struct UserService {
    db: DbPool,
}

impl UserService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    /// Register a profile.
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidInput`] for an empty name or malformed email
    /// - [`AppError::Conflict`] if the email is already registered
    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn register(&self, req: CreateUserRequest) -> Result<User> {
        validate_not_empty(&req.name, "name").map_err(AppError::InvalidInput)?;
        let email = req.email.trim().to_lowercase();
        validate_email(&email).map_err(AppError::InvalidInput)?;

        if UserRepository::find_by_email(&self.db, &email).await?.is_some() {
            warn!("[USERS] Email already registered: {}", email);
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let mut profile = UserForCreate::new(req.name.trim().to_string(), email);
        profile.phone = req.phone;
        if let Some(role) = req.role {
            profile.role = role;
        }
        if let Some(language) = req.language.filter(|l| !l.trim().is_empty()) {
            profile.language = language.trim().to_lowercase();
        }

        let user = UserRepository::create(&self.db, &profile).await?;
        info!("[USERS] Registered user {}", user.id);
        Ok(user)
    }

    pub async fn get(&self, user_id: i64) -> Result<User> {
        UserRepository::find_by_id(&self.db, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lib_core::_dev_utils::init_test_db;
    use lib_core::model::store::models::Role;

    fn request(email: &str) -> CreateUserRequest {
        CreateUserRequest {
            name: "Meera Das".to_string(),
            email: email.to_string(),
            phone: None,
            role: None,
            language: Some("Odia".to_string()),
        }
    }

    #[tokio::test]
    async fn test_register_normalizes_input() {
        let service = UserService::new(init_test_db().await);

        let user = service.register(request(" Meera@Example.in ")).await.unwrap();

        assert_eq!(user.email, "meera@example.in");
        assert_eq!(user.language, "odia");
        assert_eq!(user.role, Role::Farmer);
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let service = UserService::new(init_test_db().await);
        service.register(request("meera@example.in")).await.unwrap();

        let err = service.register(request("MEERA@example.in")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_register_rejects_bad_email() {
        let service = UserService::new(init_test_db().await);
        let err = service.register(request("not-an-email")).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}

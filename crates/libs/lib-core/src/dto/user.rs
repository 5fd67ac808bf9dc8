//! User profile DTOs.
//!
//! Profiles are returned as [`User`](crate::model::store::models::User) directly.

use crate::model::store::models::Role;
use serde::Deserialize;

/// Body of `POST /api/users`.
///
/// ```json
/// { "name": "Ravi Kumar", "email": "ravi@example.in", "language": "odia" }
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    /// Defaults to `farmer`
    pub role: Option<Role>,
    /// Defaults to `hindi`
    pub language: Option<String>,
}

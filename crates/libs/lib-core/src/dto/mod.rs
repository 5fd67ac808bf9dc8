//! # Data Transfer Objects (DTOs)
//!
//! Request and response bodies of the REST API.
//!
//! ## Wire Format
//!
//! All DTOs use **camelCase** field names in JSON. Successful responses are
//! wrapped in [`ApiResponse`]; errors are rendered by
//! [`AppError`](crate::AppError) as `{ "success": false, "error", "code" }`.

pub mod carbon;
pub mod crop;
pub mod dashboard;
pub mod farm;
pub mod response;
pub mod solar;
pub mod user;

pub use carbon::*;
pub use crop::*;
pub use dashboard::*;
pub use farm::*;
pub use response::*;
pub use solar::*;
pub use user::*;

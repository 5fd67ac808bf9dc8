//! # Services Layer
//!
//! Business logic between the HTTP handlers and the store:
//!
//! ```text
//! Handlers (HTTP) → Services (Business Logic) → Repositories / Carbon Ledger
//! ```
//!
//! ## Module Organization
//!
//! - [`farm`] - Farm Directory: one farm per user, onboarding, edits
//! - [`carbon`] - Credit accrual, withdrawal and history for a caller
//! - [`wallet`] - Wallet view built from ledger totals
//! - [`users`] - Profile registration
//! - [`solar`] - Solar production log
//! - [`crop`] - Crop tracker
//! - [`dashboard`] - Farm summary
//!
//! All services return `lib_core::Result<T>`; lower-level errors are
//! converted into [`AppError`](lib_core::AppError) variants.

pub mod carbon;
pub mod crop;
pub mod dashboard;
pub mod farm;
pub mod solar;
pub mod users;
pub mod wallet;

// Re-export services for convenience
pub use carbon::CarbonService;
pub use crop::CropService;
pub use dashboard::DashboardService;
pub use farm::FarmDirectory;
pub use solar::SolarService;
pub use users::UserService;
pub use wallet::build_wallet_view;

//! # Model Layer
//!
//! Persistence (`store`) and the carbon credit domain built on top of it.

pub mod carbon;
pub mod store;

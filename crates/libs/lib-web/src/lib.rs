//! # Web Library
//!
//! HTTP server, middleware, handlers and services of the AgroVolt backend.
//!
//! ## Endpoints
//!
//! Public:
//! - `GET  /` and `GET /health`
//! - `POST /api/users`
//!
//! Caller identified by the `X-User-Id` header:
//! - `GET  /api/users/me`
//! - `POST|GET|PUT /api/farm`
//! - `GET  /api/carbon/wallet`, `POST /api/carbon/calculate`,
//!   `POST /api/carbon/withdraw`, `GET /api/carbon/history`
//! - `POST /api/solar/data`, `GET /api/solar/history`
//! - `POST|GET /api/crop`, `PUT /api/crop/{id}`, `POST /api/crop/recommend`
//! - `GET  /api/dashboard`

pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod server;
pub mod services;

#[cfg(test)]
pub(crate) mod test_utils;

pub use server::{create_router, start_server, AppState, ServerConfig};

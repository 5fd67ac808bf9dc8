//! # Server Setup
//!
//! Server initialization, route registration, and HTTP server startup.
//!
//! This module provides the main server setup function that creates the Axum router,
//! registers all routes, applies middleware, and starts the HTTP server.

// region: --- Imports
use crate::handlers;
use crate::middleware::{log_requests, map_res, require_ctx, stamp_req, RequestStamp};
use axum::http::{header, HeaderName, HeaderValue, Method};
use axum::routing::{get, post, put};
use axum::{middleware::from_fn, middleware::from_fn_with_state, Router};
use lib_core::model::carbon::{CarbonLedger, FixedRate};
use lib_core::{create_pool, migrate, AppError, Config, DbPool};
use lib_utils::get_env_or;
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
// endregion: --- Imports

// region: --- AppState
/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Config,
    pub ledger: Arc<CarbonLedger>,
}

impl AppState {
    /// Build the state, pricing credits at the configured fixed rate.
    pub fn new(db: DbPool, config: Config) -> Self {
        let ledger = Arc::new(CarbonLedger::new(db.clone(), Arc::new(FixedRate(config.credit_rate))));
        Self { db, config, ledger }
    }
}

impl axum::extract::FromRef<AppState> for DbPool {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl axum::extract::FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl axum::extract::FromRef<AppState> for Arc<CarbonLedger> {
    fn from_ref(state: &AppState) -> Self {
        state.ledger.clone()
    }
}
// endregion: --- AppState

// region: --- Server Configuration
/// Server configuration
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:5000")
    pub bind_address: String,
    /// Allowed CORS origins
    pub allowed_origins: Vec<String>,
    /// Database migrations path
    pub migrations_path: &'static str,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: get_env_or("BIND_ADDRESS", "127.0.0.1:5000"),
            allowed_origins: allowed_origins_from_env(),
            migrations_path: "./migrations",
        }
    }
}
/// `ALLOWED_ORIGINS` as a comma-separated list, or local dev frontends.
fn allowed_origins_from_env() -> Vec<String> {
    let origins = get_env_or("ALLOWED_ORIGINS", "");
    if origins.trim().is_empty() {
        return vec![
            "http://localhost:3000".to_string(),
            "http://127.0.0.1:3000".to_string(),
            "http://localhost:5173".to_string(),
        ];
    }

    origins
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect()
}
// endregion: --- Server Configuration

// region: --- Server Setup
/// Initialize and start the HTTP server
///
/// # Errors
///
/// This function will return an error if:
/// - Configuration loading or validation fails
/// - Database connection fails
/// - Database migrations fail
/// - Server binding fails
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let log_level = get_env_or("LOG_LEVEL", "info").to_lowercase();
    let filter = tracing_subscriber::EnvFilter::try_new(&log_level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to set global tracing subscriber: {}", e))?;

    info!(" AGROVOLT BACKEND STARTING");
    info!(" Log level: {}", log_level);

    info!("Loading configuration...");
    let app_config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;
    app_config.validate().map_err(|e| anyhow::anyhow!(e))?;

    info!("Database URL: {}", app_config.database_url);

    // SQLite creates the file but not its directory
    if let Some(db_path) = app_config.database_url.strip_prefix("sqlite:") {
        let db_path = db_path.trim_start_matches("//");
        if let Some(parent) = Path::new(db_path).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
                info!("Created database directory: {:?}", parent);
            }
        }
    }

    info!("Connecting to database...");
    let pool = create_pool(&app_config).await?;

    migrate(&pool, Path::new(config.migrations_path)).await?;
    info!(" Migrations complete");
    info!(" Carbon credit rate: {} per credit", app_config.credit_rate);

    let state = AppState::new(pool, app_config);
    let app = create_router(state, &config.allowed_origins);

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;

    info!(" SERVER READY: http://{}", config.bind_address);
    log_server_info();

    axum::serve(listener, app).await?;
    Ok(())
}

/// Create the main application router with all routes
pub fn create_router(state: AppState, allowed_origins: &[String]) -> Router {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(crate::middleware::USER_ID_HEADER),
        ]);

    info!("[ROUTE SETUP] Registering HTTP routes...");

    // Routes that act on behalf of the caller named by X-User-Id
    let caller_routes = Router::new()
        .route("/api/users/me", get(handlers::users::get_me))
        .route(
            "/api/farm",
            post(handlers::farm::create_farm)
                .get(handlers::farm::get_farm)
                .put(handlers::farm::update_farm),
        )
        .route("/api/carbon/wallet", get(handlers::carbon::get_wallet))
        .route("/api/carbon/calculate", post(handlers::carbon::calculate_credits))
        .route("/api/carbon/withdraw", post(handlers::carbon::withdraw_credits))
        .route("/api/carbon/history", get(handlers::carbon::get_history))
        .route("/api/solar/data", post(handlers::solar::add_solar_data))
        .route("/api/solar/history", get(handlers::solar::get_solar_history))
        .route("/api/crop", post(handlers::crop::add_crop).get(handlers::crop::get_crops))
        .route("/api/crop/recommend", post(handlers::crop::recommend_crops))
        .route("/api/crop/{id}", put(handlers::crop::update_crop))
        .route("/api/dashboard", get(handlers::dashboard::get_dashboard))
        .route_layer(from_fn_with_state(state.clone(), require_ctx));

    Router::new()
        .route("/", get(handlers::system::root))
        .route("/health", get(handlers::system::health))
        .route("/api/users", post(handlers::users::create_user))
        .merge(caller_routes)
        .fallback(|| async {
            info!("[404 HANDLER] Unmatched route - returning 404");
            AppError::NotFound("Route not found".to_string())
        })
        .with_state(state)
        .layer(from_fn(map_res))
        // Comprehensive request/response logging
        .layer(from_fn(log_requests))
        // Tower HTTP trace layer for spans
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    let request_id = request
                        .extensions()
                        .get::<RequestStamp>()
                        .map(|s| s.id.clone())
                        .unwrap_or_else(|| "unknown".to_string());
                    tracing::info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = %request.method(),
                        uri = %request.uri(),
                    )
                })
                .on_failure(
                    |error: tower_http::classify::ServerErrorsFailureClass,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        tracing::error!(
                            error = ?error,
                            latency_ms = latency.as_millis(),
                            "[HTTP FAILURE] Error: {:?}, Latency: {}ms",
                            error,
                            latency.as_millis()
                        );
                    },
                ),
        )
        // Request stamping (adds request ID) - outermost so every layer sees it
        .layer(from_fn(stamp_req))
        .layer(cors)
}

/// Log server information
fn log_server_info() {
    info!(" USERS:");
    info!("   • POST /api/users");
    info!("   • GET  /api/users/me");
    info!(" FARM:");
    info!("   • POST|GET|PUT /api/farm");
    info!(" CARBON:");
    info!("   • GET  /api/carbon/wallet");
    info!("   • POST /api/carbon/calculate");
    info!("   • POST /api/carbon/withdraw");
    info!("   • GET  /api/carbon/history?days=90");
    info!(" SOLAR:");
    info!("   • POST /api/solar/data");
    info!("   • GET  /api/solar/history?days=30");
    info!(" CROPS:");
    info!("   • POST|GET /api/crop");
    info!("   • PUT  /api/crop/{{id}}");
    info!("   • POST /api/crop/recommend");
    info!(" DASHBOARD:");
    info!("   • GET  /api/dashboard");
    info!(" HEALTH:");
    info!("   • GET  /health");
}
// endregion: --- Server Setup

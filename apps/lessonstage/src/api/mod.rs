//! # lessonstage HTTP API Module
//!
//! This module implements the HTTP REST API server using axum.
//!
//! ## Endpoints
//!
//! - `POST /generate-assessment` - Run the pipeline for `{grade, topic}`
//! - `GET /health` - Health check
//!
//! ## Security Configuration (Environment Variables)
//!
//! - `LESSONSTAGE_CORS_ORIGINS`: Comma-separated list of allowed origins, or "*" for all (default: localhost only)
//! - `LESSONSTAGE_RATE_LIMIT`: Requests per second (default: 10, 0 to disable)
//! - `LESSONSTAGE_API_KEY`: If set, requires Bearer token authentication

mod auth;
mod handlers;
mod middleware;
mod types;

// Re-exports for external use
pub use auth::get_api_key_from_env;
pub use handlers::{generate_assessment_handler, health_handler};
pub use middleware::{DEFAULT_RATE_LIMIT, create_rate_limiter, get_rate_limit_from_env};
pub use types::{ErrorResponse, HealthResponse};

use crate::agents::Agents;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post},
};
use lessonstage_core::LessonError;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Largest accepted request body. Requests are two small fields.
const MAX_BODY_BYTES: usize = 64 * 1024;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state.
#[derive(Clone)]
pub struct AppState {
    pub agents: Arc<Agents>,
}

impl AppState {
    #[must_use]
    pub fn new(agents: Agents) -> Self {
        Self {
            agents: Arc::new(agents),
        }
    }
}

// =============================================================================
// SECURITY SETTINGS
// =============================================================================

/// Middleware settings, normally read from the environment.
#[derive(Debug, Clone, Default)]
pub struct SecuritySettings {
    /// Raw `LESSONSTAGE_CORS_ORIGINS` value.
    pub cors_origins: Option<String>,
    /// Requests per second; 0 disables limiting.
    pub rate_limit: u32,
    /// Expected bearer key; `None` disables authentication.
    pub api_key: Option<String>,
}

impl SecuritySettings {
    pub fn from_env() -> Self {
        Self {
            cors_origins: std::env::var("LESSONSTAGE_CORS_ORIGINS").ok(),
            rate_limit: get_rate_limit_from_env(),
            api_key: get_api_key_from_env(),
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build the CORS layer.
///
/// - `"*"`: allow every origin (development only)
/// - unset: localhost only
/// - otherwise: the comma-separated origins that parse
fn build_cors_layer(origins: Option<&str>) -> CorsLayer {
    match origins {
        Some("*") => {
            tracing::warn!(
                "CORS: Allowing ALL origins (LESSONSTAGE_CORS_ORIGINS=*). This is insecure for production!"
            );
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed_origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|s| {
                    let trimmed = s.trim();
                    match trimmed.parse::<HeaderValue>() {
                        Ok(hv) => {
                            tracing::info!("CORS: Allowing origin: {}", trimmed);
                            Some(hv)
                        }
                        Err(e) => {
                            tracing::warn!("CORS: Invalid origin '{}': {}", trimmed, e);
                            None
                        }
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!(
                    "CORS: No valid origins in LESSONSTAGE_CORS_ORIGINS, defaulting to localhost only"
                );
                build_localhost_cors()
            } else {
                CorsLayer::new()
                    .allow_origin(allowed_origins)
                    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                    .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            }
        }
        None => {
            tracing::info!("CORS: No LESSONSTAGE_CORS_ORIGINS set, defaulting to localhost only");
            build_localhost_cors()
        }
    }
}

/// Build a restrictive CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:3000",
        "http://localhost:8000",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:8000",
    ]
    .into_iter()
    .filter_map(|o| o.parse::<HeaderValue>().ok())
    .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Rate Limiting - if enabled
/// 4. Authentication - if a key is configured
pub fn create_router(state: AppState, security: &SecuritySettings) -> Router {
    let cors = build_cors_layer(security.cors_origins.as_deref());

    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route(
            "/generate-assessment",
            post(handlers::generate_assessment_handler),
        );

    match &security.api_key {
        Some(key) => {
            tracing::info!("API key authentication enabled");
            router = router.layer(axum_middleware::from_fn_with_state(
                Arc::new(key.clone()),
                auth::api_key_auth_middleware,
            ));
        }
        None => {
            tracing::warn!(
                "API key authentication DISABLED - all endpoints are publicly accessible! \
                 Set LESSONSTAGE_API_KEY environment variable to enable authentication."
            );
        }
    }

    if security.rate_limit > 0 {
        tracing::info!("Rate limiting enabled: {} requests/second", security.rate_limit);
        router = router.layer(axum_middleware::from_fn_with_state(
            create_rate_limiter(security.rate_limit),
            middleware::rate_limit_middleware,
        ));
    } else {
        tracing::info!("Rate limiting disabled");
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(DefaultBodyLimit::max(MAX_BODY_BYTES)),
        )
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server and serve until Ctrl-C.
pub async fn run_server(addr: &str, agents: Agents) -> Result<(), LessonError> {
    let state = AppState::new(agents);
    let router = create_router(state, &SecuritySettings::from_env());

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| LessonError::IoError(format!("Bind failed: {}", e)))?;

    tracing::info!("lessonstage HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| LessonError::IoError(format!("Server error: {}", e)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Cannot listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

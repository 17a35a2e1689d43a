//! # FeatureDesk HTTP API Module
//!
//! This module implements the HTTP REST API server using axum.
//!
//! ## Endpoints
//!
//! - `GET /features` - List all features ordered by name
//! - `POST /features` - Create a feature
//! - `GET /features/{id}` - Get one feature
//! - `PUT /features/{id}` - Partially update a feature
//! - `DELETE /features/{id}` - Delete a feature
//! - `GET /features/by-name/{name}` - Get one feature by exact name
//! - `GET /features/{id}/description` - Rendered description as HTML
//! - `GET /health` - Health check
//!
//! ## Security Configuration (Environment Variables)
//!
//! - `FEATUREDESK_CORS_ORIGINS`: Comma-separated list of allowed origins, or "*" for all (default: localhost only)
//! - `FEATUREDESK_RATE_LIMIT`: Requests per second (default: 100, 0 to disable)
//! - `FEATUREDESK_API_KEY`: If set, requires Bearer token authentication

mod auth;
mod error;
mod extract;
mod handlers;
mod middleware;
mod types;

pub use auth::{API_KEY_VAR, get_api_key_from_env};
pub use error::{ApiError, INTERNAL_ERROR_MESSAGE};
pub use middleware::{RATE_LIMIT_VAR, create_rate_limiter, get_rate_limit_from_env};
pub use types::{ApiResponse, FeatureResponse, HealthResponse};

use crate::config::AppConfig;
use crate::error::AppError;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use featuredesk_core::{FeatureService, MarkdownRenderer};
use std::any::Any;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Environment variable holding the allowed CORS origins.
pub const CORS_ORIGINS_VAR: &str = "FEATUREDESK_CORS_ORIGINS";

/// Maximum accepted request body.
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state. Cheap to clone.
#[derive(Clone, Debug)]
pub struct AppState {
    pub service: FeatureService,
    pub markdown: Arc<MarkdownRenderer>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Create state around a service. The Markdown renderer is built here,
    /// once, and shared by every request.
    #[must_use]
    pub fn new(service: FeatureService, config: AppConfig) -> Self {
        Self {
            service,
            markdown: Arc::new(MarkdownRenderer::new()),
            config: Arc::new(config),
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build CORS layer from `FEATUREDESK_CORS_ORIGINS`.
///
/// - `*`: allow all origins
/// - unset or nothing valid: localhost only
/// - otherwise: the comma-separated origins
fn build_cors_layer() -> CorsLayer {
    let origins_env = std::env::var(CORS_ORIGINS_VAR).ok();

    match origins_env.as_deref() {
        Some("*") => {
            tracing::warn!(
                "CORS: Allowing ALL origins (FEATUREDESK_CORS_ORIGINS=*). This is insecure for production!"
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
                    "CORS: No valid origins in FEATUREDESK_CORS_ORIGINS, defaulting to localhost only"
                );
                build_localhost_cors()
            } else {
                restricted_cors(allowed_origins)
            }
        }
        None => {
            tracing::info!("CORS: No FEATUREDESK_CORS_ORIGINS set, defaulting to localhost only");
            build_localhost_cors()
        }
    }
}

/// Build a restrictive CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:3000",
        "http://localhost:8080",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:8080",
    ]
    .into_iter()
    .filter_map(|origin| origin.parse::<HeaderValue>().ok())
    .collect();

    restricted_cors(origins)
}

fn restricted_cors(origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .expose_headers([header::LOCATION])
}

// =============================================================================
// PANIC HANDLING
// =============================================================================

/// Turn a handler panic into a 500 envelope. The panic message is only
/// included when `expose_details` is set.
fn panic_response(panic: Box<dyn Any + Send + 'static>, expose_details: bool) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| panic.downcast_ref::<&str>().map(|s| (*s).to_string()))
        .unwrap_or_else(|| "unknown panic".to_string());

    ApiError::internal(format!("handler panicked: {}", detail), expose_details).into_response()
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Panic catcher - converts panics to 500 envelopes
/// 4. Body limit
/// 5. Rate Limiting - if enabled
/// 6. Authentication - if an API key is configured
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer();

    let rate_limit = get_rate_limit_from_env();
    let rate_limiter = if rate_limit > 0 {
        tracing::info!("Rate limiting enabled: {} requests/second", rate_limit);
        Some(create_rate_limiter(rate_limit))
    } else {
        tracing::info!("Rate limiting disabled");
        None
    };

    let has_auth = get_api_key_from_env().is_some();
    if has_auth {
        tracing::info!("API key authentication enabled");
    } else {
        tracing::warn!(
            "API key authentication DISABLED - all endpoints are publicly accessible! \
             Set FEATUREDESK_API_KEY environment variable to enable authentication."
        );
    }

    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route(
            "/features",
            get(handlers::list_features_handler).post(handlers::create_feature_handler),
        )
        .route(
            "/features/{id}",
            get(handlers::get_feature_handler)
                .put(handlers::update_feature_handler)
                .delete(handlers::delete_feature_handler),
        )
        .route(
            "/features/{id}/description",
            get(handlers::feature_description_handler),
        )
        .route(
            "/features/by-name/{name}",
            get(handlers::get_feature_by_name_handler),
        )
        .fallback(handlers::not_found_handler);

    if has_auth {
        router = router.layer(axum_middleware::from_fn(auth::api_key_auth_middleware));
    }

    if let Some(limiter) = rate_limiter {
        router = router.layer(axum_middleware::from_fn_with_state(
            limiter,
            middleware::rate_limit_middleware,
        ));
    }

    let expose_details = state.config.is_development();
    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(CatchPanicLayer::custom(
                    move |panic: Box<dyn Any + Send + 'static>| panic_response(panic, expose_details),
                ))
                .layer(axum::extract::DefaultBodyLimit::max(MAX_BODY_BYTES)),
        )
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Bind to `state.config`'s address and serve until Ctrl+C.
pub async fn run_server(state: AppState) -> Result<(), AppError> {
    let addr = state.config.bind_address();
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| AppError::Bind {
            addr: addr.clone(),
            source,
        })?;

    tracing::info!("FeatureDesk HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Serve)
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => {
            // Without a signal handler, run until the process is killed.
            tracing::error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

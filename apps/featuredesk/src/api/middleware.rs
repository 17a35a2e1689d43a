//! # Middleware Module
//!
//! Rate limiting for the FeatureDesk HTTP API.
//!
//! ## Configuration
//!
//! - `FEATUREDESK_RATE_LIMIT`: requests per second (default: 100, 0 disables)

use super::error::ApiError;
use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Environment variable holding the rate limit.
pub const RATE_LIMIT_VAR: &str = "FEATUREDESK_RATE_LIMIT";

/// Default rate limit: 100 requests per second.
const DEFAULT_RPS: NonZeroU32 = match NonZeroU32::new(100) {
    Some(rps) => rps,
    None => NonZeroU32::MIN,
};

// =============================================================================
// RATE LIMITER
// =============================================================================

/// Global rate limiter type alias.
pub type GlobalRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Create a global limiter allowing `requests_per_second`.
/// Zero falls back to the default.
pub fn create_rate_limiter(requests_per_second: u32) -> GlobalRateLimiter {
    let rps = NonZeroU32::new(requests_per_second).unwrap_or(DEFAULT_RPS);
    Arc::new(RateLimiter::direct(Quota::per_second(rps)))
}

/// Rate limit from `FEATUREDESK_RATE_LIMIT`, or 100 when unset or invalid.
pub fn get_rate_limit_from_env() -> u32 {
    std::env::var(RATE_LIMIT_VAR)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(100)
}

/// Reject the request with a 429 envelope when the limiter is exhausted.
pub async fn rate_limit_middleware(
    State(limiter): State<GlobalRateLimiter>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    match limiter.check() {
        Ok(()) => Ok(next.run(request).await),
        Err(_) => {
            tracing::warn!("Rate limit exceeded");
            Err(ApiError::TooManyRequests)
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

//! # API Errors
//!
//! Every failure leaves the server as an [`ApiResponse`] envelope with
//! `success: false`:
//!
//! | Variant | Status |
//! |---|---|
//! | `Validation`, `Conflict`, `BadRequest` | 400 |
//! | `Unauthorized` | 401 |
//! | `NotFound` | 404 |
//! | `TooManyRequests` | 429 |
//! | `Internal` | 500 |
//!
//! Internal errors are always logged in full. The response only carries the
//! detail when it was built with `expose_details` (development).

use super::types::ApiResponse;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use featuredesk_core::FeatureError;
use thiserror::Error;

/// Generic message for 500 responses.
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal error occurred";

/// Errors returned by handlers and middleware.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The request failed validation; one message per field.
    #[error("Validation failed")]
    Validation(Vec<String>),

    /// The feature name is already taken.
    #[error("Feature name already exists")]
    Conflict(String),

    /// The body could not be read as the expected JSON.
    #[error("Invalid request body")]
    BadRequest(String),

    /// Missing or wrong API key.
    #[error("Unauthorized")]
    Unauthorized,

    /// The feature does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The global rate limit was hit.
    #[error("Too Many Requests")]
    TooManyRequests,

    /// Anything unexpected. `detail` is only sent to the client when set.
    #[error("{}", INTERNAL_ERROR_MESSAGE)]
    Internal { detail: Option<String> },
}

impl ApiError {
    /// The generic "Feature not found" error.
    #[must_use]
    pub fn feature_not_found() -> Self {
        Self::NotFound("Feature not found".to_string())
    }

    /// Build an internal error, keeping `detail` only when `expose_details`.
    #[must_use]
    pub fn internal(detail: impl Into<String>, expose_details: bool) -> Self {
        let detail = detail.into();
        tracing::error!(error = %detail, "Request failed with internal error");
        Self::Internal {
            detail: expose_details.then_some(detail),
        }
    }

    /// Map a service error onto its HTTP form.
    #[must_use]
    pub fn from_feature_error(err: FeatureError, expose_details: bool) -> Self {
        match err {
            FeatureError::Validation(messages) => Self::Validation(messages),
            FeatureError::Conflict(message) => Self::Conflict(message),
            FeatureError::NotFound(_) => Self::feature_not_found(),
            FeatureError::Internal(detail) => Self::internal(detail, expose_details),
        }
    }

    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Conflict(_) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn into_envelope(self) -> ApiResponse<()> {
        let message = self.to_string();
        let errors = match self {
            Self::Validation(messages) => Some(messages),
            Self::Conflict(detail) | Self::BadRequest(detail) => Some(vec![detail]),
            Self::Internal { detail } => detail.map(|d| vec![d]),
            Self::Unauthorized | Self::NotFound(_) | Self::TooManyRequests => None,
        };
        ApiResponse::failure(message, errors)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(self.into_envelope())).into_response()
    }
}

//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.
//! Every field is camelCase on the wire.

use chrono::{DateTime, Utc};
use featuredesk_core::Feature;
use serde::{Deserialize, Serialize};

// =============================================================================
// RESPONSE ENVELOPE
// =============================================================================

/// Uniform wrapper around every JSON response.
///
/// `data` is omitted when there is nothing to return; `errors` is omitted
/// unless a failure has per-item detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl<T> ApiResponse<T> {
    /// Successful response carrying `data`.
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            errors: None,
        }
    }
}

impl ApiResponse<()> {
    /// Successful response with no payload.
    pub fn acknowledged(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
            errors: None,
        }
    }

    /// Failed response, optionally listing detail messages.
    pub fn failure(message: impl Into<String>, errors: Option<Vec<String>>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            errors,
        }
    }
}

// =============================================================================
// FEATURE RESPONSE
// =============================================================================

/// A feature as returned over HTTP. Timestamps are RFC 3339.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub status: String,
    pub category: String,
    pub icon: String,
    pub last_updated: DateTime<Utc>,
    pub usage_count: i64,
    pub success_rate: i64,
    pub error_count: i64,
    pub last_used: Option<DateTime<Utc>>,
}

impl From<Feature> for FeatureResponse {
    fn from(feature: Feature) -> Self {
        Self {
            id: feature.id.value(),
            name: feature.name,
            description: feature.description,
            status: feature.status,
            category: feature.category,
            icon: feature.icon,
            last_updated: feature.last_updated,
            usage_count: feature.usage_count,
            success_rate: feature.success_rate,
            error_count: feature.error_count,
            last_used: feature.last_used,
        }
    }
}

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub name: String,
    pub version: String,
}

impl HealthResponse {
    /// A healthy response stamped with `timestamp`.
    pub fn healthy(
        name: impl Into<String>,
        version: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            status: "Healthy".to_string(),
            timestamp,
            name: name.into(),
            version: version.into(),
        }
    }
}

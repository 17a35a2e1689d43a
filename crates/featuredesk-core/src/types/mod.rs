//! # Core Type Definitions
//!
//! This module contains the record and request types for FeatureDesk:
//! - Identifiers (`FeatureId`)
//! - The stored record (`Feature`) and its insert shape (`NewFeature`)
//! - Request payloads (`CreateFeatureRequest`, `UpdateFeatureRequest`)
//! - Error types (`FeatureError`)
//!
//! ## Field Rules
//!
//! - `name` is fixed at creation; no update path touches it
//! - `usage_count`, `success_rate`, `error_count` and `last_used` are tracked
//!   externally and copied through unchanged on update
//! - `last_updated` moves on every update, even when nothing else changed

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Storage-assigned identifier of a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureId(pub i64);

impl FeatureId {
    /// Get the raw id value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// FEATURE RECORD
// =============================================================================

/// A stored feature, exactly as the store returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    pub id: FeatureId,
    pub name: String,
    /// Markdown source.
    pub description: String,
    pub status: String,
    pub category: String,
    /// Icon class name, rendered verbatim by clients.
    pub icon: String,
    pub last_updated: DateTime<Utc>,
    pub usage_count: i64,
    pub success_rate: i64,
    pub error_count: i64,
    pub last_used: Option<DateTime<Utc>>,
}

impl Feature {
    /// Apply a partial update.
    ///
    /// Each of `description`, `status`, `category` and `icon` is overwritten
    /// only when the request carries a non-blank value. `last_updated` is
    /// always set to `now`.
    pub fn apply_update(&mut self, request: &UpdateFeatureRequest, now: DateTime<Utc>) {
        overwrite_if_present(&mut self.description, request.description.as_deref());
        overwrite_if_present(&mut self.status, request.status.as_deref());
        overwrite_if_present(&mut self.category, request.category.as_deref());
        overwrite_if_present(&mut self.icon, request.icon.as_deref());
        self.last_updated = now;
    }
}

fn overwrite_if_present(slot: &mut String, candidate: Option<&str>) {
    if let Some(value) = candidate.filter(|v| !v.trim().is_empty()) {
        *slot = value.to_string();
    }
}

/// A feature that has not been stored yet.
///
/// Seeding uses this directly so seed rows can carry usage metrics;
/// the service builds it with [`NewFeature::from_request`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFeature {
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

impl NewFeature {
    /// Build a fresh feature from a create request: zeroed metrics, never used.
    #[must_use]
    pub fn from_request(request: &CreateFeatureRequest, now: DateTime<Utc>) -> Self {
        Self {
            name: request.name.clone(),
            description: request.description.clone(),
            status: request.status.clone(),
            category: request.category.clone(),
            icon: request.icon.clone(),
            last_updated: now,
            usage_count: 0,
            success_rate: 0,
            error_count: 0,
            last_used: None,
        }
    }

    /// Attach a storage id, producing the record a store would return.
    #[must_use]
    pub fn with_id(self, id: FeatureId) -> Feature {
        Feature {
            id,
            name: self.name,
            description: self.description,
            status: self.status,
            category: self.category,
            icon: self.icon,
            last_updated: self.last_updated,
            usage_count: self.usage_count,
            success_rate: self.success_rate,
            error_count: self.error_count,
            last_used: self.last_used,
        }
    }
}

// =============================================================================
// REQUESTS
// =============================================================================

/// Request to create a feature. Every field is required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateFeatureRequest {
    pub name: String,
    pub description: String,
    pub status: String,
    pub category: String,
    pub icon: String,
}

impl CreateFeatureRequest {
    /// Create a request with all fields set.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        status: impl Into<String>,
        category: impl Into<String>,
        icon: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            status: status.into(),
            category: category.into(),
            icon: icon.into(),
        }
    }
}

/// Request to update a feature. Absent or blank fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateFeatureRequest {
    pub description: Option<String>,
    pub status: Option<String>,
    pub category: Option<String>,
    pub icon: Option<String>,
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors returned by the feature service.
///
/// `Validation`, `Conflict` and `NotFound` are expected outcomes carrying a
/// caller-facing message. `Internal` wraps everything else.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FeatureError {
    /// The create request failed validation. One message per violated field.
    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    /// A feature with the requested name already exists.
    #[error("{0}")]
    Conflict(String),

    /// No feature has the given id.
    #[error("Feature with ID {0} not found")]
    NotFound(FeatureId),

    /// Storage or invariant failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

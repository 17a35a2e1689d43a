//! # Feature Store Contract
//!
//! The data access seam. [`FeatureService`](crate::FeatureService) only ever
//! talks to a `dyn FeatureStore`, so the SQLite backend and the in-memory
//! backend are interchangeable.
//!
//! Every operation is independent: implementations must not hold a
//! transaction open across calls.

use crate::{Feature, FeatureId, NewFeature};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Feature persistence contract.
#[async_trait]
pub trait FeatureStore: Send + Sync {
    /// All features ordered by name ascending.
    async fn get_all(&self) -> StoreResult<Vec<Feature>>;

    /// Feature with the given id, or `None`.
    async fn get_by_id(&self, id: FeatureId) -> StoreResult<Option<Feature>>;

    /// Feature with exactly this name (case-sensitive), or `None`.
    async fn get_by_name(&self, name: &str) -> StoreResult<Option<Feature>>;

    /// Insert a feature and return its assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateName`] when the name is already taken.
    async fn create(&self, feature: &NewFeature) -> StoreResult<FeatureId>;

    /// Overwrite every mutable column of the row with `feature.id`.
    ///
    /// Returns `true` when exactly one row was affected.
    async fn update(&self, feature: &Feature) -> StoreResult<bool>;

    /// Remove the row with `id`. Returns `true` when a row was removed.
    async fn delete(&self, id: FeatureId) -> StoreResult<bool>;

    /// Whether any feature has `name`, optionally ignoring `exclude_id`.
    async fn exists(&self, name: &str, exclude_id: Option<FeatureId>) -> StoreResult<bool>;

    /// Number of stored features.
    async fn count(&self) -> StoreResult<u64>;
}

/// Errors returned by store implementations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The unique constraint on `name` rejected the write.
    #[error("duplicate feature name: {0}")]
    DuplicateName(String),

    /// Any other persistence failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Wrap a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

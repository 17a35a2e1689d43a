//! # Feature Service
//!
//! Business rules on top of a [`FeatureStore`]:
//! - create requests are validated before any storage call
//! - names are unique; both the pre-check and the store's unique constraint
//!   surface as [`FeatureError::Conflict`]
//! - absence is `Ok(None)` / `Ok(false)` for reads and deletes, and
//!   [`FeatureError::NotFound`] for updates
//!
//! Every unexpected store failure is logged here and returned as
//! [`FeatureError::Internal`].

use crate::store::{FeatureStore, StoreError};
use crate::validation::validate_create;
use crate::{
    CreateFeatureRequest, Feature, FeatureError, FeatureId, NewFeature, UpdateFeatureRequest,
};
use mockable::{Clock, DefaultClock};
use std::fmt;
use std::sync::Arc;

/// Result type for service operations.
pub type FeatureResult<T> = Result<T, FeatureError>;

/// Clock shared by the service and startup code.
pub type SharedClock = Arc<dyn Clock + Send + Sync>;

/// Feature management service.
///
/// Cheap to clone; clones share the same store and clock.
#[derive(Clone)]
pub struct FeatureService {
    store: Arc<dyn FeatureStore>,
    clock: SharedClock,
}

impl fmt::Debug for FeatureService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeatureService").finish_non_exhaustive()
    }
}

impl FeatureService {
    /// Create a service using the system clock.
    #[must_use]
    pub fn new(store: Arc<dyn FeatureStore>) -> Self {
        Self::with_clock(store, Arc::new(DefaultClock))
    }

    /// Create a service with an explicit clock.
    #[must_use]
    pub fn with_clock(store: Arc<dyn FeatureStore>, clock: SharedClock) -> Self {
        Self { store, clock }
    }

    /// All features ordered by name.
    pub async fn list_all(&self) -> FeatureResult<Vec<Feature>> {
        self.store
            .get_all()
            .await
            .map_err(|e| internal("list features", e))
    }

    /// Feature with `id`, or `None`.
    pub async fn get_by_id(&self, id: FeatureId) -> FeatureResult<Option<Feature>> {
        self.store
            .get_by_id(id)
            .await
            .map_err(|e| internal("get feature by id", e))
    }

    /// Feature named exactly `name`, or `None`.
    pub async fn get_by_name(&self, name: &str) -> FeatureResult<Option<Feature>> {
        self.store
            .get_by_name(name)
            .await
            .map_err(|e| internal("get feature by name", e))
    }

    /// Validate and insert a new feature, returning the stored record.
    ///
    /// # Errors
    ///
    /// - [`FeatureError::Validation`] listing every invalid field
    /// - [`FeatureError::Conflict`] when the name is taken
    /// - [`FeatureError::Internal`] on storage failure, or when the inserted
    ///   row cannot be read back
    pub async fn create(&self, request: &CreateFeatureRequest) -> FeatureResult<Feature> {
        if let Err(violations) = validate_create(request) {
            let messages: Vec<String> = violations.iter().map(ToString::to_string).collect();
            tracing::debug!(name = %request.name, ?messages, "Create request rejected");
            return Err(FeatureError::Validation(messages));
        }

        if self.exists(&request.name, None).await? {
            return Err(conflict(&request.name));
        }

        let feature = NewFeature::from_request(request, self.clock.utc());
        let id = match self.store.create(&feature).await {
            Ok(id) => id,
            Err(StoreError::DuplicateName(name)) => return Err(conflict(&name)),
            Err(e) => return Err(internal("create feature", e)),
        };

        let created = self.get_by_id(id).await?.ok_or_else(|| {
            tracing::error!(%id, "Inserted feature could not be read back");
            FeatureError::Internal(format!("Feature {} was created but could not be read", id))
        })?;

        tracing::info!(%id, name = %created.name, "Feature created");
        Ok(created)
    }

    /// Apply a partial update and return the stored record.
    ///
    /// `last_updated` always advances, even when the request changes nothing.
    ///
    /// # Errors
    ///
    /// - [`FeatureError::NotFound`] when `id` is unknown, or the row vanished
    ///   between the read and the write
    /// - [`FeatureError::Internal`] on storage failure
    pub async fn update(
        &self,
        id: FeatureId,
        request: &UpdateFeatureRequest,
    ) -> FeatureResult<Feature> {
        let mut feature = self
            .get_by_id(id)
            .await?
            .ok_or(FeatureError::NotFound(id))?;

        feature.apply_update(request, self.clock.utc());

        let updated = self
            .store
            .update(&feature)
            .await
            .map_err(|e| internal("update feature", e))?;
        if !updated {
            tracing::warn!(%id, "Feature disappeared before update was written");
            return Err(FeatureError::NotFound(id));
        }

        let stored = self
            .get_by_id(id)
            .await?
            .ok_or(FeatureError::NotFound(id))?;

        tracing::info!(%id, name = %stored.name, "Feature updated");
        Ok(stored)
    }

    /// Delete the feature with `id`. Returns `false` when it did not exist.
    pub async fn delete(&self, id: FeatureId) -> FeatureResult<bool> {
        if self.get_by_id(id).await?.is_none() {
            return Ok(false);
        }

        let deleted = self
            .store
            .delete(id)
            .await
            .map_err(|e| internal("delete feature", e))?;

        if deleted {
            tracing::info!(%id, "Feature deleted");
        }
        Ok(deleted)
    }

    /// Whether `name` is taken, optionally ignoring the feature `exclude_id`.
    pub async fn exists(&self, name: &str, exclude_id: Option<FeatureId>) -> FeatureResult<bool> {
        self.store
            .exists(name, exclude_id)
            .await
            .map_err(|e| internal("check feature name", e))
    }
}

fn conflict(name: &str) -> FeatureError {
    tracing::debug!(%name, "Feature name already taken");
    FeatureError::Conflict(format!("A feature with the name '{}' already exists", name))
}

fn internal(operation: &str, err: StoreError) -> FeatureError {
    tracing::error!(operation, error = %err, "Storage operation failed");
    FeatureError::Internal(err.to_string())
}

//! In-memory feature store for tests and fakes.

use crate::store::{FeatureStore, StoreError, StoreResult};
use crate::{Feature, FeatureId, NewFeature};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Thread-safe in-memory feature store.
///
/// Mirrors the SQLite table: ids start at 1 and are never reused, names are
/// unique, and listing is ordered by name.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFeatureStore {
    state: Arc<RwLock<InMemoryState>>,
}

#[derive(Debug, Default)]
struct InMemoryState {
    features: BTreeMap<FeatureId, Feature>,
    last_id: i64,
}

impl InMemoryFeatureStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, InMemoryState>> {
        self.state
            .read()
            .map_err(|err| StoreError::persistence(std::io::Error::other(err.to_string())))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, InMemoryState>> {
        self.state
            .write()
            .map_err(|err| StoreError::persistence(std::io::Error::other(err.to_string())))
    }
}

impl InMemoryState {
    fn name_taken(&self, name: &str, exclude_id: Option<FeatureId>) -> bool {
        self.features
            .values()
            .any(|f| f.name == name && Some(f.id) != exclude_id)
    }
}

#[async_trait]
impl FeatureStore for InMemoryFeatureStore {
    async fn get_all(&self) -> StoreResult<Vec<Feature>> {
        let state = self.read()?;
        let mut features: Vec<Feature> = state.features.values().cloned().collect();
        features.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(features)
    }

    async fn get_by_id(&self, id: FeatureId) -> StoreResult<Option<Feature>> {
        Ok(self.read()?.features.get(&id).cloned())
    }

    async fn get_by_name(&self, name: &str) -> StoreResult<Option<Feature>> {
        Ok(self
            .read()?
            .features
            .values()
            .find(|f| f.name == name)
            .cloned())
    }

    async fn create(&self, feature: &NewFeature) -> StoreResult<FeatureId> {
        let mut state = self.write()?;
        if state.name_taken(&feature.name, None) {
            return Err(StoreError::DuplicateName(feature.name.clone()));
        }
        state.last_id += 1;
        let id = FeatureId(state.last_id);
        state.features.insert(id, feature.clone().with_id(id));
        Ok(id)
    }

    async fn update(&self, feature: &Feature) -> StoreResult<bool> {
        let mut state = self.write()?;
        let Some(stored) = state.features.get_mut(&feature.id) else {
            return Ok(false);
        };
        // Name is not a mutable column.
        let name = std::mem::take(&mut stored.name);
        *stored = Feature {
            name,
            ..feature.clone()
        };
        Ok(true)
    }

    async fn delete(&self, id: FeatureId) -> StoreResult<bool> {
        Ok(self.write()?.features.remove(&id).is_some())
    }

    async fn exists(&self, name: &str, exclude_id: Option<FeatureId>) -> StoreResult<bool> {
        Ok(self.read()?.name_taken(name, exclude_id))
    }

    async fn count(&self) -> StoreResult<u64> {
        Ok(self.read()?.features.len() as u64)
    }
}

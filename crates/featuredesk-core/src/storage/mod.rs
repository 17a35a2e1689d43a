//! # Storage Backends
//!
//! Implementations of [`FeatureStore`](crate::FeatureStore):
//! - `SqliteFeatureStore`: the `Features` table through a sqlx pool
//! - `InMemoryFeatureStore`: a locked map, for tests and fakes

mod memory;
mod sqlite;

pub use memory::InMemoryFeatureStore;
pub use sqlite::SqliteFeatureStore;

//! # featuredesk-core
//!
//! The feature catalogue for FeatureDesk - THE LOGIC.
//!
//! This crate owns everything about a feature record: its shape, the rules a
//! create request must satisfy, how it is stored, and how its Markdown
//! description becomes HTML.
//!
//! ## Layers
//!
//! - `types` / `primitives` / `validation`: records, limits and request checks
//! - `store` / `storage`: the persistence contract and its backends
//! - `service`: the rules callers go through (uniqueness, not-found handling)
//! - `bootstrap`: schema creation and seed data at startup
//! - `markdown`: rendering and HTML sanitizing
//!
//! ## Architectural Constraints
//!
//! - No HTTP types: status codes belong to the app crate
//! - Each store call is independent; nothing spans a transaction
//! - The current time is injected, never read ambiently by the service

// =============================================================================
// MODULES
// =============================================================================

pub mod bootstrap;
pub mod markdown;
pub mod primitives;
pub mod service;
pub mod storage;
pub mod store;
pub mod types;
pub mod validation;

// =============================================================================
// RE-EXPORTS: Core Types
// =============================================================================

pub use types::{
    CreateFeatureRequest, Feature, FeatureError, FeatureId, NewFeature, UpdateFeatureRequest,
};

// =============================================================================
// RE-EXPORTS: Storage + Service
// =============================================================================

pub use service::{FeatureResult, FeatureService, SharedClock};
pub use storage::{InMemoryFeatureStore, SqliteFeatureStore};
pub use store::{FeatureStore, StoreError, StoreResult};

// =============================================================================
// RE-EXPORTS: Rendering
// =============================================================================

pub use markdown::MarkdownRenderer;

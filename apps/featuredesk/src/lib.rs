//! # FeatureDesk
//!
//! Library half of the FeatureDesk binary: HTTP API, CLI and configuration.
//! Split from `main.rs` so integration tests can build the router directly.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;

pub use config::AppConfig;
pub use error::AppError;

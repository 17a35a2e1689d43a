//! # Application Errors
//!
//! Everything that can stop a CLI command or the server from starting.

use crate::config::ConfigError;
use featuredesk_core::{FeatureError, FeatureId, StoreError};
use thiserror::Error;

/// Top-level error for the binary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("database error: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Feature(#[from] FeatureError),

    #[error("feature {0} does not exist")]
    MissingFeature(FeatureId),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(std::io::Error),

    #[error("cannot encode output: {0}")]
    Output(#[from] serde_json::Error),
}

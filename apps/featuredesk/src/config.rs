//! # Application Configuration
//!
//! Settings are resolved in layers, later layers winning:
//! 1. Built-in defaults
//! 2. A TOML file (`--config` or `FEATUREDESK_CONFIG`)
//! 3. Environment variables
//! 4. Command-line flags (applied by the CLI)
//!
//! ## Environment Variables
//!
//! - `FEATUREDESK_CONNECTION_STRING`: database location
//! - `FEATUREDESK_APP_NAME`: name reported by `/health`
//! - `FEATUREDESK_ENV`: `development` or `production`
//! - `FEATUREDESK_HOST` / `FEATUREDESK_PORT`: listen address

use featuredesk_core::primitives::DEFAULT_CONNECTION_STRING;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Environment variable naming the TOML config file.
pub const CONFIG_PATH_VAR: &str = "FEATUREDESK_CONFIG";

const CONNECTION_STRING_VAR: &str = "FEATUREDESK_CONNECTION_STRING";
const APP_NAME_VAR: &str = "FEATUREDESK_APP_NAME";
const ENVIRONMENT_VAR: &str = "FEATUREDESK_ENV";
const HOST_VAR: &str = "FEATUREDESK_HOST";
const PORT_VAR: &str = "FEATUREDESK_PORT";

// =============================================================================
// ERRORS
// =============================================================================

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
}

// =============================================================================
// ENVIRONMENT
// =============================================================================

/// Deployment environment. Only `Development` exposes error details.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl FromStr for Environment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "Development"),
            Self::Production => write!(f, "Production"),
        }
    }
}

// =============================================================================
// APP CONFIG
// =============================================================================

/// Resolved application settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub connection_string: String,
    pub application_name: String,
    pub version: String,
    pub environment: Environment,
    pub host: String,
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            connection_string: DEFAULT_CONNECTION_STRING.to_string(),
            application_name: "FeatureDesk".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: Environment::default(),
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl AppConfig {
    /// Load defaults, then the config file (explicit path or
    /// `FEATUREDESK_CONFIG`), then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let env_path = std::env::var(CONFIG_PATH_VAR).ok().map(PathBuf::from);
        let mut config = match path.map(Path::to_path_buf).or(env_path) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a TOML config file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Apply overrides from `lookup`, keyed by environment variable name.
    /// Empty values are ignored.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(value) = get(CONNECTION_STRING_VAR) {
            self.connection_string = value;
        }
        if let Some(value) = get(APP_NAME_VAR) {
            self.application_name = value;
        }
        if let Some(value) = get(ENVIRONMENT_VAR) {
            self.environment = value.parse().map_err(|()| ConfigError::InvalidValue {
                key: ENVIRONMENT_VAR,
                value,
            })?;
        }
        if let Some(value) = get(HOST_VAR) {
            self.host = value;
        }
        if let Some(value) = get(PORT_VAR) {
            self.port = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue {
                    key: PORT_VAR,
                    value,
                })?;
        }
        Ok(())
    }

    /// Whether error responses may carry diagnostic detail.
    #[must_use]
    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    /// `host:port` for the listener.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

//! # FeatureDesk CLI Module
//!
//! This module implements the CLI interface for FeatureDesk.
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server (default when no command is given)
//! - `init` - Create the schema and seed an empty database
//! - `list` - Print every feature
//! - `show` - Print one feature with its rendered description

mod commands;

use crate::config::AppConfig;
use crate::error::AppError;
use clap::{Parser, Subcommand};
use featuredesk_core::FeatureId;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// FeatureDesk - feature catalogue admin server
///
/// Manages named system features with Markdown descriptions over a
/// JSON API backed by SQLite.
#[derive(Parser, Debug)]
#[command(name = "featuredesk")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a TOML config file (overrides FEATUREDESK_CONFIG)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Database connection string (overrides config and environment)
    #[arg(short = 'D', long, global = true)]
    pub database: Option<String>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Create the schema and seed data if the database is empty
    Init,

    /// List all features ordered by name
    List,

    /// Show one feature and its rendered description
    Show {
        /// Feature id
        id: i64,
    },
}

impl Cli {
    /// Resolve configuration: file and environment, then the flags given here.
    pub fn resolve_config(&self) -> Result<AppConfig, AppError> {
        let mut config = AppConfig::load(self.config.as_deref())?;

        if let Some(database) = &self.database {
            config.connection_string.clone_from(database);
        }
        if let Some(Commands::Server { host, port }) = &self.command {
            if let Some(host) = host {
                config.host.clone_from(host);
            }
            if let Some(port) = port {
                config.port = *port;
            }
        }
        Ok(config)
    }
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), AppError> {
    let config = cli.resolve_config()?;
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Server { .. }) | None => cmd_server(config).await,
        Some(Commands::Init) => cmd_init(&config, json_mode).await,
        Some(Commands::List) => cmd_list(&config, json_mode).await,
        Some(Commands::Show { id }) => cmd_show(&config, FeatureId(id), json_mode).await,
    }
}

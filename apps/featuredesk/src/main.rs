//! # FeatureDesk - Feature Catalogue Admin Server
//!
//! The main binary for FeatureDesk.
//!
//! This application provides:
//! - HTTP REST API server (axum-based)
//! - CLI interface for database setup and inspection
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │            apps/featuredesk (THE BINARY)         │
//! │                                                  │
//! │   ┌─────────────┐          ┌─────────────┐       │
//! │   │    CLI      │          │  HTTP API   │       │
//! │   │   (clap)    │          │   (axum)    │       │
//! │   └──────┬──────┘          └──────┬──────┘       │
//! │          └───────────┬────────────┘              │
//! │                      ▼                           │
//! │            ┌───────────────────┐                 │
//! │            │  featuredesk-core │                 │
//! │            │ (service + store) │                 │
//! │            └───────────────────┘                 │
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! featuredesk server --host 0.0.0.0 --port 8080
//!
//! # CLI operations
//! featuredesk init -D "Data Source=features.db"
//! featuredesk list --json-mode
//! featuredesk show 3
//! ```

use clap::Parser;
use featuredesk::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Set to `json` for machine-parseable log lines.
const LOG_FORMAT_VAR: &str = "FEATUREDESK_LOG_FORMAT";

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    let log_format = std::env::var(LOG_FORMAT_VAR).unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "featuredesk=info,featuredesk_core=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the FeatureDesk startup banner.
fn print_banner() {
    println!(
        r#"
  ┌─┐┌─┐┌─┐┌┬┐┬ ┬┬─┐┌─┐┌┬┐┌─┐┌─┐┬┌─
  ├┤ ├┤ ├─┤ │ │ │├┬┘├┤  ││├┤ └─┐├┴┐
  └  └─┘┴ ┴ ┴ └─┘┴└─└─┘─┴┘└─┘└─┘┴ ┴

  Feature Catalogue Admin v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}

//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.
//! Every command opens the configured database and runs the bootstrap
//! first, so a fresh database is usable immediately.

use crate::api::{self, AppState, FeatureResponse};
use crate::config::AppConfig;
use crate::error::AppError;
use featuredesk_core::primitives::status_color;
use featuredesk_core::{
    Feature, FeatureId, FeatureService, MarkdownRenderer, SqliteFeatureStore, bootstrap,
};
use mockable::DefaultClock;
use std::sync::Arc;

// =============================================================================
// DATABASE
// =============================================================================

/// Connect to the configured database and make sure it is initialized.
///
/// Returns the store and the number of seed rows inserted.
pub async fn open_database(config: &AppConfig) -> Result<(SqliteFeatureStore, usize), AppError> {
    let store = SqliteFeatureStore::connect(&config.connection_string).await?;
    let seeded = bootstrap::initialize(&store, &DefaultClock).await?;
    Ok((store, seeded))
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(config: AppConfig) -> Result<(), AppError> {
    let (store, seeded) = open_database(&config).await?;
    let service = FeatureService::new(Arc::new(store));

    println!("{} Starting...", config.application_name);
    println!();
    println!("Configuration:");
    println!("  Host:        {}", config.host);
    println!("  Port:        {}", config.port);
    println!("  Environment: {}", config.environment);
    println!("  Database:    {}", config.connection_string);
    if seeded > 0 {
        println!("  Seeded:      {} features", seeded);
    }
    println!();
    println!("Endpoints:");
    println!("  GET    /features                 - List features");
    println!("  POST   /features                 - Create a feature");
    println!("  GET    /features/{{id}}            - Get a feature");
    println!("  PUT    /features/{{id}}            - Update a feature");
    println!("  DELETE /features/{{id}}            - Delete a feature");
    println!("  GET    /features/by-name/{{name}}  - Get a feature by name");
    println!("  GET    /features/{{id}}/description - Rendered description");
    println!("  GET    /health                   - Health check");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    api::run_server(AppState::new(service, config)).await
}

// =============================================================================
// INIT COMMAND
// =============================================================================

/// Initialize the database and report what was done.
pub async fn cmd_init(config: &AppConfig, json_mode: bool) -> Result<(), AppError> {
    let (store, seeded) = open_database(config).await?;
    let total = featuredesk_core::FeatureStore::count(&store).await?;
    store.close().await;

    if json_mode {
        let output = serde_json::json!({
            "database": config.connection_string,
            "seeded": seeded,
            "featureCount": total,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Database: {}", config.connection_string);
    if seeded > 0 {
        println!("Initialized with {} seed features", seeded);
    } else {
        println!("Already initialized ({} features)", total);
    }
    Ok(())
}

// =============================================================================
// LIST COMMAND
// =============================================================================

/// Print every feature ordered by name.
pub async fn cmd_list(config: &AppConfig, json_mode: bool) -> Result<(), AppError> {
    let (store, _) = open_database(config).await?;
    let service = FeatureService::new(Arc::new(store.clone()));
    let features = service.list_all().await?;
    store.close().await;

    if json_mode {
        let output: Vec<FeatureResponse> = features.into_iter().map(Into::into).collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print!("{}", format_table(&features));
    Ok(())
}

/// Render features as a fixed-width text table.
pub fn format_table(features: &[Feature]) -> String {
    let name_width = features
        .iter()
        .map(|f| f.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Name".len());

    let mut out = format!(
        "{:>4}  {:<name_width$}  {:<10}  {:<16}  {:>8}  {}\n",
        "ID", "Name", "Status", "Category", "Usage", "Last Updated"
    );
    for feature in features {
        out.push_str(&format!(
            "{:>4}  {:<name_width$}  {:<10}  {:<16}  {:>8}  {}\n",
            feature.id.value(),
            feature.name,
            feature.status,
            feature.category,
            feature.usage_count,
            feature.last_updated.format("%Y-%m-%d %H:%M"),
        ));
    }
    out.push_str(&format!("\n{} feature(s)\n", features.len()));
    out
}

// =============================================================================
// SHOW COMMAND
// =============================================================================

/// Print one feature and its rendered description.
pub async fn cmd_show(config: &AppConfig, id: FeatureId, json_mode: bool) -> Result<(), AppError> {
    let (store, _) = open_database(config).await?;
    let service = FeatureService::new(Arc::new(store.clone()));
    let feature = service.get_by_id(id).await?;
    store.close().await;

    let feature = feature.ok_or(AppError::MissingFeature(id))?;
    let html = MarkdownRenderer::new().render_to_html(&feature.description);

    if json_mode {
        let output = serde_json::json!({
            "statusColor": status_color(&feature.status),
            "feature": FeatureResponse::from(feature),
            "descriptionHtml": html,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Feature #{}: {}", feature.id, feature.name);
    println!("==================");
    println!(
        "Status:       {} ({})",
        feature.status,
        status_color(&feature.status)
    );
    println!("Category:     {}", feature.category);
    println!("Icon:         {}", feature.icon);
    println!("Last Updated: {}", feature.last_updated.to_rfc3339());
    println!("Usage:        {}", feature.usage_count);
    println!("Success Rate: {}%", feature.success_rate);
    println!("Errors:       {}", feature.error_count);
    match feature.last_used {
        Some(used) => println!("Last Used:    {}", used.to_rfc3339()),
        None => println!("Last Used:    never"),
    }
    println!();
    println!("Description (HTML):");
    println!("{}", html);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use featuredesk_core::bootstrap::seed_features;

    fn sample_features() -> Vec<Feature> {
        seed_features(chrono::Utc::now())
            .into_iter()
            .zip(1..)
            .map(|(f, id)| f.with_id(FeatureId(id)))
            .collect()
    }

    #[test]
    fn table_lists_every_feature() {
        let table = format_table(&sample_features());
        assert!(table.starts_with("  ID  Name"));
        assert!(table.contains("UserManagement"));
        assert!(table.contains("6 feature(s)"));
    }

    #[test]
    fn empty_table_has_header_only() {
        let table = format_table(&[]);
        assert_eq!(table.lines().count(), 3);
        assert!(table.contains("0 feature(s)"));
    }

    #[tokio::test]
    async fn open_database_seeds_in_memory() {
        let config = AppConfig {
            connection_string: "sqlite::memory:".to_string(),
            ..AppConfig::default()
        };
        let (_store, seeded) = open_database(&config).await.expect("open");
        assert_eq!(seeded, 6);
    }
}

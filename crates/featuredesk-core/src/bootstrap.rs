//! # Database Bootstrap
//!
//! Runs once at startup: creates the `Features` table when missing and, if
//! the table is empty, inserts the example features below. Safe to run on
//! every start; an already-populated table is left alone.
//!
//! Any error here is meant to stop the process before it serves requests.

use crate::storage::SqliteFeatureStore;
use crate::store::{FeatureStore, StoreResult};
use crate::NewFeature;
use crate::primitives::FEATURES_TABLE;
use chrono::{DateTime, Duration, Utc};
use mockable::Clock;

/// Create the schema and seed an empty table.
///
/// Returns the number of seed rows inserted (0 when data already existed).
pub async fn initialize(
    store: &SqliteFeatureStore,
    clock: &(dyn Clock + Send + Sync),
) -> StoreResult<usize> {
    store.ensure_schema().await?;
    seed_if_empty(store, clock).await
}

/// Insert the seed features when the store holds none.
pub async fn seed_if_empty(
    store: &dyn FeatureStore,
    clock: &(dyn Clock + Send + Sync),
) -> StoreResult<usize> {
    let existing = store.count().await?;
    if existing > 0 {
        tracing::info!(feature_count = existing, "Database already contains features");
        return Ok(0);
    }

    let features = seed_features(clock.utc());
    for feature in &features {
        store.create(feature).await?;
    }

    tracing::info!(
        table = FEATURES_TABLE,
        seeded = features.len(),
        "Database seeded with initial data"
    );
    Ok(features.len())
}

/// The fixed example features, with timestamps relative to `now`.
#[must_use]
pub fn seed_features(now: DateTime<Utc>) -> Vec<NewFeature> {
    vec![
        NewFeature {
            name: "AdBlock".to_string(),
            description: "# Ad Block Feature\n\n**Blocks unwanted advertisements** and tracking scripts from loading on your system.\n\n## Features\n- *Real-time filtering*\n- `Custom filter lists`\n- **Performance optimized**\n\n> Provides enhanced privacy and faster browsing experience.".to_string(),
            status: "Active".to_string(),
            category: "Security".to_string(),
            icon: "mdi mdi-shield-check mdi-24px text-blue-500".to_string(),
            last_updated: now - Duration::days(10),
            usage_count: 15420,
            success_rate: 98,
            error_count: 12,
            last_used: Some(now - Duration::hours(2)),
        },
        NewFeature {
            name: "DevTools".to_string(),
            description: "# Developer Tools\n\nEssential **debugging utilities** and development aids.\n\n## Available Tools\n1. *Code Inspector*\n2. `Console Logger`\n3. **Performance Monitor**\n4. Network Analyzer\n\nSupports multiple programming languages and frameworks.".to_string(),
            status: "Active".to_string(),
            category: "Development".to_string(),
            icon: "mdi mdi-tools mdi-24px text-green-500".to_string(),
            last_updated: now - Duration::days(13),
            usage_count: 8920,
            success_rate: 95,
            error_count: 45,
            last_used: Some(now - Duration::hours(1)),
        },
        NewFeature {
            name: "Database".to_string(),
            description: "# Database Management\n\n**Comprehensive database administration** and monitoring tools.\n\n## Capabilities\n- *Query Builder*\n- `Schema Management`\n- **Performance Tuning**\n- Backup & Recovery\n\n> Supports SQLite, MySQL, PostgreSQL, and MongoDB.".to_string(),
            status: "Active".to_string(),
            category: "Data".to_string(),
            icon: "mdi mdi-database mdi-24px text-purple-500".to_string(),
            last_updated: now - Duration::days(15),
            usage_count: 5670,
            success_rate: 99,
            error_count: 3,
            last_used: Some(now - Duration::minutes(30)),
        },
        NewFeature {
            name: "UserManagement".to_string(),
            description: "# User Management System\n\n**Complete user account management** with role-based access control.\n\n## Features\n- *User Registration*\n- `Role Assignment`\n- **Permission Management**\n- Audit Logging\n\nSupports LDAP integration and SSO authentication.".to_string(),
            status: "Active".to_string(),
            category: "Administration".to_string(),
            icon: "mdi mdi-account-group mdi-24px text-orange-500".to_string(),
            last_updated: now - Duration::days(17),
            usage_count: 12340,
            success_rate: 97,
            error_count: 23,
            last_used: Some(now - Duration::minutes(15)),
        },
        NewFeature {
            name: "Analytics".to_string(),
            description: "# Analytics Dashboard\n\n**Advanced system analytics** and reporting capabilities.\n\n## Metrics Tracked\n- *User Activity*\n- `System Performance`\n- **Error Rates**\n- Resource Usage\n\n> Real-time data visualization with customizable reports.".to_string(),
            status: "Pending".to_string(),
            category: "Reporting".to_string(),
            icon: "mdi mdi-chart-line mdi-24px text-red-500".to_string(),
            last_updated: now - Duration::days(20),
            usage_count: 0,
            success_rate: 0,
            error_count: 0,
            last_used: None,
        },
        NewFeature {
            name: "Backup".to_string(),
            description: "# Backup & Restore\n\n**Automated backup system** with data recovery capabilities.\n\n## Backup Types\n1. *Full System Backup*\n2. `Incremental Backup`\n3. **Differential Backup**\n4. File-level Backup\n\nSupports cloud storage integration and encryption.".to_string(),
            status: "Active".to_string(),
            category: "Data".to_string(),
            icon: "mdi mdi-cloud-upload mdi-24px text-indigo-500".to_string(),
            last_updated: now - Duration::days(5),
            usage_count: 3420,
            success_rate: 99,
            error_count: 5,
            last_used: Some(now - Duration::hours(6)),
        },
    ]
}

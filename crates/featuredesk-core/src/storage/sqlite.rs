//! # SQLite-backed Feature Storage
//!
//! Maps the `Features` table onto [`Feature`] through sqlx.
//!
//! Each method acquires its own pooled connection and runs one statement.
//! Nothing here opens a transaction, so read-check-then-write sequences in
//! the service are not atomic; the `UNIQUE` constraint on `Name` is the
//! final guard against duplicate names.

use crate::store::{FeatureStore, StoreError, StoreResult};
use crate::{Feature, FeatureId, NewFeature};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

/// Pool size for file-backed databases.
const MAX_CONNECTIONS: u32 = 5;

/// How long a connection waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const CREATE_TABLE_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS Features (
        Id INTEGER PRIMARY KEY AUTOINCREMENT,
        Name TEXT NOT NULL UNIQUE,
        Description TEXT NOT NULL,
        Status TEXT NOT NULL,
        Category TEXT NOT NULL,
        Icon TEXT NOT NULL,
        LastUpdated TEXT NOT NULL,
        UsageCount INTEGER NOT NULL DEFAULT 0,
        SuccessRate INTEGER NOT NULL DEFAULT 0,
        ErrorCount INTEGER NOT NULL DEFAULT 0,
        LastUsed TEXT
    )"#;

const INSERT_SQL: &str = r#"
    INSERT INTO Features (Name, Description, Status, Category, Icon, LastUpdated,
                          UsageCount, SuccessRate, ErrorCount, LastUsed)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#;

const UPDATE_SQL: &str = r#"
    UPDATE Features
    SET Description = ?, Status = ?, Category = ?, Icon = ?, LastUpdated = ?,
        UsageCount = ?, SuccessRate = ?, ErrorCount = ?, LastUsed = ?
    WHERE Id = ?"#;

/// Row shape of the `Features` table.
#[derive(Debug, FromRow)]
#[sqlx(rename_all = "PascalCase")]
struct FeatureRow {
    id: i64,
    name: String,
    description: String,
    status: String,
    category: String,
    icon: String,
    last_updated: DateTime<Utc>,
    usage_count: i64,
    success_rate: i64,
    error_count: i64,
    last_used: Option<DateTime<Utc>>,
}

impl From<FeatureRow> for Feature {
    fn from(row: FeatureRow) -> Self {
        Self {
            id: FeatureId(row.id),
            name: row.name,
            description: row.description,
            status: row.status,
            category: row.category,
            icon: row.icon,
            last_updated: row.last_updated,
            usage_count: row.usage_count,
            success_rate: row.success_rate,
            error_count: row.error_count,
            last_used: row.last_used,
        }
    }
}

/// A feature store over a SQLite connection pool.
#[derive(Debug, Clone)]
pub struct SqliteFeatureStore {
    pool: SqlitePool,
}

impl SqliteFeatureStore {
    /// Open (creating if missing) the database named by `connection_string`.
    ///
    /// Accepted forms:
    /// - `sqlite://path/to/file.db` or `sqlite::memory:`
    /// - `Data Source=path/to/file.db`
    /// - a bare file path
    ///
    /// The schema is not touched; call [`ensure_schema`](Self::ensure_schema)
    /// or [`crate::bootstrap::initialize`].
    pub async fn connect(connection_string: &str) -> StoreResult<Self> {
        let in_memory = connection_string.contains(":memory:");
        let options = parse_connection_string(connection_string)?
            .create_if_missing(true)
            .busy_timeout(BUSY_TIMEOUT);

        // An in-memory database lives and dies with its connection, so the
        // pool must hold exactly one and never recycle it.
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(MAX_CONNECTIONS)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(StoreError::persistence)?;

        tracing::debug!(connection = %connection_string, in_memory, "SQLite pool opened");
        Ok(Self { pool })
    }

    /// Create the `Features` table if it does not exist.
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        sqlx::query(CREATE_TABLE_SQL)
            .execute(&self.pool)
            .await
            .map_err(StoreError::persistence)?;
        Ok(())
    }

    /// Close the pool, waiting for checked-out connections to return.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Translate the accepted connection string forms into sqlx options.
fn parse_connection_string(connection_string: &str) -> StoreResult<SqliteConnectOptions> {
    let trimmed = connection_string.trim();

    if trimmed.starts_with("sqlite:") {
        return SqliteConnectOptions::from_str(trimmed).map_err(StoreError::persistence);
    }

    let path = trimmed
        .split(';')
        .map(str::trim)
        .find_map(|part| {
            let (key, value) = part.split_once('=')?;
            key.trim()
                .eq_ignore_ascii_case("data source")
                .then(|| value.trim())
        })
        .unwrap_or(trimmed);

    Ok(SqliteConnectOptions::new().filename(path))
}

/// A unique violation means the name is taken; anything else is persistence.
fn map_write_error(err: sqlx::Error, name: &str) -> StoreError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            StoreError::DuplicateName(name.to_string())
        }
        _ => StoreError::persistence(err),
    }
}

#[async_trait]
impl FeatureStore for SqliteFeatureStore {
    async fn get_all(&self) -> StoreResult<Vec<Feature>> {
        let rows: Vec<FeatureRow> = sqlx::query_as("SELECT * FROM Features ORDER BY Name")
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::persistence)?;
        Ok(rows.into_iter().map(Feature::from).collect())
    }

    async fn get_by_id(&self, id: FeatureId) -> StoreResult<Option<Feature>> {
        let row: Option<FeatureRow> = sqlx::query_as("SELECT * FROM Features WHERE Id = ?")
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::persistence)?;
        Ok(row.map(Feature::from))
    }

    async fn get_by_name(&self, name: &str) -> StoreResult<Option<Feature>> {
        let row: Option<FeatureRow> = sqlx::query_as("SELECT * FROM Features WHERE Name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::persistence)?;
        Ok(row.map(Feature::from))
    }

    async fn create(&self, feature: &NewFeature) -> StoreResult<FeatureId> {
        let result = sqlx::query(INSERT_SQL)
            .bind(&feature.name)
            .bind(&feature.description)
            .bind(&feature.status)
            .bind(&feature.category)
            .bind(&feature.icon)
            .bind(feature.last_updated)
            .bind(feature.usage_count)
            .bind(feature.success_rate)
            .bind(feature.error_count)
            .bind(feature.last_used)
            .execute(&self.pool)
            .await
            .map_err(|e| map_write_error(e, &feature.name))?;
        Ok(FeatureId(result.last_insert_rowid()))
    }

    async fn update(&self, feature: &Feature) -> StoreResult<bool> {
        let result = sqlx::query(UPDATE_SQL)
            .bind(&feature.description)
            .bind(&feature.status)
            .bind(&feature.category)
            .bind(&feature.icon)
            .bind(feature.last_updated)
            .bind(feature.usage_count)
            .bind(feature.success_rate)
            .bind(feature.error_count)
            .bind(feature.last_used)
            .bind(feature.id.value())
            .execute(&self.pool)
            .await
            .map_err(StoreError::persistence)?;
        Ok(result.rows_affected() == 1)
    }

    async fn delete(&self, id: FeatureId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM Features WHERE Id = ?")
            .bind(id.value())
            .execute(&self.pool)
            .await
            .map_err(StoreError::persistence)?;
        Ok(result.rows_affected() == 1)
    }

    async fn exists(&self, name: &str, exclude_id: Option<FeatureId>) -> StoreResult<bool> {
        let count: i64 = match exclude_id {
            Some(excluded) => {
                sqlx::query_scalar("SELECT COUNT(*) FROM Features WHERE Name = ? AND Id != ?")
                    .bind(name)
                    .bind(excluded.value())
                    .fetch_one(&self.pool)
                    .await
            }
            None => {
                sqlx::query_scalar("SELECT COUNT(*) FROM Features WHERE Name = ?")
                    .bind(name)
                    .fetch_one(&self.pool)
                    .await
            }
        }
        .map_err(StoreError::persistence)?;
        Ok(count > 0)
    }

    async fn count(&self) -> StoreResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM Features")
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::persistence)?;
        Ok(count.max(0) as u64)
    }
}

//! SQLite-backed key-value store
//!
//! One table, `kv_entries(key, value, expires_at)`. `expires_at` is unix
//! milliseconds or NULL. Expired rows read as absent and are purged whenever a
//! value is written.

use crate::{WebError, WebResult};
use async_trait::async_trait;
use chrono::Utc;
use daohang_core::{storage_error, DaohangResult, KeyValueStore, PutOptions};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::{debug, info};

pub struct SqliteKvStore {
    pool: SqlitePool,
}

impl SqliteKvStore {
    /// Open (creating if needed) the database at `database_url`
    pub async fn connect(database_url: &str) -> WebResult<Self> {
        info!("Connecting to key-value database: {}", database_url);

        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| WebError::Database(format!("Invalid database URL: {}", e)))?
            .create_if_missing(true);

        // Every connection to `:memory:` is a separate database
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| WebError::Database(format!("Failed to connect to database: {}", e)))?;

        Self::create_tables(&pool).await?;
        info!("Key-value database ready");

        Ok(Self { pool })
    }

    async fn create_tables(pool: &SqlitePool) -> WebResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv_entries (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                expires_at INTEGER
            )
            "#,
        )
        .execute(pool)
        .await
        .map_err(|e| WebError::Database(format!("Failed to create kv_entries table: {}", e)))?;

        Ok(())
    }

    async fn purge_expired(&self, now_ms: i64) -> DaohangResult<()> {
        let result =
            sqlx::query("DELETE FROM kv_entries WHERE expires_at IS NOT NULL AND expires_at <= ?")
                .bind(now_ms)
                .execute(&self.pool)
                .await
                .map_err(|e| storage_error!("Failed to purge expired entries", "sqlite_kv", e))?;

        if result.rows_affected() > 0 {
            debug!(purged = result.rows_affected(), "Purged expired entries");
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for SqliteKvStore {
    async fn get(&self, key: &str) -> DaohangResult<Option<String>> {
        let row = sqlx::query("SELECT value, expires_at FROM kv_entries WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error!(format!("Failed to read '{}'", key), "sqlite_kv", e))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let expires_at: Option<i64> = row.get("expires_at");
        if matches!(expires_at, Some(at) if at <= Utc::now().timestamp_millis()) {
            return Ok(None);
        }

        Ok(Some(row.get("value")))
    }

    async fn put(&self, key: &str, value: &str, options: PutOptions) -> DaohangResult<()> {
        let now_ms = Utc::now().timestamp_millis();
        self.purge_expired(now_ms).await?;

        let expires_at = options
            .expiration_ttl
            .map(|ttl| now_ms.saturating_add(i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX)));

        sqlx::query("INSERT OR REPLACE INTO kv_entries (key, value, expires_at) VALUES (?, ?, ?)")
            .bind(key)
            .bind(value)
            .bind(expires_at)
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error!(format!("Failed to write '{}'", key), "sqlite_kv", e))?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> DaohangResult<()> {
        sqlx::query("DELETE FROM kv_entries WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error!(format!("Failed to delete '{}'", key), "sqlite_kv", e))?;

        Ok(())
    }
}

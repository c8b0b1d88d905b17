//! SQLite database service
//!
//! Centralized database management for the TerraBuild data layer:
//! - WAL mode for concurrent reads during writes
//! - foreign keys enforced (collaboration cascades depend on it)
//! - busy timeout so concurrent writers queue instead of failing fast
//!
//! Uniqueness constraints declared in [`schema`] are the sole cross-request
//! concurrency mechanism: when two writers race on the same key, exactly one
//! insert succeeds and the loser sees a `Conflict`.

pub mod error;
mod migrations;
pub mod repositories;
pub mod schema;

pub use error::SqliteError;
pub use sqlx::SqlitePool;

use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};

use crate::core::config::DatabaseConfig;
use crate::core::constants::{SQLITE_CACHE_SIZE, SQLITE_DB_FILENAME, SQLITE_WAL_AUTOCHECKPOINT};

/// SQLite database service
///
/// Handles database initialization, connection pooling, and migrations.
/// Should be created once at startup and shared across all repositories.
pub struct SqliteService {
    pool: SqlitePool,
}

impl SqliteService {
    /// Initialize the database service
    ///
    /// Creates the database file if it doesn't exist, configures connection
    /// options with tuned pragmas, and runs any pending migrations.
    pub async fn init(config: &DatabaseConfig) -> Result<Self, SqliteError> {
        std::fs::create_dir_all(&config.data_dir)?;
        let db_path = config.data_dir.join(SQLITE_DB_FILENAME);

        let options = SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(config.busy_timeout_secs))
            .pragma("cache_size", SQLITE_CACHE_SIZE)
            .pragma("temp_store", "MEMORY")
            .pragma("wal_autocheckpoint", SQLITE_WAL_AUTOCHECKPOINT);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        migrations::run_migrations(&pool).await?;

        tracing::debug!(path = %db_path.display(), "SqliteService initialized");
        Ok(Self { pool })
    }

    /// Initialize an in-memory database with the full schema (tests, tooling)
    pub async fn in_memory() -> Result<Self, SqliteError> {
        let options = SqliteConnectOptions::new()
            .filename(":memory:")
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        migrations::run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn checkpoint(&self) -> Result<(), SqliteError> {
        sqlx::query("PRAGMA wal_checkpoint(TRUNCATE)")
            .execute(&self.pool)
            .await?;
        tracing::debug!("WAL checkpoint completed");
        Ok(())
    }

    /// Close the connection pool gracefully
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::debug!("SQLite pool closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_service_has_schema() {
        let db = SqliteService::in_memory().await.unwrap();
        let tables: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='cost_matrix'",
        )
        .fetch_one(db.pool())
        .await
        .unwrap();
        assert_eq!(tables, 1);
    }

    #[tokio::test]
    async fn test_foreign_keys_enforced() {
        let db = SqliteService::in_memory().await.unwrap();
        // calculation_history.user_id references users(id)
        let result = sqlx::query(
            "INSERT INTO calculation_history \
             (user_id, region, building_type, square_footage, base_cost, region_factor, \
              complexity, complexity_factor, cost_per_sqft, total_cost, adjusted_cost, created_at) \
             VALUES (999, 'West', 'Residential', 100, '1', '1', 'Low', '1', '1', '1', '1', 0)",
        )
        .execute(db.pool())
        .await;
        assert!(result.is_err());
    }
}

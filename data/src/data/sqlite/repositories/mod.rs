//! SQLite repositories
//!
//! One module per aggregate. Repositories are free async functions over a
//! shared pool; transactions are opened only where an operation must observe
//! and mutate atomically.

pub mod benton;
pub mod building_cost;
pub mod calculation;
pub mod comment;
pub mod cost_factor;
pub mod cost_matrix;
pub mod file_upload;
pub mod material;
pub mod price_cache;
pub mod project;
pub mod scenario;
pub mod sync;
pub mod user;

use rust_decimal::Decimal;
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use super::error::SqliteError;

/// Read a TEXT decimal column, surfacing corrupt values with the column name
pub(crate) fn dec_col(row: &SqliteRow, column: &'static str) -> Result<Decimal, SqliteError> {
    let raw: String = row.try_get(column)?;
    Decimal::from_str_exact(&raw).map_err(|_| SqliteError::Decimal { column, value: raw })
}

pub(crate) fn dec_col_opt(
    row: &SqliteRow,
    column: &'static str,
) -> Result<Option<Decimal>, SqliteError> {
    let raw: Option<String> = row.try_get(column)?;
    match raw {
        None => Ok(None),
        Some(raw) => Decimal::from_str_exact(&raw)
            .map(Some)
            .map_err(|_| SqliteError::Decimal { column, value: raw }),
    }
}

/// Read a TEXT JSON column
pub(crate) fn json_col(
    row: &SqliteRow,
    column: &'static str,
) -> Result<serde_json::Value, SqliteError> {
    let raw: String = row.try_get(column)?;
    serde_json::from_str(&raw).map_err(|e| SqliteError::Json {
        column,
        error: e.to_string(),
    })
}

pub(crate) fn json_col_opt(
    row: &SqliteRow,
    column: &'static str,
) -> Result<Option<serde_json::Value>, SqliteError> {
    let raw: Option<String> = row.try_get(column)?;
    match raw {
        None => Ok(None),
        Some(raw) => serde_json::from_str(&raw).map(Some).map_err(|e| SqliteError::Json {
            column,
            error: e.to_string(),
        }),
    }
}

/// Clamp a requested page size to the configured bounds
pub(crate) fn clamp_limit(limit: u32) -> u32 {
    use crate::core::constants::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
    match limit {
        0 => DEFAULT_PAGE_LIMIT,
        n if n > MAX_PAGE_LIMIT => MAX_PAGE_LIMIT,
        n => n,
    }
}

#[cfg(test)]
pub(crate) async fn setup_test_pool() -> sqlx::SqlitePool {
    let pool = sqlx::SqlitePool::connect(":memory:").await.unwrap();
    sqlx::query(super::schema::SCHEMA)
        .execute(&pool)
        .await
        .unwrap();
    pool
}

#[cfg(test)]
pub(crate) async fn seed_user(pool: &sqlx::SqlitePool, username: &str) -> i64 {
    sqlx::query("INSERT INTO users (username, password, role, is_active) VALUES (?, 'x', 'user', 1)")
        .bind(username)
        .execute(pool)
        .await
        .unwrap()
        .last_insert_rowid()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(0), 50);
        assert_eq!(clamp_limit(25), 25);
        assert_eq!(clamp_limit(10_000), 500);
    }
}

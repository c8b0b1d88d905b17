//! Materials price cache repository
//!
//! One row per (materialCode, source, region); writes are last-write-wins.
//! Reads treat an expired entry exactly like a missing one.

use sqlx::{Row, SqlitePool};

use crate::data::sqlite::error::SqliteError;
use crate::data::types::costs::PriceCacheRow;
use crate::domain::payloads::costs::NewPriceCacheEntry;

use super::{dec_col, json_col_opt};

/// Insert or overwrite the cached price for the key triple
pub async fn put(pool: &SqlitePool, entry: &NewPriceCacheEntry) -> Result<PriceCacheRow, SqliteError> {
    let now = chrono::Utc::now().timestamp();
    let metadata = entry.metadata.as_ref().map(|m| m.to_string());

    sqlx::query(
        r#"
        INSERT INTO materials_price_cache
            (material_code, source, region, price, unit, fetched_at, valid_until, metadata)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(material_code, source, region) DO UPDATE SET
            price = excluded.price,
            unit = excluded.unit,
            fetched_at = excluded.fetched_at,
            valid_until = excluded.valid_until,
            metadata = excluded.metadata
        "#,
    )
    .bind(&entry.material_code)
    .bind(&entry.source)
    .bind(&entry.region)
    .bind(entry.price.to_string())
    .bind(&entry.unit)
    .bind(now)
    .bind(entry.valid_until)
    .bind(&metadata)
    .execute(pool)
    .await?;

    let row = sqlx::query(
        "SELECT * FROM materials_price_cache WHERE material_code = ? AND source = ? AND region = ?",
    )
    .bind(&entry.material_code)
    .bind(&entry.source)
    .bind(&entry.region)
    .fetch_one(pool)
    .await?;

    to_row(&row)
}

/// Fetch a still-valid cached price. Expired entries read as `None`.
pub async fn get(
    pool: &SqlitePool,
    material_code: &str,
    source: &str,
    region: &str,
) -> Result<Option<PriceCacheRow>, SqliteError> {
    let now = chrono::Utc::now().timestamp();

    let row = sqlx::query(
        "SELECT * FROM materials_price_cache \
         WHERE material_code = ? AND source = ? AND region = ? AND valid_until > ?",
    )
    .bind(material_code)
    .bind(source)
    .bind(region)
    .bind(now)
    .fetch_optional(pool)
    .await?;

    row.map(|r| to_row(&r)).transpose()
}

/// Delete expired entries; returns how many were removed
pub async fn purge_expired(pool: &SqlitePool) -> Result<u64, SqliteError> {
    let now = chrono::Utc::now().timestamp();

    let result = sqlx::query("DELETE FROM materials_price_cache WHERE valid_until <= ?")
        .bind(now)
        .execute(pool)
        .await?;

    let purged = result.rows_affected();
    if purged > 0 {
        tracing::debug!(purged, "Expired price cache entries removed");
    }
    Ok(purged)
}

fn to_row(row: &sqlx::sqlite::SqliteRow) -> Result<PriceCacheRow, SqliteError> {
    Ok(PriceCacheRow {
        id: row.try_get("id")?,
        material_code: row.try_get("material_code")?,
        source: row.try_get("source")?,
        region: row.try_get("region")?,
        price: dec_col(row, "price")?,
        unit: row.try_get("unit")?,
        fetched_at: row.try_get("fetched_at")?,
        valid_until: row.try_get("valid_until")?,
        metadata: json_col_opt(row, "metadata")?,
    })
}

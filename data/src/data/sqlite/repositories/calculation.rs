//! Calculation history repository
//!
//! Append-only: rows are inserted and read, never updated or deleted. A past
//! estimate keeps meaning exactly what it meant when it was computed.

use sqlx::{Row, SqlitePool};

use crate::data::sqlite::error::SqliteError;
use crate::data::types::history::CalculationHistoryRow;
use crate::domain::payloads::history::NewCalculation;

use super::{clamp_limit, dec_col, dec_col_opt};

pub async fn insert(
    pool: &SqlitePool,
    calc: &NewCalculation,
) -> Result<CalculationHistoryRow, SqliteError> {
    let now = chrono::Utc::now().timestamp();

    let result = sqlx::query(
        r#"
        INSERT INTO calculation_history
            (user_id, name, region, building_type, square_footage, base_cost, region_factor,
             complexity, complexity_factor, quality, quality_factor, condition, condition_factor,
             cost_per_sqft, total_cost, adjusted_cost, assessed_value, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(calc.user_id)
    .bind(&calc.name)
    .bind(&calc.region)
    .bind(&calc.building_type)
    .bind(calc.square_footage)
    .bind(calc.base_cost.to_string())
    .bind(calc.region_factor.to_string())
    .bind(&calc.complexity)
    .bind(calc.complexity_factor.to_string())
    .bind(&calc.quality)
    .bind(calc.quality_factor.map(|d| d.to_string()))
    .bind(&calc.condition)
    .bind(calc.condition_factor.map(|d| d.to_string()))
    .bind(calc.cost_per_sqft.to_string())
    .bind(calc.total_cost.to_string())
    .bind(calc.adjusted_cost.to_string())
    .bind(calc.assessed_value.map(|d| d.to_string()))
    .bind(now)
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();
    tracing::debug!(id, user_id = calc.user_id, region = %calc.region, "Calculation recorded");

    Ok(CalculationHistoryRow {
        id,
        user_id: calc.user_id,
        name: calc.name.clone(),
        region: calc.region.clone(),
        building_type: calc.building_type.clone(),
        square_footage: calc.square_footage,
        base_cost: calc.base_cost,
        region_factor: calc.region_factor,
        complexity: calc.complexity.clone(),
        complexity_factor: calc.complexity_factor,
        quality: calc.quality.clone(),
        quality_factor: calc.quality_factor,
        condition: calc.condition.clone(),
        condition_factor: calc.condition_factor,
        cost_per_sqft: calc.cost_per_sqft,
        total_cost: calc.total_cost,
        adjusted_cost: calc.adjusted_cost,
        assessed_value: calc.assessed_value,
        created_at: now,
    })
}

pub async fn get(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<CalculationHistoryRow>, SqliteError> {
    let row = sqlx::query("SELECT * FROM calculation_history WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.map(|r| to_row(&r)).transpose()
}

/// List a user's calculations, newest first, paged
pub async fn list_for_user(
    pool: &SqlitePool,
    user_id: i64,
    page: u32,
    limit: u32,
) -> Result<(Vec<CalculationHistoryRow>, u64), SqliteError> {
    let limit = clamp_limit(limit);
    let offset = page.saturating_sub(1) * limit;

    let rows = sqlx::query(
        "SELECT * FROM calculation_history WHERE user_id = ? \
         ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM calculation_history WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(pool)
            .await?;

    let calcs = rows.iter().map(to_row).collect::<Result<Vec<_>, _>>()?;
    Ok((calcs, total.0 as u64))
}

fn to_row(row: &sqlx::sqlite::SqliteRow) -> Result<CalculationHistoryRow, SqliteError> {
    Ok(CalculationHistoryRow {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        name: row.try_get("name")?,
        region: row.try_get("region")?,
        building_type: row.try_get("building_type")?,
        square_footage: row.try_get("square_footage")?,
        base_cost: dec_col(row, "base_cost")?,
        region_factor: dec_col(row, "region_factor")?,
        complexity: row.try_get("complexity")?,
        complexity_factor: dec_col(row, "complexity_factor")?,
        quality: row.try_get("quality")?,
        quality_factor: dec_col_opt(row, "quality_factor")?,
        condition: row.try_get("condition")?,
        condition_factor: dec_col_opt(row, "condition_factor")?,
        cost_per_sqft: dec_col(row, "cost_per_sqft")?,
        total_cost: dec_col(row, "total_cost")?,
        adjusted_cost: dec_col(row, "adjusted_cost")?,
        assessed_value: dec_col_opt(row, "assessed_value")?,
        created_at: row.try_get("created_at")?,
    })
}

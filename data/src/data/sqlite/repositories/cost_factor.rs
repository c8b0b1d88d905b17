//! Cost factor and preset repository

use sqlx::{Row, SqlitePool};

use crate::data::sqlite::error::SqliteError;
use crate::data::types::costs::{CostFactorPresetRow, CostFactorRow};
use crate::domain::payloads::costs::{NewCostFactor, NewCostFactorPreset};

use super::{dec_col, json_col};

pub async fn create(pool: &SqlitePool, factor: &NewCostFactor) -> Result<CostFactorRow, SqliteError> {
    let now = chrono::Utc::now().timestamp();

    let result = sqlx::query(
        "INSERT INTO cost_factors (region, building_type, base_cost, complexity_factor, region_factor, created_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&factor.region)
    .bind(&factor.building_type)
    .bind(factor.base_cost.to_string())
    .bind(factor.complexity_factor.to_string())
    .bind(factor.region_factor.to_string())
    .bind(now)
    .execute(pool)
    .await?;

    Ok(CostFactorRow {
        id: result.last_insert_rowid(),
        region: factor.region.clone(),
        building_type: factor.building_type.clone(),
        base_cost: factor.base_cost,
        complexity_factor: factor.complexity_factor,
        region_factor: factor.region_factor,
        created_at: now,
    })
}

pub async fn get(pool: &SqlitePool, id: i64) -> Result<Option<CostFactorRow>, SqliteError> {
    let row = sqlx::query("SELECT * FROM cost_factors WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.map(|r| to_factor(&r)).transpose()
}

/// Most recent factor for a (region, buildingType) pair
pub async fn find_latest(
    pool: &SqlitePool,
    region: &str,
    building_type: &str,
) -> Result<Option<CostFactorRow>, SqliteError> {
    let row = sqlx::query(
        "SELECT * FROM cost_factors WHERE region = ? AND building_type = ? \
         ORDER BY created_at DESC, id DESC LIMIT 1",
    )
    .bind(region)
    .bind(building_type)
    .fetch_optional(pool)
    .await?;

    row.map(|r| to_factor(&r)).transpose()
}

pub async fn list_by_region(
    pool: &SqlitePool,
    region: &str,
) -> Result<Vec<CostFactorRow>, SqliteError> {
    let rows = sqlx::query(
        "SELECT * FROM cost_factors WHERE region = ? ORDER BY building_type ASC, created_at DESC",
    )
    .bind(region)
    .fetch_all(pool)
    .await?;

    rows.iter().map(to_factor).collect()
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, SqliteError> {
    let result = sqlx::query("DELETE FROM cost_factors WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

fn to_factor(row: &sqlx::sqlite::SqliteRow) -> Result<CostFactorRow, SqliteError> {
    Ok(CostFactorRow {
        id: row.try_get("id")?,
        region: row.try_get("region")?,
        building_type: row.try_get("building_type")?,
        base_cost: dec_col(row, "base_cost")?,
        complexity_factor: dec_col(row, "complexity_factor")?,
        region_factor: dec_col(row, "region_factor")?,
        created_at: row.try_get("created_at")?,
    })
}

// -----------------------------------------------------------------------------
// Presets
// -----------------------------------------------------------------------------

/// Create a preset. When marked default, any previous default of the same
/// user loses the flag in the same transaction.
pub async fn create_preset(
    pool: &SqlitePool,
    preset: &NewCostFactorPreset,
) -> Result<CostFactorPresetRow, SqliteError> {
    let now = chrono::Utc::now().timestamp();
    let weights = preset.weights.to_string();

    let mut tx = pool.begin().await?;

    if preset.is_default {
        sqlx::query("UPDATE cost_factor_presets SET is_default = 0, updated_at = ? WHERE user_id = ?")
            .bind(now)
            .bind(preset.user_id)
            .execute(&mut *tx)
            .await?;
    }

    let result = sqlx::query(
        "INSERT INTO cost_factor_presets (name, description, user_id, weights, is_default, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&preset.name)
    .bind(&preset.description)
    .bind(preset.user_id)
    .bind(&weights)
    .bind(preset.is_default)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(CostFactorPresetRow {
        id: result.last_insert_rowid(),
        name: preset.name.clone(),
        description: preset.description.clone(),
        user_id: preset.user_id,
        weights: preset.weights.clone(),
        is_default: preset.is_default,
        created_at: now,
        updated_at: now,
    })
}

pub async fn list_presets_for_user(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<CostFactorPresetRow>, SqliteError> {
    let rows = sqlx::query(
        "SELECT * FROM cost_factor_presets WHERE user_id = ? ORDER BY is_default DESC, name ASC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(to_preset).collect()
}

pub async fn default_preset_for_user(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Option<CostFactorPresetRow>, SqliteError> {
    let row = sqlx::query("SELECT * FROM cost_factor_presets WHERE user_id = ? AND is_default = 1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    row.map(|r| to_preset(&r)).transpose()
}

pub async fn delete_preset(pool: &SqlitePool, id: i64) -> Result<bool, SqliteError> {
    let result = sqlx::query("DELETE FROM cost_factor_presets WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

fn to_preset(row: &sqlx::sqlite::SqliteRow) -> Result<CostFactorPresetRow, SqliteError> {
    Ok(CostFactorPresetRow {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        user_id: row.try_get("user_id")?,
        weights: json_col(row, "weights")?,
        is_default: row.try_get("is_default")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::repositories::{seed_user, setup_test_pool};
    use crate::domain::validate::parse_payload;
    use serde_json::json;

    fn factor(region: &str, building_type: &str, base: &str) -> NewCostFactor {
        parse_payload(json!({
            "region": region,
            "buildingType": building_type,
            "baseCost": base
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_and_find_latest() {
        let pool = setup_test_pool().await;

        create(&pool, &factor("Benton", "RES", "140.00")).await.unwrap();
        let second = create(&pool, &factor("Benton", "RES", "145.50")).await.unwrap();

        let latest = find_latest(&pool, "Benton", "RES").await.unwrap().unwrap();
        assert_eq!(latest.id, second.id);
        assert_eq!(latest.base_cost.to_string(), "145.50");

        assert!(find_latest(&pool, "Franklin", "RES").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_by_region_and_delete() {
        let pool = setup_test_pool().await;

        create(&pool, &factor("Benton", "RES", "140.00")).await.unwrap();
        let com = create(&pool, &factor("Benton", "COM", "95.00")).await.unwrap();

        let listed = list_by_region(&pool, "Benton").await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].building_type, "COM");

        assert!(delete(&pool, com.id).await.unwrap());
        assert_eq!(list_by_region(&pool, "Benton").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_default_preset_is_exclusive() {
        let pool = setup_test_pool().await;
        let user_id = seed_user(&pool, "assessor1").await;

        let new_preset = |name: &str, is_default: bool| -> NewCostFactorPreset {
            parse_payload(json!({
                "name": name,
                "userId": user_id,
                "weights": {"complexity": 1.0},
                "isDefault": is_default
            }))
            .unwrap()
        };

        let first = create_preset(&pool, &new_preset("Standard", true)).await.unwrap();
        let second = create_preset(&pool, &new_preset("Aggressive", true)).await.unwrap();

        let default = default_preset_for_user(&pool, user_id).await.unwrap().unwrap();
        assert_eq!(default.id, second.id);

        let all = list_presets_for_user(&pool, user_id).await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(!all.iter().find(|p| p.id == first.id).unwrap().is_default);
    }
}

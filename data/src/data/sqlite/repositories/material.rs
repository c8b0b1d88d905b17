//! Material catalog and material cost repository
//!
//! `resolve_cost` implements the region fallback: an exact (material,
//! buildingType, region) row wins; otherwise the configured fallback region
//! is tried and the result is tagged with which region satisfied it.

use sqlx::{Row, SqlitePool};

use crate::data::sqlite::error::{SqliteError, map_unique};
use crate::data::types::costs::{
    MaterialCostRow, MaterialTypeRow, RegionMatch, ResolvedMaterialCost,
};
use crate::domain::payloads::costs::{NewMaterialCost, NewMaterialType};

use super::dec_col;

pub async fn create_type(
    pool: &SqlitePool,
    material: &NewMaterialType,
) -> Result<MaterialTypeRow, SqliteError> {
    let now = chrono::Utc::now().timestamp();

    let result = sqlx::query(
        "INSERT INTO material_types (name, code, description, unit, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&material.name)
    .bind(&material.code)
    .bind(&material.description)
    .bind(&material.unit)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| map_unique(e, "material code"))?;

    Ok(MaterialTypeRow {
        id: result.last_insert_rowid(),
        name: material.name.clone(),
        code: material.code.clone(),
        description: material.description.clone(),
        unit: material.unit.clone(),
        created_at: now,
    })
}

pub async fn get_type_by_code(
    pool: &SqlitePool,
    code: &str,
) -> Result<Option<MaterialTypeRow>, SqliteError> {
    let row = sqlx::query_as::<_, (i64, String, String, Option<String>, String, i64)>(
        "SELECT id, name, code, description, unit, created_at FROM material_types WHERE code = ?",
    )
    .bind(code)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|(id, name, code, description, unit, created_at)| MaterialTypeRow {
        id,
        name,
        code,
        description,
        unit,
        created_at,
    }))
}

pub async fn list_types(pool: &SqlitePool) -> Result<Vec<MaterialTypeRow>, SqliteError> {
    let rows = sqlx::query_as::<_, (i64, String, String, Option<String>, String, i64)>(
        "SELECT id, name, code, description, unit, created_at FROM material_types ORDER BY code ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, name, code, description, unit, created_at)| MaterialTypeRow {
            id,
            name,
            code,
            description,
            unit,
            created_at,
        })
        .collect())
}

/// Create a material cost. The (material, buildingType, region) triple is
/// unique.
pub async fn create_cost(
    pool: &SqlitePool,
    cost: &NewMaterialCost,
) -> Result<MaterialCostRow, SqliteError> {
    let now = chrono::Utc::now().timestamp();

    let result = sqlx::query(
        "INSERT INTO material_costs \
         (material_type_id, building_type, region, cost_per_unit, default_percentage, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(cost.material_type_id)
    .bind(&cost.building_type)
    .bind(&cost.region)
    .bind(cost.cost_per_unit.to_string())
    .bind(cost.default_percentage.to_string())
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| map_unique(e, "material cost for (material, building type, region)"))?;

    Ok(MaterialCostRow {
        id: result.last_insert_rowid(),
        material_type_id: cost.material_type_id,
        building_type: cost.building_type.clone(),
        region: cost.region.clone(),
        cost_per_unit: cost.cost_per_unit,
        default_percentage: cost.default_percentage,
        created_at: now,
        updated_at: now,
    })
}

/// All material costs for a (buildingType, region) pair
pub async fn list_costs(
    pool: &SqlitePool,
    building_type: &str,
    region: &str,
) -> Result<Vec<MaterialCostRow>, SqliteError> {
    let rows = sqlx::query(
        "SELECT * FROM material_costs WHERE building_type = ? AND region = ? \
         ORDER BY material_type_id ASC",
    )
    .bind(building_type)
    .bind(region)
    .fetch_all(pool)
    .await?;

    rows.iter().map(to_cost).collect()
}

/// Resolve a single material's cost for a region, falling back to
/// `fallback_region` when the requested region has no row
pub async fn resolve_cost(
    pool: &SqlitePool,
    material_type_id: i64,
    building_type: &str,
    region: &str,
    fallback_region: &str,
) -> Result<Option<ResolvedMaterialCost>, SqliteError> {
    if let Some(cost) = find_cost(pool, material_type_id, building_type, region).await? {
        return Ok(Some(ResolvedMaterialCost {
            cost,
            region_match: RegionMatch::Exact,
        }));
    }

    if region == fallback_region {
        return Ok(None);
    }

    let fallback = find_cost(pool, material_type_id, building_type, fallback_region).await?;
    Ok(fallback.map(|cost| {
        tracing::debug!(
            material_type_id,
            building_type,
            requested = region,
            fallback = fallback_region,
            "Material cost resolved via fallback region"
        );
        ResolvedMaterialCost {
            cost,
            region_match: RegionMatch::Fallback,
        }
    }))
}

async fn find_cost(
    pool: &SqlitePool,
    material_type_id: i64,
    building_type: &str,
    region: &str,
) -> Result<Option<MaterialCostRow>, SqliteError> {
    let row = sqlx::query(
        "SELECT * FROM material_costs \
         WHERE material_type_id = ? AND building_type = ? AND region = ?",
    )
    .bind(material_type_id)
    .bind(building_type)
    .bind(region)
    .fetch_optional(pool)
    .await?;

    row.map(|r| to_cost(&r)).transpose()
}

fn to_cost(row: &sqlx::sqlite::SqliteRow) -> Result<MaterialCostRow, SqliteError> {
    Ok(MaterialCostRow {
        id: row.try_get("id")?,
        material_type_id: row.try_get("material_type_id")?,
        building_type: row.try_get("building_type")?,
        region: row.try_get("region")?,
        cost_per_unit: dec_col(row, "cost_per_unit")?,
        default_percentage: dec_col(row, "default_percentage")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::repositories::setup_test_pool;
    use crate::domain::validate::parse_payload;
    use serde_json::json;

    async fn seed_material(pool: &SqlitePool, code: &str) -> i64 {
        let material: NewMaterialType = parse_payload(json!({
            "name": format!("Material {code}"),
            "code": code,
            "unit": "sqft"
        }))
        .unwrap();
        create_type(pool, &material).await.unwrap().id
    }

    fn cost(material_type_id: i64, region: &str, per_unit: &str) -> NewMaterialCost {
        parse_payload(json!({
            "materialTypeId": material_type_id,
            "buildingType": "RES",
            "region": region,
            "costPerUnit": per_unit,
            "defaultPercentage": "12.50"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_duplicate_material_code_conflicts() {
        let pool = setup_test_pool().await;

        seed_material(&pool, "CONC").await;
        let dup: NewMaterialType =
            parse_payload(json!({"name": "Concrete again", "code": "CONC", "unit": "cuyd"}))
                .unwrap();
        assert!(create_type(&pool, &dup).await.unwrap_err().is_conflict());
    }

    #[tokio::test]
    async fn test_resolve_cost_exact_beats_fallback() {
        let pool = setup_test_pool().await;
        let id = seed_material(&pool, "CONC").await;

        create_cost(&pool, &cost(id, "National", "10.00")).await.unwrap();
        create_cost(&pool, &cost(id, "Benton", "12.00")).await.unwrap();

        let resolved = resolve_cost(&pool, id, "RES", "Benton", "National")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resolved.region_match, RegionMatch::Exact);
        assert_eq!(resolved.cost.cost_per_unit.to_string(), "12.00");
    }

    #[tokio::test]
    async fn test_resolve_cost_falls_back() {
        let pool = setup_test_pool().await;
        let id = seed_material(&pool, "CONC").await;

        create_cost(&pool, &cost(id, "National", "10.00")).await.unwrap();

        let resolved = resolve_cost(&pool, id, "RES", "Franklin", "National")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resolved.region_match, RegionMatch::Fallback);
        assert_eq!(resolved.cost.region, "National");
    }

    #[tokio::test]
    async fn test_resolve_cost_absent_everywhere() {
        let pool = setup_test_pool().await;
        let id = seed_material(&pool, "CONC").await;

        let resolved = resolve_cost(&pool, id, "RES", "Franklin", "National")
            .await
            .unwrap();
        assert!(resolved.is_none());
    }

    #[tokio::test]
    async fn test_list_costs_scoped_to_pair() {
        let pool = setup_test_pool().await;
        let conc = seed_material(&pool, "CONC").await;
        let stl = seed_material(&pool, "STL").await;

        create_cost(&pool, &cost(conc, "Benton", "12.00")).await.unwrap();
        create_cost(&pool, &cost(stl, "Benton", "22.00")).await.unwrap();
        create_cost(&pool, &cost(conc, "Franklin", "11.00")).await.unwrap();

        let listed = list_costs(&pool, "RES", "Benton").await.unwrap();
        assert_eq!(listed.len(), 2);
    }
}

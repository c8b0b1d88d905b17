//! Saved estimate repository
//!
//! `create_with_materials` is the transactional path: the estimate and its
//! material line items land together or not at all, and the stated total is
//! checked against the sum of line totals before anything commits.

use rust_decimal::Decimal;
use sqlx::{Row, SqlitePool};

use crate::data::sqlite::error::SqliteError;
use crate::data::types::costs::{BuildingCostMaterialRow, BuildingCostRow};
use crate::domain::payloads::costs::{NewBuildingCost, NewBuildingCostMaterial};

use super::dec_col;

pub async fn create(
    pool: &SqlitePool,
    estimate: &NewBuildingCost,
) -> Result<BuildingCostRow, SqliteError> {
    let now = chrono::Utc::now().timestamp();

    let result = insert_estimate(estimate, now).execute(pool).await?;

    Ok(to_created(estimate, result.last_insert_rowid(), now))
}

/// Create an estimate together with its material breakdown, atomically.
///
/// When line items are given, their line totals must sum to the estimate's
/// `total_cost` exactly; a mismatch aborts with `Conflict` and nothing is
/// written.
pub async fn create_with_materials(
    pool: &SqlitePool,
    estimate: &NewBuildingCost,
    materials: &[NewBuildingCostMaterial],
) -> Result<(BuildingCostRow, Vec<BuildingCostMaterialRow>), SqliteError> {
    if !materials.is_empty() {
        let line_sum: Decimal = materials.iter().map(|m| m.total_cost).sum();
        if line_sum != estimate.total_cost {
            return Err(SqliteError::Conflict(format!(
                "material line totals ({line_sum}) do not sum to estimate total ({})",
                estimate.total_cost
            )));
        }
    }

    let now = chrono::Utc::now().timestamp();
    let mut tx = pool.begin().await?;

    let result = insert_estimate(estimate, now).execute(&mut *tx).await?;
    let building_cost_id = result.last_insert_rowid();

    let mut lines = Vec::with_capacity(materials.len());
    for material in materials {
        let line = sqlx::query(
            "INSERT INTO building_cost_materials \
             (building_cost_id, material_type_id, quantity, cost_per_unit, percentage, total_cost, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(building_cost_id)
        .bind(material.material_type_id)
        .bind(material.quantity.to_string())
        .bind(material.cost_per_unit.to_string())
        .bind(material.percentage.to_string())
        .bind(material.total_cost.to_string())
        .bind(now)
        .execute(&mut *tx)
        .await?;

        lines.push(BuildingCostMaterialRow {
            id: line.last_insert_rowid(),
            building_cost_id,
            material_type_id: material.material_type_id,
            quantity: material.quantity,
            cost_per_unit: material.cost_per_unit,
            percentage: material.percentage,
            total_cost: material.total_cost,
            created_at: now,
        });
    }

    tx.commit().await?;

    tracing::debug!(
        building_cost_id,
        materials = lines.len(),
        "Estimate saved with material breakdown"
    );
    Ok((to_created(estimate, building_cost_id, now), lines))
}

fn insert_estimate(
    estimate: &NewBuildingCost,
    now: i64,
) -> sqlx::query::Query<'_, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'_>> {
    sqlx::query(
        "INSERT INTO building_costs \
         (name, region, building_type, square_footage, cost_per_sqft, total_cost, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&estimate.name)
    .bind(&estimate.region)
    .bind(&estimate.building_type)
    .bind(estimate.square_footage)
    .bind(estimate.cost_per_sqft.to_string())
    .bind(estimate.total_cost.to_string())
    .bind(now)
    .bind(now)
}

pub async fn get(pool: &SqlitePool, id: i64) -> Result<Option<BuildingCostRow>, SqliteError> {
    let row = sqlx::query("SELECT * FROM building_costs WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.map(|r| to_row(&r)).transpose()
}

pub async fn list(pool: &SqlitePool) -> Result<Vec<BuildingCostRow>, SqliteError> {
    let rows = sqlx::query("SELECT * FROM building_costs ORDER BY created_at DESC, id DESC")
        .fetch_all(pool)
        .await?;

    rows.iter().map(to_row).collect()
}

/// Material breakdown of one estimate
pub async fn list_materials(
    pool: &SqlitePool,
    building_cost_id: i64,
) -> Result<Vec<BuildingCostMaterialRow>, SqliteError> {
    let rows = sqlx::query(
        "SELECT * FROM building_cost_materials WHERE building_cost_id = ? ORDER BY id ASC",
    )
    .bind(building_cost_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(to_material).collect()
}

/// Delete an estimate; its material lines cascade
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, SqliteError> {
    let result = sqlx::query("DELETE FROM building_costs WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

fn to_row(row: &sqlx::sqlite::SqliteRow) -> Result<BuildingCostRow, SqliteError> {
    Ok(BuildingCostRow {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        region: row.try_get("region")?,
        building_type: row.try_get("building_type")?,
        square_footage: row.try_get("square_footage")?,
        cost_per_sqft: dec_col(row, "cost_per_sqft")?,
        total_cost: dec_col(row, "total_cost")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn to_material(row: &sqlx::sqlite::SqliteRow) -> Result<BuildingCostMaterialRow, SqliteError> {
    Ok(BuildingCostMaterialRow {
        id: row.try_get("id")?,
        building_cost_id: row.try_get("building_cost_id")?,
        material_type_id: row.try_get("material_type_id")?,
        quantity: dec_col(row, "quantity")?,
        cost_per_unit: dec_col(row, "cost_per_unit")?,
        percentage: dec_col(row, "percentage")?,
        total_cost: dec_col(row, "total_cost")?,
        created_at: row.try_get("created_at")?,
    })
}

fn to_created(estimate: &NewBuildingCost, id: i64, now: i64) -> BuildingCostRow {
    BuildingCostRow {
        id,
        name: estimate.name.clone(),
        region: estimate.region.clone(),
        building_type: estimate.building_type.clone(),
        square_footage: estimate.square_footage,
        cost_per_sqft: estimate.cost_per_sqft,
        total_cost: estimate.total_cost,
        created_at: now,
        updated_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::repositories::{material, setup_test_pool};
    use crate::domain::validate::parse_payload;
    use serde_json::json;

    fn estimate(total: &str) -> NewBuildingCost {
        parse_payload(json!({
            "name": "Main St warehouse",
            "region": "Benton",
            "buildingType": "COM",
            "squareFootage": 12000,
            "costPerSqft": "85.00",
            "totalCost": total
        }))
        .unwrap()
    }

    fn line(material_type_id: i64, total: &str) -> NewBuildingCostMaterial {
        parse_payload(json!({
            "materialTypeId": material_type_id,
            "quantity": "100.00",
            "costPerUnit": "10.00",
            "percentage": "50.00",
            "totalCost": total
        }))
        .unwrap()
    }

    async fn seed_material(pool: &SqlitePool, code: &str) -> i64 {
        let payload = parse_payload(json!({
            "name": format!("Material {code}"),
            "code": code,
            "unit": "sqft"
        }))
        .unwrap();
        material::create_type(pool, &payload).await.unwrap().id
    }

    #[tokio::test]
    async fn test_create_with_materials_atomic() {
        let pool = setup_test_pool().await;
        let conc = seed_material(&pool, "CONC").await;
        let stl = seed_material(&pool, "STL").await;

        let (created, lines) = create_with_materials(
            &pool,
            &estimate("2000.00"),
            &[line(conc, "1200.00"), line(stl, "800.00")],
        )
        .await
        .unwrap();

        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.building_cost_id == created.id));

        let stored = list_materials(&pool, created.id).await.unwrap();
        assert_eq!(stored.len(), 2);
    }

    #[tokio::test]
    async fn test_total_mismatch_writes_nothing() {
        let pool = setup_test_pool().await;
        let conc = seed_material(&pool, "CONC").await;

        let err = create_with_materials(&pool, &estimate("2000.00"), &[line(conc, "1999.99")])
            .await
            .unwrap_err();
        assert!(err.is_conflict());

        let estimates: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM building_costs")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(estimates, 0);
    }

    #[tokio::test]
    async fn test_no_materials_skips_total_check() {
        let pool = setup_test_pool().await;

        let (created, lines) = create_with_materials(&pool, &estimate("2000.00"), &[])
            .await
            .unwrap();
        assert!(lines.is_empty());
        assert!(get(&pool, created.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_cascades_to_materials() {
        let pool = setup_test_pool().await;
        let conc = seed_material(&pool, "CONC").await;

        let (created, _) =
            create_with_materials(&pool, &estimate("1200.00"), &[line(conc, "1200.00")])
                .await
                .unwrap();

        assert!(delete(&pool, created.id).await.unwrap());

        let orphans: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM building_cost_materials")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(orphans, 0);
    }
}

//! Cost matrix repository
//!
//! The (region, buildingType, matrixYear) triple is unique. `create` surfaces
//! a duplicate as `Conflict`; `upsert` is the import path and overwrites the
//! existing row for the triple instead.

use sqlx::{Row, SqlitePool};

use crate::data::sqlite::error::{SqliteError, map_unique};
use crate::data::types::costs::{CostMatrixFilter, CostMatrixRow};
use crate::domain::payloads::costs::{CostMatrixUpdate, NewCostMatrix};

use super::{clamp_limit, dec_col, dec_col_opt};

pub async fn create(pool: &SqlitePool, matrix: &NewCostMatrix) -> Result<CostMatrixRow, SqliteError> {
    let now = chrono::Utc::now().timestamp();

    let result = insert_query(matrix, now, false)
        .execute(pool)
        .await
        .map_err(|e| map_unique(e, "cost matrix for (region, building type, year)"))?;

    Ok(to_created(matrix, result.last_insert_rowid(), now))
}

/// Import path: insert or fully overwrite the row for the unique triple
pub async fn upsert(pool: &SqlitePool, matrix: &NewCostMatrix) -> Result<CostMatrixRow, SqliteError> {
    let now = chrono::Utc::now().timestamp();

    insert_query(matrix, now, true).execute(pool).await?;

    // the rowid of an upsert is unreliable, re-read by the unique key
    let row = sqlx::query(
        "SELECT * FROM cost_matrix WHERE region = ? AND building_type = ? AND matrix_year = ?",
    )
    .bind(&matrix.region)
    .bind(&matrix.building_type)
    .bind(matrix.matrix_year)
    .fetch_one(pool)
    .await?;

    to_row(&row)
}

fn insert_query(
    matrix: &NewCostMatrix,
    now: i64,
    overwrite: bool,
) -> sqlx::query::Query<'_, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'_>> {
    let sql = if overwrite {
        r#"
        INSERT INTO cost_matrix
            (region, building_type, building_type_description, base_cost, matrix_year,
             source_matrix_id, matrix_description, data_points, min_cost, max_cost,
             complexity_factor_base, quality_factor_base, condition_factor_base,
             county, state, is_active, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(region, building_type, matrix_year) DO UPDATE SET
            building_type_description = excluded.building_type_description,
            base_cost = excluded.base_cost,
            source_matrix_id = excluded.source_matrix_id,
            matrix_description = excluded.matrix_description,
            data_points = excluded.data_points,
            min_cost = excluded.min_cost,
            max_cost = excluded.max_cost,
            complexity_factor_base = excluded.complexity_factor_base,
            quality_factor_base = excluded.quality_factor_base,
            condition_factor_base = excluded.condition_factor_base,
            county = excluded.county,
            state = excluded.state,
            is_active = excluded.is_active,
            updated_at = excluded.updated_at
        "#
    } else {
        r#"
        INSERT INTO cost_matrix
            (region, building_type, building_type_description, base_cost, matrix_year,
             source_matrix_id, matrix_description, data_points, min_cost, max_cost,
             complexity_factor_base, quality_factor_base, condition_factor_base,
             county, state, is_active, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#
    };

    sqlx::query(sql)
        .bind(&matrix.region)
        .bind(&matrix.building_type)
        .bind(&matrix.building_type_description)
        .bind(matrix.base_cost.to_string())
        .bind(matrix.matrix_year)
        .bind(matrix.source_matrix_id)
        .bind(&matrix.matrix_description)
        .bind(matrix.data_points)
        .bind(matrix.min_cost.map(|d| d.to_string()))
        .bind(matrix.max_cost.map(|d| d.to_string()))
        .bind(matrix.complexity_factor_base.to_string())
        .bind(matrix.quality_factor_base.to_string())
        .bind(matrix.condition_factor_base.to_string())
        .bind(&matrix.county)
        .bind(&matrix.state)
        .bind(matrix.is_active)
        .bind(now)
        .bind(now)
}

pub async fn get(pool: &SqlitePool, id: i64) -> Result<Option<CostMatrixRow>, SqliteError> {
    let row = sqlx::query("SELECT * FROM cost_matrix WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.map(|r| to_row(&r)).transpose()
}

/// Find by the unique (region, buildingType, matrixYear) triple
pub async fn find(
    pool: &SqlitePool,
    region: &str,
    building_type: &str,
    matrix_year: i32,
) -> Result<Option<CostMatrixRow>, SqliteError> {
    let row = sqlx::query(
        "SELECT * FROM cost_matrix WHERE region = ? AND building_type = ? AND matrix_year = ?",
    )
    .bind(region)
    .bind(building_type)
    .bind(matrix_year)
    .fetch_optional(pool)
    .await?;

    row.map(|r| to_row(&r)).transpose()
}

/// List matching matrices, paged. Every set filter constrains the result;
/// unset filters do not.
pub async fn list(
    pool: &SqlitePool,
    filter: &CostMatrixFilter,
    page: u32,
    limit: u32,
) -> Result<(Vec<CostMatrixRow>, u64), SqliteError> {
    let limit = clamp_limit(limit);
    let offset = page.saturating_sub(1) * limit;

    let mut where_clauses: Vec<&str> = Vec::new();
    if filter.region.is_some() {
        where_clauses.push("region = ?");
    }
    if filter.building_type.is_some() {
        where_clauses.push("building_type = ?");
    }
    if filter.matrix_year.is_some() {
        where_clauses.push("matrix_year = ?");
    }
    if filter.county.is_some() {
        where_clauses.push("county = ?");
    }
    if filter.state.is_some() {
        where_clauses.push("state = ?");
    }
    if filter.is_active.is_some() {
        where_clauses.push("is_active = ?");
    }

    let where_sql = if where_clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", where_clauses.join(" AND "))
    };

    let list_sql = format!(
        "SELECT * FROM cost_matrix{where_sql} \
         ORDER BY region ASC, building_type ASC, matrix_year DESC LIMIT ? OFFSET ?"
    );
    let count_sql = format!("SELECT COUNT(*) FROM cost_matrix{where_sql}");

    let mut list_query = sqlx::query(&list_sql);
    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    macro_rules! bind_filter {
        ($field:expr) => {
            if let Some(value) = $field {
                list_query = list_query.bind(value.clone());
                count_query = count_query.bind(value.clone());
            }
        };
    }
    bind_filter!(&filter.region);
    bind_filter!(&filter.building_type);
    bind_filter!(&filter.matrix_year);
    bind_filter!(&filter.county);
    bind_filter!(&filter.state);
    bind_filter!(&filter.is_active);

    let rows = list_query.bind(limit).bind(offset).fetch_all(pool).await?;
    let total = count_query.fetch_one(pool).await?;

    let matrices = rows.iter().map(to_row).collect::<Result<Vec<_>, _>>()?;
    Ok((matrices, total as u64))
}

/// Apply a partial update. Returns the fresh row, or `None` when the id does
/// not exist. Any change refreshes `updated_at`.
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    update: &CostMatrixUpdate,
) -> Result<Option<CostMatrixRow>, SqliteError> {
    let now = chrono::Utc::now().timestamp();

    let mut sets: Vec<&str> = Vec::new();
    if update.base_cost.is_some() {
        sets.push("base_cost = ?");
    }
    if update.building_type_description.is_some() {
        sets.push("building_type_description = ?");
    }
    if update.matrix_description.is_some() {
        sets.push("matrix_description = ?");
    }
    if update.data_points.is_some() {
        sets.push("data_points = ?");
    }
    if update.min_cost.is_some() {
        sets.push("min_cost = ?");
    }
    if update.max_cost.is_some() {
        sets.push("max_cost = ?");
    }
    if update.complexity_factor_base.is_some() {
        sets.push("complexity_factor_base = ?");
    }
    if update.quality_factor_base.is_some() {
        sets.push("quality_factor_base = ?");
    }
    if update.condition_factor_base.is_some() {
        sets.push("condition_factor_base = ?");
    }
    if update.county.is_some() {
        sets.push("county = ?");
    }
    if update.state.is_some() {
        sets.push("state = ?");
    }
    if update.is_active.is_some() {
        sets.push("is_active = ?");
    }

    if sets.is_empty() {
        return get(pool, id).await;
    }
    sets.push("updated_at = ?");

    let sql = format!("UPDATE cost_matrix SET {} WHERE id = ?", sets.join(", "));
    let mut query = sqlx::query(&sql);

    if let Some(v) = update.base_cost {
        query = query.bind(v.to_string());
    }
    if let Some(v) = &update.building_type_description {
        query = query.bind(v);
    }
    if let Some(v) = &update.matrix_description {
        query = query.bind(v);
    }
    if let Some(v) = update.data_points {
        query = query.bind(v);
    }
    if let Some(v) = update.min_cost {
        query = query.bind(v.to_string());
    }
    if let Some(v) = update.max_cost {
        query = query.bind(v.to_string());
    }
    if let Some(v) = update.complexity_factor_base {
        query = query.bind(v.to_string());
    }
    if let Some(v) = update.quality_factor_base {
        query = query.bind(v.to_string());
    }
    if let Some(v) = update.condition_factor_base {
        query = query.bind(v.to_string());
    }
    if let Some(v) = &update.county {
        query = query.bind(v);
    }
    if let Some(v) = &update.state {
        query = query.bind(v);
    }
    if let Some(v) = update.is_active {
        query = query.bind(v);
    }

    let result = query.bind(now).bind(id).execute(pool).await?;
    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get(pool, id).await
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, SqliteError> {
    let result = sqlx::query("DELETE FROM cost_matrix WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

fn to_row(row: &sqlx::sqlite::SqliteRow) -> Result<CostMatrixRow, SqliteError> {
    Ok(CostMatrixRow {
        id: row.try_get("id")?,
        region: row.try_get("region")?,
        building_type: row.try_get("building_type")?,
        building_type_description: row.try_get("building_type_description")?,
        base_cost: dec_col(row, "base_cost")?,
        matrix_year: row.try_get("matrix_year")?,
        source_matrix_id: row.try_get("source_matrix_id")?,
        matrix_description: row.try_get("matrix_description")?,
        data_points: row.try_get("data_points")?,
        min_cost: dec_col_opt(row, "min_cost")?,
        max_cost: dec_col_opt(row, "max_cost")?,
        complexity_factor_base: dec_col(row, "complexity_factor_base")?,
        quality_factor_base: dec_col(row, "quality_factor_base")?,
        condition_factor_base: dec_col(row, "condition_factor_base")?,
        county: row.try_get("county")?,
        state: row.try_get("state")?,
        is_active: row.try_get("is_active")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn to_created(matrix: &NewCostMatrix, id: i64, now: i64) -> CostMatrixRow {
    CostMatrixRow {
        id,
        region: matrix.region.clone(),
        building_type: matrix.building_type.clone(),
        building_type_description: matrix.building_type_description.clone(),
        base_cost: matrix.base_cost,
        matrix_year: matrix.matrix_year,
        source_matrix_id: matrix.source_matrix_id,
        matrix_description: matrix.matrix_description.clone(),
        data_points: matrix.data_points,
        min_cost: matrix.min_cost,
        max_cost: matrix.max_cost,
        complexity_factor_base: matrix.complexity_factor_base,
        quality_factor_base: matrix.quality_factor_base,
        condition_factor_base: matrix.condition_factor_base,
        county: matrix.county.clone(),
        state: matrix.state.clone(),
        is_active: matrix.is_active,
        created_at: now,
        updated_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::repositories::setup_test_pool;
    use crate::domain::validate::parse_payload;
    use serde_json::json;

    fn matrix(region: &str, building_type: &str, year: i32, base: &str) -> NewCostMatrix {
        parse_payload(json!({
            "region": region,
            "buildingType": building_type,
            "buildingTypeDescription": "desc",
            "baseCost": base,
            "matrixYear": year,
            "sourceMatrixId": 7,
            "matrixDescription": "import"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_duplicate_triple_conflicts() {
        let pool = setup_test_pool().await;

        create(&pool, &matrix("Benton", "RES", 2025, "145.50")).await.unwrap();
        let err = create(&pool, &matrix("Benton", "RES", 2025, "150.00"))
            .await
            .unwrap_err();
        assert!(err.is_conflict());

        // different year is a different row
        create(&pool, &matrix("Benton", "RES", 2026, "150.00")).await.unwrap();
    }

    #[tokio::test]
    async fn test_upsert_overwrites() {
        let pool = setup_test_pool().await;

        let first = upsert(&pool, &matrix("Benton", "RES", 2025, "145.50")).await.unwrap();
        let second = upsert(&pool, &matrix("Benton", "RES", 2025, "150.00")).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.base_cost.to_string(), "150.00");

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cost_matrix")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(total, 1);
    }

    #[tokio::test]
    async fn test_list_filters_combine() {
        let pool = setup_test_pool().await;

        create(&pool, &matrix("Benton", "RES", 2025, "145.50")).await.unwrap();
        create(&pool, &matrix("Benton", "COM", 2025, "95.00")).await.unwrap();
        create(&pool, &matrix("Franklin", "RES", 2025, "139.00")).await.unwrap();

        let filter = CostMatrixFilter {
            region: Some("Benton".into()),
            building_type: Some("RES".into()),
            ..Default::default()
        };
        let (rows, total) = list(&pool, &filter, 1, 10).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(rows[0].region, "Benton");
        assert_eq!(rows[0].building_type, "RES");

        let (all, total_all) = list(&pool, &CostMatrixFilter::default(), 1, 10).await.unwrap();
        assert_eq!(total_all, 3);
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_update_refreshes_updated_at() {
        let pool = setup_test_pool().await;

        let created = create(&pool, &matrix("Benton", "RES", 2025, "145.50")).await.unwrap();

        // force a visible timestamp delta
        sqlx::query("UPDATE cost_matrix SET updated_at = updated_at - 100 WHERE id = ?")
            .bind(created.id)
            .execute(&pool)
            .await
            .unwrap();
        let before = get(&pool, created.id).await.unwrap().unwrap();

        let change: CostMatrixUpdate =
            parse_payload(json!({"baseCost": "160.00", "isActive": false})).unwrap();
        let updated = update(&pool, created.id, &change).await.unwrap().unwrap();

        assert_eq!(updated.base_cost.to_string(), "160.00");
        assert!(!updated.is_active);
        assert!(updated.updated_at > before.updated_at);

        assert!(update(&pool, 999, &change).await.unwrap().is_none());
    }
}

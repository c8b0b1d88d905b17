//! Benton reference matrix repository
//!
//! Imported assessment matrices, versioned by year. `lookup_cell` is the hot
//! path: exact cell first, then the matrix's lookup strategy when the header
//! allows interpolation, then the header's default cell value.

use rust_decimal::Decimal;
use sqlx::{Row, SqlitePool};

use crate::data::sqlite::error::{SqliteError, map_unique};
use crate::data::types::matrices::{
    BentonDepreciationMatrixRow, BentonImprvSchedMatrixAssocRow, BentonMatrixAxisRow,
    BentonMatrixDetailRow, BentonMatrixRow,
};
use crate::domain::matrix::StrategyRegistry;
use crate::domain::payloads::matrices::{
    NewBentonDepreciationMatrix, NewBentonImprvSchedMatrixAssoc, NewBentonMatrix,
    NewBentonMatrixAxis, NewBentonMatrixDetail,
};

use super::dec_col;

pub async fn insert_axis(
    pool: &SqlitePool,
    axis: &NewBentonMatrixAxis,
) -> Result<BentonMatrixAxisRow, SqliteError> {
    let now = chrono::Utc::now().timestamp();

    let result = sqlx::query(
        "INSERT INTO benton_matrix_axis (matrix_year, axis_cd, data_type, lookup_query, matrix_type, created_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(axis.matrix_year)
    .bind(&axis.axis_cd)
    .bind(&axis.data_type)
    .bind(&axis.lookup_query)
    .bind(&axis.matrix_type)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(BentonMatrixAxisRow {
        id: result.last_insert_rowid(),
        matrix_year: axis.matrix_year,
        axis_cd: axis.axis_cd.clone(),
        data_type: axis.data_type.clone(),
        lookup_query: axis.lookup_query.clone(),
        matrix_type: axis.matrix_type.clone(),
        created_at: now,
    })
}

pub async fn list_axes(
    pool: &SqlitePool,
    matrix_type: &str,
    matrix_year: i32,
) -> Result<Vec<BentonMatrixAxisRow>, SqliteError> {
    let rows = sqlx::query(
        "SELECT * FROM benton_matrix_axis WHERE matrix_type = ? AND matrix_year = ? ORDER BY axis_cd ASC",
    )
    .bind(matrix_type)
    .bind(matrix_year)
    .fetch_all(pool)
    .await?;

    rows.iter().map(to_axis).collect()
}

/// Insert a matrix header. (matrixId, matrixYear) is unique.
pub async fn insert_matrix(
    pool: &SqlitePool,
    matrix: &NewBentonMatrix,
) -> Result<BentonMatrixRow, SqliteError> {
    let now = chrono::Utc::now().timestamp();

    let result = sqlx::query(
        r#"
        INSERT INTO benton_matrix
            (matrix_id, matrix_year, label, axis_1, axis_2, matrix_description, operator,
             default_cell_value, b_interpolate, matrix_type, matrix_sub_type_cd, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(matrix.matrix_id)
    .bind(matrix.matrix_year)
    .bind(&matrix.label)
    .bind(&matrix.axis_1)
    .bind(&matrix.axis_2)
    .bind(&matrix.matrix_description)
    .bind(&matrix.operator)
    .bind(matrix.default_cell_value.to_string())
    .bind(matrix.b_interpolate)
    .bind(&matrix.matrix_type)
    .bind(&matrix.matrix_sub_type_cd)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| map_unique(e, "matrix for (matrix id, year)"))?;

    Ok(BentonMatrixRow {
        id: result.last_insert_rowid(),
        matrix_id: matrix.matrix_id,
        matrix_year: matrix.matrix_year,
        label: matrix.label.clone(),
        axis_1: matrix.axis_1.clone(),
        axis_2: matrix.axis_2.clone(),
        matrix_description: matrix.matrix_description.clone(),
        operator: matrix.operator.clone(),
        default_cell_value: matrix.default_cell_value,
        b_interpolate: matrix.b_interpolate,
        matrix_type: matrix.matrix_type.clone(),
        matrix_sub_type_cd: matrix.matrix_sub_type_cd.clone(),
        created_at: now,
    })
}

pub async fn find_matrix(
    pool: &SqlitePool,
    matrix_id: i64,
    matrix_year: i32,
) -> Result<Option<BentonMatrixRow>, SqliteError> {
    let row = sqlx::query("SELECT * FROM benton_matrix WHERE matrix_id = ? AND matrix_year = ?")
        .bind(matrix_id)
        .bind(matrix_year)
        .fetch_optional(pool)
        .await?;

    row.map(|r| to_matrix(&r)).transpose()
}

pub async fn list_matrices_by_type(
    pool: &SqlitePool,
    matrix_type: &str,
    matrix_year: i32,
) -> Result<Vec<BentonMatrixRow>, SqliteError> {
    let rows = sqlx::query(
        "SELECT * FROM benton_matrix WHERE matrix_type = ? AND matrix_year = ? ORDER BY matrix_id ASC",
    )
    .bind(matrix_type)
    .bind(matrix_year)
    .fetch_all(pool)
    .await?;

    rows.iter().map(to_matrix).collect()
}

/// Insert a cell. The (matrixId, matrixYear, axis1Value, axis2Value) cell key
/// is unique.
pub async fn insert_detail(
    pool: &SqlitePool,
    detail: &NewBentonMatrixDetail,
) -> Result<BentonMatrixDetailRow, SqliteError> {
    let now = chrono::Utc::now().timestamp();

    let result = sqlx::query(
        "INSERT INTO benton_matrix_detail \
         (matrix_id, matrix_year, axis_1_value, axis_2_value, cell_value, created_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(detail.matrix_id)
    .bind(detail.matrix_year)
    .bind(&detail.axis_1_value)
    .bind(&detail.axis_2_value)
    .bind(detail.cell_value.to_string())
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| map_unique(e, "matrix cell"))?;

    Ok(BentonMatrixDetailRow {
        id: result.last_insert_rowid(),
        matrix_id: detail.matrix_id,
        matrix_year: detail.matrix_year,
        axis_1_value: detail.axis_1_value.clone(),
        axis_2_value: detail.axis_2_value.clone(),
        cell_value: detail.cell_value,
        created_at: now,
    })
}

pub async fn list_details(
    pool: &SqlitePool,
    matrix_id: i64,
    matrix_year: i32,
) -> Result<Vec<BentonMatrixDetailRow>, SqliteError> {
    let rows = sqlx::query(
        "SELECT * FROM benton_matrix_detail WHERE matrix_id = ? AND matrix_year = ? \
         ORDER BY axis_1_value ASC, axis_2_value ASC",
    )
    .bind(matrix_id)
    .bind(matrix_year)
    .fetch_all(pool)
    .await?;

    rows.iter().map(to_detail).collect()
}

/// Resolve a cell value for a matrix/year at an axis pair.
///
/// Resolution order: exact cell, then the registered lookup strategy when the
/// header has `b_interpolate` set, then the header's `default_cell_value`.
/// `None` only when the matrix header itself is missing.
pub async fn lookup_cell(
    pool: &SqlitePool,
    strategies: &StrategyRegistry,
    matrix_id: i64,
    matrix_year: i32,
    axis_1_value: &str,
    axis_2_value: &str,
) -> Result<Option<Decimal>, SqliteError> {
    let Some(header) = find_matrix(pool, matrix_id, matrix_year).await? else {
        return Ok(None);
    };

    let exact = sqlx::query(
        "SELECT cell_value FROM benton_matrix_detail \
         WHERE matrix_id = ? AND matrix_year = ? AND axis_1_value = ? AND axis_2_value = ?",
    )
    .bind(matrix_id)
    .bind(matrix_year)
    .bind(axis_1_value)
    .bind(axis_2_value)
    .fetch_optional(pool)
    .await?;

    if let Some(row) = exact {
        return Ok(Some(dec_col(&row, "cell_value")?));
    }

    if header.b_interpolate {
        let cells = list_details(pool, matrix_id, matrix_year).await?;
        let strategy = strategies.for_matrix_type(&header.matrix_type);
        if let Some(value) = strategy.resolve(&cells, axis_1_value, axis_2_value) {
            return Ok(Some(value));
        }
    }

    Ok(Some(header.default_cell_value))
}

pub async fn insert_sched_assoc(
    pool: &SqlitePool,
    assoc: &NewBentonImprvSchedMatrixAssoc,
) -> Result<BentonImprvSchedMatrixAssocRow, SqliteError> {
    let now = chrono::Utc::now().timestamp();

    let result = sqlx::query(
        r#"
        INSERT INTO benton_imprv_sched_matrix_assoc
            (imprv_det_meth_cd, imprv_det_type_cd, imprv_det_class_cd, imprv_yr,
             matrix_id, matrix_order, adj_factor, imprv_det_sub_class_cd, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&assoc.imprv_det_meth_cd)
    .bind(&assoc.imprv_det_type_cd)
    .bind(&assoc.imprv_det_class_cd)
    .bind(assoc.imprv_yr)
    .bind(assoc.matrix_id)
    .bind(assoc.matrix_order)
    .bind(assoc.adj_factor)
    .bind(&assoc.imprv_det_sub_class_cd)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(BentonImprvSchedMatrixAssocRow {
        id: result.last_insert_rowid(),
        imprv_det_meth_cd: assoc.imprv_det_meth_cd.clone(),
        imprv_det_type_cd: assoc.imprv_det_type_cd.clone(),
        imprv_det_class_cd: assoc.imprv_det_class_cd.clone(),
        imprv_yr: assoc.imprv_yr,
        matrix_id: assoc.matrix_id,
        matrix_order: assoc.matrix_order,
        adj_factor: assoc.adj_factor,
        imprv_det_sub_class_cd: assoc.imprv_det_sub_class_cd.clone(),
        created_at: now,
    })
}

/// Matrices scheduled for an improvement detail, in application order
pub async fn list_sched_assocs(
    pool: &SqlitePool,
    imprv_det_meth_cd: &str,
    imprv_det_type_cd: &str,
    imprv_det_class_cd: &str,
    imprv_yr: i32,
) -> Result<Vec<BentonImprvSchedMatrixAssocRow>, SqliteError> {
    let rows = sqlx::query(
        "SELECT * FROM benton_imprv_sched_matrix_assoc \
         WHERE imprv_det_meth_cd = ? AND imprv_det_type_cd = ? AND imprv_det_class_cd = ? AND imprv_yr = ? \
         ORDER BY matrix_order ASC",
    )
    .bind(imprv_det_meth_cd)
    .bind(imprv_det_type_cd)
    .bind(imprv_det_class_cd)
    .bind(imprv_yr)
    .fetch_all(pool)
    .await?;

    rows.iter().map(to_assoc).collect()
}

pub async fn insert_depreciation(
    pool: &SqlitePool,
    dep: &NewBentonDepreciationMatrix,
) -> Result<BentonDepreciationMatrixRow, SqliteError> {
    let now = chrono::Utc::now().timestamp();

    let result = sqlx::query(
        "INSERT INTO benton_depreciation_matrix \
         (val_sub_element, matrix_id, age, factor, condition_mapped, created_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&dep.val_sub_element)
    .bind(dep.matrix_id)
    .bind(dep.age)
    .bind(dep.factor)
    .bind(&dep.condition_mapped)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(BentonDepreciationMatrixRow {
        id: result.last_insert_rowid(),
        val_sub_element: dep.val_sub_element.clone(),
        matrix_id: dep.matrix_id,
        age: dep.age,
        factor: dep.factor,
        condition_mapped: dep.condition_mapped.clone(),
        created_at: now,
    })
}

/// Depreciation factor for a condition at an age; when no exact age row
/// exists the nearest lower age wins
pub async fn depreciation_factor(
    pool: &SqlitePool,
    matrix_id: i64,
    condition_mapped: &str,
    age: i32,
) -> Result<Option<i32>, SqliteError> {
    let row: Option<(i32,)> = sqlx::query_as(
        "SELECT factor FROM benton_depreciation_matrix \
         WHERE matrix_id = ? AND condition_mapped = ? AND age <= ? \
         ORDER BY age DESC LIMIT 1",
    )
    .bind(matrix_id)
    .bind(condition_mapped)
    .bind(age)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|(factor,)| factor))
}

fn to_axis(row: &sqlx::sqlite::SqliteRow) -> Result<BentonMatrixAxisRow, SqliteError> {
    Ok(BentonMatrixAxisRow {
        id: row.try_get("id")?,
        matrix_year: row.try_get("matrix_year")?,
        axis_cd: row.try_get("axis_cd")?,
        data_type: row.try_get("data_type")?,
        lookup_query: row.try_get("lookup_query")?,
        matrix_type: row.try_get("matrix_type")?,
        created_at: row.try_get("created_at")?,
    })
}

fn to_matrix(row: &sqlx::sqlite::SqliteRow) -> Result<BentonMatrixRow, SqliteError> {
    Ok(BentonMatrixRow {
        id: row.try_get("id")?,
        matrix_id: row.try_get("matrix_id")?,
        matrix_year: row.try_get("matrix_year")?,
        label: row.try_get("label")?,
        axis_1: row.try_get("axis_1")?,
        axis_2: row.try_get("axis_2")?,
        matrix_description: row.try_get("matrix_description")?,
        operator: row.try_get("operator")?,
        default_cell_value: dec_col(row, "default_cell_value")?,
        b_interpolate: row.try_get("b_interpolate")?,
        matrix_type: row.try_get("matrix_type")?,
        matrix_sub_type_cd: row.try_get("matrix_sub_type_cd")?,
        created_at: row.try_get("created_at")?,
    })
}

fn to_detail(row: &sqlx::sqlite::SqliteRow) -> Result<BentonMatrixDetailRow, SqliteError> {
    Ok(BentonMatrixDetailRow {
        id: row.try_get("id")?,
        matrix_id: row.try_get("matrix_id")?,
        matrix_year: row.try_get("matrix_year")?,
        axis_1_value: row.try_get("axis_1_value")?,
        axis_2_value: row.try_get("axis_2_value")?,
        cell_value: dec_col(row, "cell_value")?,
        created_at: row.try_get("created_at")?,
    })
}

fn to_assoc(row: &sqlx::sqlite::SqliteRow) -> Result<BentonImprvSchedMatrixAssocRow, SqliteError> {
    Ok(BentonImprvSchedMatrixAssocRow {
        id: row.try_get("id")?,
        imprv_det_meth_cd: row.try_get("imprv_det_meth_cd")?,
        imprv_det_type_cd: row.try_get("imprv_det_type_cd")?,
        imprv_det_class_cd: row.try_get("imprv_det_class_cd")?,
        imprv_yr: row.try_get("imprv_yr")?,
        matrix_id: row.try_get("matrix_id")?,
        matrix_order: row.try_get("matrix_order")?,
        adj_factor: row.try_get("adj_factor")?,
        imprv_det_sub_class_cd: row.try_get("imprv_det_sub_class_cd")?,
        created_at: row.try_get("created_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::repositories::setup_test_pool;
    use crate::domain::validate::parse_payload;
    use serde_json::json;

    fn header(matrix_id: i64, interpolate: bool) -> NewBentonMatrix {
        parse_payload(json!({
            "matrixId": matrix_id,
            "matrixYear": 2025,
            "label": "RES base",
            "axis1": "SQFT",
            "axis2": "CLASS",
            "matrixDescription": "Residential base cost schedule",
            "operator": "*",
            "defaultCellValue": "1.00",
            "bInterpolate": interpolate,
            "matrixType": "IMPRV"
        }))
        .unwrap()
    }

    fn cell(matrix_id: i64, a1: &str, a2: &str, value: &str) -> NewBentonMatrixDetail {
        parse_payload(json!({
            "matrixId": matrix_id,
            "matrixYear": 2025,
            "axis1Value": a1,
            "axis2Value": a2,
            "cellValue": value
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_duplicate_header_and_cell_conflict() {
        let pool = setup_test_pool().await;

        insert_matrix(&pool, &header(407, false)).await.unwrap();
        assert!(insert_matrix(&pool, &header(407, false)).await.unwrap_err().is_conflict());

        insert_detail(&pool, &cell(407, "1000", "3", "52.00")).await.unwrap();
        assert!(insert_detail(&pool, &cell(407, "1000", "3", "53.00"))
            .await
            .unwrap_err()
            .is_conflict());
    }

    #[tokio::test]
    async fn test_lookup_exact_cell() {
        let pool = setup_test_pool().await;
        let strategies = StrategyRegistry::new();

        insert_matrix(&pool, &header(407, false)).await.unwrap();
        insert_detail(&pool, &cell(407, "1000", "3", "52.00")).await.unwrap();

        let value = lookup_cell(&pool, &strategies, 407, 2025, "1000", "3")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(value.to_string(), "52.00");
    }

    #[tokio::test]
    async fn test_lookup_uses_strategy_when_interpolating() {
        let pool = setup_test_pool().await;
        let strategies = StrategyRegistry::new();

        insert_matrix(&pool, &header(407, true)).await.unwrap();
        insert_detail(&pool, &cell(407, "1000", "3", "52.00")).await.unwrap();
        insert_detail(&pool, &cell(407, "2000", "3", "48.00")).await.unwrap();

        // nearest match: 1800 is closer to 2000
        let value = lookup_cell(&pool, &strategies, 407, 2025, "1800", "3")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(value.to_string(), "48.00");
    }

    #[tokio::test]
    async fn test_lookup_falls_back_to_default_cell_value() {
        let pool = setup_test_pool().await;
        let strategies = StrategyRegistry::new();

        // non-interpolating matrix with no cells
        insert_matrix(&pool, &header(407, false)).await.unwrap();

        let value = lookup_cell(&pool, &strategies, 407, 2025, "9999", "9")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(value.to_string(), "1.00");
    }

    #[tokio::test]
    async fn test_lookup_missing_matrix_is_none() {
        let pool = setup_test_pool().await;
        let strategies = StrategyRegistry::new();

        let value = lookup_cell(&pool, &strategies, 1, 2025, "1", "1").await.unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_depreciation_nearest_lower_age() {
        let pool = setup_test_pool().await;

        for (age, factor) in [(0, 100), (10, 85), (20, 70)] {
            let dep: NewBentonDepreciationMatrix = parse_payload(json!({
                "valSubElement": "RES",
                "matrixId": 9,
                "age": age,
                "factor": factor,
                "conditionMapped": "average"
            }))
            .unwrap();
            insert_depreciation(&pool, &dep).await.unwrap();
        }

        assert_eq!(depreciation_factor(&pool, 9, "average", 10).await.unwrap(), Some(85));
        assert_eq!(depreciation_factor(&pool, 9, "average", 15).await.unwrap(), Some(85));
        assert_eq!(depreciation_factor(&pool, 9, "average", 50).await.unwrap(), Some(70));
        assert_eq!(depreciation_factor(&pool, 9, "good", 10).await.unwrap(), None);
    }
}

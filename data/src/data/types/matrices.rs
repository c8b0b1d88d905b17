//! Benton assessment-matrix reference row types (imported, versioned by year)

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Axis definition for a matrix type/year
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BentonMatrixAxisRow {
    pub id: i64,
    pub matrix_year: i32,
    pub axis_cd: String,
    pub data_type: String,
    pub lookup_query: Option<String>,
    pub matrix_type: String,
    pub created_at: i64,
}

/// Matrix header row. `b_interpolate` signals that cell lookups between
/// declared axis values go through a lookup strategy rather than exact match.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BentonMatrixRow {
    pub id: i64,
    pub matrix_id: i64,
    pub matrix_year: i32,
    pub label: String,
    pub axis_1: String,
    pub axis_2: String,
    pub matrix_description: String,
    pub operator: String,
    pub default_cell_value: Decimal,
    pub b_interpolate: bool,
    pub matrix_type: String,
    pub matrix_sub_type_cd: Option<String>,
    pub created_at: i64,
}

/// One cell of a matrix, keyed by (matrixId, matrixYear, axis1Value, axis2Value)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BentonMatrixDetailRow {
    pub id: i64,
    pub matrix_id: i64,
    pub matrix_year: i32,
    pub axis_1_value: String,
    pub axis_2_value: String,
    pub cell_value: Decimal,
    pub created_at: i64,
}

/// Improvement-schedule association row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BentonImprvSchedMatrixAssocRow {
    pub id: i64,
    pub imprv_det_meth_cd: String,
    pub imprv_det_type_cd: String,
    pub imprv_det_class_cd: String,
    pub imprv_yr: i32,
    pub matrix_id: i64,
    pub matrix_order: i32,
    pub adj_factor: i32,
    pub imprv_det_sub_class_cd: String,
    pub created_at: i64,
}

/// Depreciation factor by age and mapped condition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BentonDepreciationMatrixRow {
    pub id: i64,
    pub val_sub_element: String,
    pub matrix_id: i64,
    pub age: i32,
    pub factor: i32,
    pub condition_mapped: String,
    pub created_at: i64,
}

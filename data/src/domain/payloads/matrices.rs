//! Benton reference-matrix import payloads
//!
//! These arrive from county assessment exports; validation here is about
//! structural sanity (years, decimal bounds), not assessment semantics.

use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewBentonMatrixAxis {
    #[validate(range(min = 1900, max = 2200))]
    pub matrix_year: i32,

    #[validate(length(min = 1, max = 64))]
    pub axis_cd: String,

    #[validate(length(min = 1, max = 32))]
    pub data_type: String,

    pub lookup_query: Option<String>,

    #[validate(length(min = 1, max = 64))]
    pub matrix_type: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewBentonMatrix {
    pub matrix_id: i64,

    #[validate(range(min = 1900, max = 2200))]
    pub matrix_year: i32,

    #[validate(length(min = 1, max = 128))]
    pub label: String,

    #[validate(length(min = 1, max = 64))]
    pub axis_1: String,

    #[validate(length(min = 1, max = 64))]
    pub axis_2: String,

    #[validate(length(min = 1))]
    pub matrix_description: String,

    #[validate(length(min = 1, max = 16))]
    pub operator: String,

    #[validate(custom(function = "crate::domain::validate::decimal_14_2"))]
    pub default_cell_value: Decimal,

    #[serde(default)]
    pub b_interpolate: bool,

    #[validate(length(min = 1, max = 64))]
    pub matrix_type: String,

    pub matrix_sub_type_cd: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewBentonMatrixDetail {
    pub matrix_id: i64,

    #[validate(range(min = 1900, max = 2200))]
    pub matrix_year: i32,

    #[validate(length(min = 1, max = 64))]
    pub axis_1_value: String,

    #[validate(length(min = 1, max = 64))]
    pub axis_2_value: String,

    #[validate(custom(function = "crate::domain::validate::decimal_14_2"))]
    pub cell_value: Decimal,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewBentonImprvSchedMatrixAssoc {
    #[validate(length(min = 1, max = 32))]
    pub imprv_det_meth_cd: String,

    #[validate(length(min = 1, max = 32))]
    pub imprv_det_type_cd: String,

    #[validate(length(min = 1, max = 32))]
    pub imprv_det_class_cd: String,

    #[validate(range(min = 1900, max = 2200))]
    pub imprv_yr: i32,

    pub matrix_id: i64,

    #[validate(range(min = 0))]
    pub matrix_order: i32,

    pub adj_factor: i32,

    #[validate(length(min = 1, max = 32))]
    pub imprv_det_sub_class_cd: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewBentonDepreciationMatrix {
    #[validate(length(min = 1, max = 64))]
    pub val_sub_element: String,

    pub matrix_id: i64,

    #[validate(range(min = 0))]
    pub age: i32,

    #[validate(range(min = 0, max = 100))]
    pub factor: i32,

    #[validate(length(min = 1, max = 32))]
    pub condition_mapped: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validate::parse_payload;
    use serde_json::json;

    #[test]
    fn test_matrix_header_parses() {
        let matrix: NewBentonMatrix = parse_payload(json!({
            "matrixId": 407,
            "matrixYear": 2025,
            "label": "RES base cost",
            "axis1": "SQFT",
            "axis2": "CLASS",
            "matrixDescription": "Residential base cost schedule",
            "operator": "*",
            "defaultCellValue": "0.00",
            "matrixType": "IMPRV"
        }))
        .unwrap();
        assert!(!matrix.b_interpolate);
    }

    #[test]
    fn test_detail_year_out_of_range() {
        let err = parse_payload::<NewBentonMatrixDetail>(json!({
            "matrixId": 407,
            "matrixYear": 225,
            "axis1Value": "1000",
            "axis2Value": "3",
            "cellValue": "52.00"
        }))
        .unwrap_err();
        assert!(err.field_errors().is_some());
    }
}

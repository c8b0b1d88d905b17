//! Cost-data payloads: factors, matrices, materials, estimates, presets,
//! price cache

use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use super::{decimal_one, default_true};

/// New cost factor for a (region, buildingType) pair
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewCostFactor {
    #[validate(length(min = 1, max = 64))]
    pub region: String,

    #[validate(length(min = 1, max = 64))]
    pub building_type: String,

    #[validate(
        custom(function = "crate::domain::validate::decimal_10_2"),
        custom(function = "crate::domain::validate::non_negative")
    )]
    pub base_cost: Decimal,

    #[serde(default = "decimal_one")]
    #[validate(
        custom(function = "crate::domain::validate::decimal_5_2"),
        custom(function = "crate::domain::validate::non_negative")
    )]
    pub complexity_factor: Decimal,

    #[serde(default = "decimal_one")]
    #[validate(
        custom(function = "crate::domain::validate::decimal_5_2"),
        custom(function = "crate::domain::validate::non_negative")
    )]
    pub region_factor: Decimal,
}

/// New cost matrix row for a (region, buildingType, matrixYear) triple
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewCostMatrix {
    #[validate(length(min = 1, max = 64))]
    pub region: String,

    #[validate(length(min = 1, max = 64))]
    pub building_type: String,

    #[validate(length(min = 1))]
    pub building_type_description: String,

    #[validate(
        custom(function = "crate::domain::validate::decimal_14_2"),
        custom(function = "crate::domain::validate::non_negative")
    )]
    pub base_cost: Decimal,

    #[validate(range(min = 1900, max = 2200))]
    pub matrix_year: i32,

    pub source_matrix_id: i64,

    #[validate(length(min = 1))]
    pub matrix_description: String,

    #[serde(default)]
    #[validate(range(min = 0))]
    pub data_points: i32,

    #[validate(custom(function = "crate::domain::validate::decimal_14_2"))]
    pub min_cost: Option<Decimal>,

    #[validate(custom(function = "crate::domain::validate::decimal_14_2"))]
    pub max_cost: Option<Decimal>,

    #[serde(default = "decimal_one")]
    #[validate(custom(function = "crate::domain::validate::decimal_5_2"))]
    pub complexity_factor_base: Decimal,

    #[serde(default = "decimal_one")]
    #[validate(custom(function = "crate::domain::validate::decimal_5_2"))]
    pub quality_factor_base: Decimal,

    #[serde(default = "decimal_one")]
    #[validate(custom(function = "crate::domain::validate::decimal_5_2"))]
    pub condition_factor_base: Decimal,

    pub county: Option<String>,
    pub state: Option<String>,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Partial cost matrix update; `None` fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CostMatrixUpdate {
    #[validate(
        custom(function = "crate::domain::validate::decimal_14_2"),
        custom(function = "crate::domain::validate::non_negative")
    )]
    pub base_cost: Option<Decimal>,

    #[validate(length(min = 1))]
    pub building_type_description: Option<String>,

    #[validate(length(min = 1))]
    pub matrix_description: Option<String>,

    #[validate(range(min = 0))]
    pub data_points: Option<i32>,

    #[validate(custom(function = "crate::domain::validate::decimal_14_2"))]
    pub min_cost: Option<Decimal>,

    #[validate(custom(function = "crate::domain::validate::decimal_14_2"))]
    pub max_cost: Option<Decimal>,

    #[validate(custom(function = "crate::domain::validate::decimal_5_2"))]
    pub complexity_factor_base: Option<Decimal>,

    #[validate(custom(function = "crate::domain::validate::decimal_5_2"))]
    pub quality_factor_base: Option<Decimal>,

    #[validate(custom(function = "crate::domain::validate::decimal_5_2"))]
    pub condition_factor_base: Option<Decimal>,

    pub county: Option<String>,
    pub state: Option<String>,
    pub is_active: Option<bool>,
}

/// New material type catalog entry
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewMaterialType {
    #[validate(length(min = 1, max = 128))]
    pub name: String,

    #[validate(length(min = 1, max = 32))]
    pub code: String,

    pub description: Option<String>,

    #[validate(length(min = 1, max = 32))]
    pub unit: String,
}

/// New per-material cost for a (buildingType, region) pair
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewMaterialCost {
    pub material_type_id: i64,

    #[validate(length(min = 1, max = 64))]
    pub building_type: String,

    #[validate(length(min = 1, max = 64))]
    pub region: String,

    #[validate(
        custom(function = "crate::domain::validate::decimal_10_2"),
        custom(function = "crate::domain::validate::non_negative")
    )]
    pub cost_per_unit: Decimal,

    #[validate(custom(function = "crate::domain::validate::percentage"))]
    pub default_percentage: Decimal,
}

/// New saved estimate
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewBuildingCost {
    #[validate(length(min = 1, max = 128))]
    pub name: String,

    #[validate(length(min = 1, max = 64))]
    pub region: String,

    #[validate(length(min = 1, max = 64))]
    pub building_type: String,

    #[validate(range(min = 1))]
    pub square_footage: i32,

    #[validate(
        custom(function = "crate::domain::validate::decimal_10_2"),
        custom(function = "crate::domain::validate::non_negative")
    )]
    pub cost_per_sqft: Decimal,

    #[validate(
        custom(function = "crate::domain::validate::decimal_14_2"),
        custom(function = "crate::domain::validate::non_negative")
    )]
    pub total_cost: Decimal,
}

/// Material line item of a saved estimate. The owning estimate id is supplied
/// by the repository, never by the caller.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewBuildingCostMaterial {
    pub material_type_id: i64,

    #[validate(
        custom(function = "crate::domain::validate::decimal_10_2"),
        custom(function = "crate::domain::validate::non_negative")
    )]
    pub quantity: Decimal,

    #[validate(
        custom(function = "crate::domain::validate::decimal_10_2"),
        custom(function = "crate::domain::validate::non_negative")
    )]
    pub cost_per_unit: Decimal,

    #[validate(custom(function = "crate::domain::validate::percentage"))]
    pub percentage: Decimal,

    #[validate(
        custom(function = "crate::domain::validate::decimal_14_2"),
        custom(function = "crate::domain::validate::non_negative")
    )]
    pub total_cost: Decimal,
}

/// New named weighting preset
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewCostFactorPreset {
    #[validate(length(min = 1, max = 128))]
    pub name: String,

    pub description: Option<String>,

    pub user_id: i64,

    pub weights: serde_json::Value,

    #[serde(default)]
    pub is_default: bool,
}

/// Cached third-party price entry; last write wins per
/// (materialCode, source, region)
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewPriceCacheEntry {
    #[validate(length(min = 1, max = 32))]
    pub material_code: String,

    #[validate(length(min = 1, max = 64))]
    pub source: String,

    #[validate(length(min = 1, max = 64))]
    pub region: String,

    #[validate(
        custom(function = "crate::domain::validate::decimal_10_2"),
        custom(function = "crate::domain::validate::non_negative")
    )]
    pub price: Decimal,

    #[validate(length(min = 1, max = 32))]
    pub unit: String,

    #[validate(range(min = 1))]
    pub valid_until: i64,

    pub metadata: Option<serde_json::Value>,
}

//! Cost-data row types: factors, matrices, materials, estimates, price cache

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Cost factor row: baseline multipliers per (region, buildingType)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostFactorRow {
    pub id: i64,
    pub region: String,
    pub building_type: String,
    pub base_cost: Decimal,
    pub complexity_factor: Decimal,
    pub region_factor: Decimal,
    pub created_at: i64,
}

/// Cost matrix row: authoritative per-region/type baseline for a matrix year
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostMatrixRow {
    pub id: i64,
    pub region: String,
    pub building_type: String,
    pub building_type_description: String,
    pub base_cost: Decimal,
    pub matrix_year: i32,
    pub source_matrix_id: i64,
    pub matrix_description: String,
    pub data_points: i32,
    pub min_cost: Option<Decimal>,
    pub max_cost: Option<Decimal>,
    pub complexity_factor_base: Decimal,
    pub quality_factor_base: Decimal,
    pub condition_factor_base: Decimal,
    pub county: Option<String>,
    pub state: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Filter for cost matrix listings; `None` fields are not constrained
#[derive(Debug, Clone, Default)]
pub struct CostMatrixFilter {
    pub region: Option<String>,
    pub building_type: Option<String>,
    pub matrix_year: Option<i32>,
    pub county: Option<String>,
    pub state: Option<String>,
    pub is_active: Option<bool>,
}

/// Material type row (catalog of material kinds)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialTypeRow {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub unit: String,
    pub created_at: i64,
}

/// Material cost row: per-material cost by (buildingType, region)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialCostRow {
    pub id: i64,
    pub material_type_id: i64,
    pub building_type: String,
    pub region: String,
    pub cost_per_unit: Decimal,
    pub default_percentage: Decimal,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Which region satisfied a material-cost lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionMatch {
    /// The requested region had a row
    Exact,
    /// The configured fallback region satisfied the lookup
    Fallback,
}

/// A resolved material cost with the region that satisfied it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedMaterialCost {
    pub cost: MaterialCostRow,
    pub region_match: RegionMatch,
}

/// Saved estimate row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingCostRow {
    pub id: i64,
    pub name: String,
    pub region: String,
    pub building_type: String,
    pub square_footage: i32,
    pub cost_per_sqft: Decimal,
    pub total_cost: Decimal,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Material line item of a saved estimate
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingCostMaterialRow {
    pub id: i64,
    pub building_cost_id: i64,
    pub material_type_id: i64,
    pub quantity: Decimal,
    pub cost_per_unit: Decimal,
    pub percentage: Decimal,
    pub total_cost: Decimal,
    pub created_at: i64,
}

/// Named weighting preset for the cost factors a user applies
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostFactorPresetRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub user_id: i64,
    pub weights: serde_json::Value,
    pub is_default: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Cached third-party material price, stale after `valid_until`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceCacheRow {
    pub id: i64,
    pub material_code: String,
    pub source: String,
    pub region: String,
    pub price: Decimal,
    pub unit: String,
    pub fetched_at: i64,
    pub valid_until: i64,
    pub metadata: Option<serde_json::Value>,
}

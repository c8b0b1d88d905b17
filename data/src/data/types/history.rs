//! Calculation history row type

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Immutable snapshot of one estimate computation.
///
/// Every factor that contributed to `adjusted_cost` is stored with the row so
/// a past estimate can be explained without recomputing against cost-matrix
/// rows that may have changed since.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationHistoryRow {
    pub id: i64,
    pub user_id: i64,
    pub name: Option<String>,
    pub region: String,
    pub building_type: String,
    pub square_footage: i32,
    pub base_cost: Decimal,
    pub region_factor: Decimal,
    pub complexity: String,
    pub complexity_factor: Decimal,
    pub quality: Option<String>,
    pub quality_factor: Option<Decimal>,
    pub condition: Option<String>,
    pub condition_factor: Option<Decimal>,
    pub cost_per_sqft: Decimal,
    pub total_cost: Decimal,
    pub adjusted_cost: Decimal,
    pub assessed_value: Option<Decimal>,
    pub created_at: i64,
}

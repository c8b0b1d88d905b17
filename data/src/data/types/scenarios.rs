//! What-if scenario row types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A hypothetical re-evaluation of a prior calculation with overridden
/// parameters, tracked against the original for impact comparison
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhatIfScenarioRow {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub base_calculation_id: Option<i64>,
    pub parameters: serde_json::Value,
    pub results: serde_json::Value,
    pub is_saved: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// One tracked parameter change within a scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioVariationRow {
    pub id: i64,
    pub scenario_id: i64,
    pub name: String,
    pub parameter_key: String,
    pub original_value: serde_json::Value,
    pub new_value: serde_json::Value,
    pub impact_value: Option<Decimal>,
    pub impact_percentage: Option<Decimal>,
    pub created_at: i64,
}

/// Aggregated impact analysis over a scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioImpactRow {
    pub id: i64,
    pub scenario_id: i64,
    pub analysis_type: String,
    pub impact_summary: serde_json::Value,
    pub calculated_at: i64,
}

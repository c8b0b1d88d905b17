//! What-if scenario payloads

use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use super::empty_json_object;

/// New what-if scenario
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewWhatIfScenario {
    pub user_id: i64,

    #[validate(length(min = 1, max = 128))]
    pub name: String,

    pub description: Option<String>,

    pub base_calculation_id: Option<i64>,

    pub parameters: serde_json::Value,

    #[serde(default = "empty_json_object")]
    pub results: serde_json::Value,

    #[serde(default)]
    pub is_saved: bool,
}

/// Partial scenario update; `None` fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WhatIfScenarioUpdate {
    #[validate(length(min = 1, max = 128))]
    pub name: Option<String>,

    pub description: Option<String>,
    pub parameters: Option<serde_json::Value>,
    pub results: Option<serde_json::Value>,
    pub is_saved: Option<bool>,
}

/// One tracked parameter change. The owning scenario id is supplied by the
/// repository.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewScenarioVariation {
    #[validate(length(min = 1, max = 128))]
    pub name: String,

    #[validate(length(min = 1, max = 64))]
    pub parameter_key: String,

    pub original_value: serde_json::Value,

    pub new_value: serde_json::Value,

    #[validate(custom(function = "crate::domain::validate::decimal_14_2"))]
    pub impact_value: Option<Decimal>,

    #[validate(custom(function = "crate::domain::validate::decimal_5_2"))]
    pub impact_percentage: Option<Decimal>,
}

/// Aggregated impact analysis over a scenario
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewScenarioImpact {
    #[validate(length(min = 1, max = 64))]
    pub analysis_type: String,

    pub impact_summary: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validate::parse_payload;
    use serde_json::json;

    #[test]
    fn test_results_default_to_empty_object() {
        let scenario: NewWhatIfScenario = parse_payload(json!({
            "userId": 3,
            "name": "Higher quality grade",
            "parameters": {"quality": "premium"}
        }))
        .unwrap();
        assert_eq!(scenario.results, json!({}));
        assert!(!scenario.is_saved);
    }

    #[test]
    fn test_variation_impact_bounds() {
        let err = parse_payload::<NewScenarioVariation>(json!({
            "name": "Quality bump",
            "parameterKey": "quality",
            "originalValue": "standard",
            "newValue": "premium",
            "impactPercentage": "1234.50"
        }))
        .unwrap_err();
        assert!(err.field_errors().is_some());
    }
}

//! Calculation history payload

use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

/// One estimate computation to record. Every contributing factor is included
/// so the stored row explains itself without reference to live cost data.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewCalculation {
    pub user_id: i64,

    #[validate(length(min = 1, max = 128))]
    pub name: Option<String>,

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
    pub base_cost: Decimal,

    #[validate(
        custom(function = "crate::domain::validate::decimal_5_2"),
        custom(function = "crate::domain::validate::non_negative")
    )]
    pub region_factor: Decimal,

    #[validate(length(min = 1, max = 32))]
    pub complexity: String,

    #[validate(
        custom(function = "crate::domain::validate::decimal_5_2"),
        custom(function = "crate::domain::validate::non_negative")
    )]
    pub complexity_factor: Decimal,

    #[validate(length(min = 1, max = 32))]
    pub quality: Option<String>,

    #[validate(custom(function = "crate::domain::validate::decimal_5_2"))]
    pub quality_factor: Option<Decimal>,

    #[validate(length(min = 1, max = 32))]
    pub condition: Option<String>,

    #[validate(custom(function = "crate::domain::validate::decimal_5_2"))]
    pub condition_factor: Option<Decimal>,

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

    #[validate(
        custom(function = "crate::domain::validate::decimal_14_2"),
        custom(function = "crate::domain::validate::non_negative")
    )]
    pub adjusted_cost: Decimal,

    #[validate(custom(function = "crate::domain::validate::decimal_14_2"))]
    pub assessed_value: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validate::parse_payload;
    use serde_json::json;

    fn base_payload() -> serde_json::Value {
        json!({
            "userId": 1,
            "region": "Benton",
            "buildingType": "RES",
            "squareFootage": 2400,
            "baseCost": "145.50",
            "regionFactor": "1.05",
            "complexity": "standard",
            "complexityFactor": "1.00",
            "costPerSqft": "152.78",
            "totalCost": "366672.00",
            "adjustedCost": "366672.00"
        })
    }

    #[test]
    fn test_minimal_calculation_parses() {
        let calc: NewCalculation = parse_payload(base_payload()).unwrap();
        assert!(calc.quality.is_none());
        assert!(calc.assessed_value.is_none());
    }

    #[test]
    fn test_optional_factor_still_validated() {
        let mut payload = base_payload();
        payload["qualityFactor"] = json!("1234.5");
        let err = parse_payload::<NewCalculation>(payload).unwrap_err();
        assert!(err.field_errors().is_some());
    }
}

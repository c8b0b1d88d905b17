//! Payload validation plumbing
//!
//! Every insertable payload derives `Validate`; the custom validators here
//! enforce the constraints the schema cannot express in types: decimal
//! (precision, scale) bounds, closed string sets, and time-of-day format.
//! `parse_payload` is the single entry point: it either returns a normalized,
//! fully-typed record or fails with a field-indexed error listing every
//! violated constraint.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use thiserror::Error;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::core::constants::{
    CONNECTION_STATUSES, LINK_ACCESS_LEVELS, PROJECT_ROLES, PROJECT_STATUSES, SYNC_FREQUENCIES,
    UPLOAD_STATUSES, USER_ROLES,
};
use crate::utils::decimal::fits;

/// Failure to turn a candidate payload into a typed record
#[derive(Debug, Error)]
pub enum PayloadError {
    /// The payload does not have the right shape: unknown field, missing
    /// required field, or a value of the wrong type
    #[error("Malformed payload: {0}")]
    Shape(#[from] serde_json::Error),

    /// The payload parsed but violates field constraints; carries every
    /// offending field, not just the first
    #[error("Validation failed: {}", format_validation_errors(.0))]
    Invalid(ValidationErrors),
}

impl PayloadError {
    /// Field-indexed constraint violations, when this is a validation failure
    pub fn field_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Shape(_) => None,
            Self::Invalid(errors) => Some(errors),
        }
    }
}

/// Validate a candidate JSON payload into a typed record.
///
/// No side effects: either the full normalized record comes back or an error
/// describing what to correct.
pub fn parse_payload<T>(value: serde_json::Value) -> Result<T, PayloadError>
where
    T: DeserializeOwned + Validate,
{
    let parsed: T = serde_json::from_value(value)?;
    parsed.validate().map_err(PayloadError::Invalid)?;
    Ok(parsed)
}

/// Flatten field errors into a single human-readable string
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| format!("{}: {}", field, m))
                    .unwrap_or_else(|| format!("{}: validation failed", field))
            })
        })
        .collect();
    parts.sort();
    parts.join("; ")
}

fn constraint_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

// =============================================================================
// Decimal (precision, scale) validators — pairs from the schema are the wire
// contract and must hold bit-for-bit
// =============================================================================

/// decimal(10, 2): unit costs, per-sqft costs, prices
pub fn decimal_10_2(value: &Decimal) -> Result<(), ValidationError> {
    if fits(value, 10, 2) {
        Ok(())
    } else {
        Err(constraint_error(
            "decimal_out_of_range",
            "must fit decimal(10,2)",
        ))
    }
}

/// decimal(14, 2): totals, adjusted costs, matrix cell values
pub fn decimal_14_2(value: &Decimal) -> Result<(), ValidationError> {
    if fits(value, 14, 2) {
        Ok(())
    } else {
        Err(constraint_error(
            "decimal_out_of_range",
            "must fit decimal(14,2)",
        ))
    }
}

/// decimal(5, 2): factors and percentages
pub fn decimal_5_2(value: &Decimal) -> Result<(), ValidationError> {
    if fits(value, 5, 2) {
        Ok(())
    } else {
        Err(constraint_error(
            "decimal_out_of_range",
            "must fit decimal(5,2)",
        ))
    }
}

/// Non-negative decimal (costs and quantities cannot go below zero)
pub fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() {
        Err(constraint_error("negative", "must not be negative"))
    } else {
        Ok(())
    }
}

/// Percentage in 0..=100 with decimal(5,2) bounds
pub fn percentage(value: &Decimal) -> Result<(), ValidationError> {
    if !fits(value, 5, 2) {
        return Err(constraint_error(
            "decimal_out_of_range",
            "must fit decimal(5,2)",
        ));
    }
    if value.is_sign_negative() || *value > Decimal::from(100) {
        return Err(constraint_error(
            "percentage_out_of_range",
            "must be between 0 and 100",
        ));
    }
    Ok(())
}

// =============================================================================
// Closed string sets
// =============================================================================

fn one_of(
    value: &str,
    allowed: &[&str],
    code: &'static str,
    message: &'static str,
) -> Result<(), ValidationError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(constraint_error(code, message))
    }
}

pub fn valid_user_role(value: &str) -> Result<(), ValidationError> {
    one_of(value, &USER_ROLES, "invalid_role", "must be user or admin")
}

pub fn valid_project_role(value: &str) -> Result<(), ValidationError> {
    one_of(
        value,
        &PROJECT_ROLES,
        "invalid_role",
        "must be viewer, editor, or admin",
    )
}

pub fn valid_project_status(value: &str) -> Result<(), ValidationError> {
    one_of(
        value,
        &PROJECT_STATUSES,
        "invalid_status",
        "must be active or archived",
    )
}

pub fn valid_link_access(value: &str) -> Result<(), ValidationError> {
    one_of(
        value,
        &LINK_ACCESS_LEVELS,
        "invalid_access_level",
        "must be view, edit, or admin",
    )
}

pub fn valid_sync_frequency(value: &str) -> Result<(), ValidationError> {
    one_of(
        value,
        &SYNC_FREQUENCIES,
        "invalid_frequency",
        "must be hourly, daily, weekly, monthly, or manual",
    )
}

pub fn valid_connection_status(value: &str) -> Result<(), ValidationError> {
    one_of(
        value,
        &CONNECTION_STATUSES,
        "invalid_status",
        "must be connected, disconnected, error, or unknown",
    )
}

pub fn valid_upload_status(value: &str) -> Result<(), ValidationError> {
    one_of(
        value,
        &UPLOAD_STATUSES,
        "invalid_status",
        "must be pending, processing, completed, or failed",
    )
}

pub fn valid_target_kind(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<crate::domain::target::TargetKind>()
        .map(|_| ())
        .map_err(|_| {
            constraint_error(
                "invalid_target_type",
                "must be calculation, cost_matrix, scenario, or report",
            )
        })
}

// =============================================================================
// Formats
// =============================================================================

static TIME_OF_DAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$").expect("valid regex"));

/// HH:MM, 24-hour clock (sync schedule time-of-day)
pub fn valid_time_of_day(value: &str) -> Result<(), ValidationError> {
    if TIME_OF_DAY.is_match(value) {
        Ok(())
    } else {
        Err(constraint_error("invalid_time", "must be HH:MM (24-hour)"))
    }
}

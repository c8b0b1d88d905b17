//! Insertable payload types
//!
//! One `New*` struct per insertable entity. Each derives `Deserialize` with
//! `deny_unknown_fields` (extra fields are shape errors, not silently
//! dropped) and `Validate` with the field constraints from
//! [`crate::domain::validate`]. Server-assigned columns (ids, timestamps,
//! caller identity, generated tokens) never appear here.

pub mod collaboration;
pub mod costs;
pub mod history;
pub mod matrices;
pub mod scenarios;
pub mod sync;
pub mod users;

use rust_decimal::Decimal;

pub(crate) fn default_true() -> bool {
    true
}

pub(crate) fn decimal_one() -> Decimal {
    Decimal::ONE
}

pub(crate) fn empty_json_object() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

//! Polymorphic target resolution
//!
//! Comments and project items reference other records by a (type, id) pair
//! instead of a foreign key. [`TargetKind`] is the closed set of types those
//! references may use, and [`TargetKind::exists`] is the application-level
//! referential check run before a reference is stored.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::data::sqlite::error::SqliteError;

/// Record types a comment or project item can point at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    Calculation,
    CostMatrix,
    Scenario,
    /// Reports are produced outside this crate and have no backing table;
    /// references to them are stored without an existence check.
    Report,
}

impl TargetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Calculation => "calculation",
            Self::CostMatrix => "cost_matrix",
            Self::Scenario => "scenario",
            Self::Report => "report",
        }
    }

    /// Check that `target_id` refers to a live row of this kind.
    ///
    /// `Report` always passes; its rows live in an external system.
    pub async fn exists(&self, pool: &SqlitePool, target_id: i64) -> Result<bool, SqliteError> {
        let query = match self {
            Self::Calculation => "SELECT 1 FROM calculation_history WHERE id = ?",
            Self::CostMatrix => "SELECT 1 FROM cost_matrix WHERE id = ?",
            Self::Scenario => "SELECT 1 FROM what_if_scenarios WHERE id = ?",
            Self::Report => return Ok(true),
        };

        let row: Option<(i64,)> = sqlx::query_as(query)
            .bind(target_id)
            .fetch_optional(pool)
            .await?;

        Ok(row.is_some())
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a target type string outside the closed set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown target type: {0}")]
pub struct UnknownTargetKind(pub String);

impl FromStr for TargetKind {
    type Err = UnknownTargetKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "calculation" => Ok(Self::Calculation),
            "cost_matrix" => Ok(Self::CostMatrix),
            "scenario" => Ok(Self::Scenario),
            "report" => Ok(Self::Report),
            other => Err(UnknownTargetKind(other.to_string())),
        }
    }
}

//! Matrix cell lookup strategies
//!
//! A matrix marked interpolating (`b_interpolate`) resolves lookups between
//! declared axis values through a [`CellLookupStrategy`]. Strategies are
//! registered per matrix type; unregistered types use [`NearestMatch`].

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::data::types::matrices::BentonMatrixDetailRow;

/// Resolves a cell value from the declared cells of one matrix/year when no
/// cell matches the requested axis pair exactly.
///
/// Implementations receive every cell of the matrix for the requested year and
/// may use any of them. Returning `None` means the lookup falls through to the
/// matrix default cell value.
pub trait CellLookupStrategy: Send + Sync {
    fn resolve(
        &self,
        cells: &[BentonMatrixDetailRow],
        axis_1_value: &str,
        axis_2_value: &str,
    ) -> Option<Decimal>;
}

/// Default strategy: treat axis values as numbers where possible and pick the
/// cell whose axis pair is nearest the request, preferring exact matches per
/// axis. Ties resolve to the first cell in iteration order, which repository
/// reads keep sorted by axis values. Non-numeric axis values only match
/// exactly; cells that cannot be compared to the request are skipped.
#[derive(Debug, Default)]
pub struct NearestMatch;

impl NearestMatch {
    fn axis_distance(declared: &str, requested: &str) -> Option<Decimal> {
        if declared == requested {
            return Some(Decimal::ZERO);
        }
        let declared: Decimal = declared.trim().parse().ok()?;
        let requested: Decimal = requested.trim().parse().ok()?;
        Some((declared - requested).abs())
    }
}

impl CellLookupStrategy for NearestMatch {
    fn resolve(
        &self,
        cells: &[BentonMatrixDetailRow],
        axis_1_value: &str,
        axis_2_value: &str,
    ) -> Option<Decimal> {
        let mut best: Option<(Decimal, &BentonMatrixDetailRow)> = None;

        for cell in cells {
            let Some(d1) = Self::axis_distance(&cell.axis_1_value, axis_1_value) else {
                continue;
            };
            let Some(d2) = Self::axis_distance(&cell.axis_2_value, axis_2_value) else {
                continue;
            };
            let distance = d1 + d2;

            if best.as_ref().is_none_or(|(b, _)| distance < *b) {
                best = Some((distance, cell));
            }
        }

        best.map(|(_, cell)| cell.cell_value)
    }
}

/// Strategy registry keyed by matrix type
pub struct StrategyRegistry {
    strategies: HashMap<String, Box<dyn CellLookupStrategy>>,
    default: Box<dyn CellLookupStrategy>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self {
            strategies: HashMap::new(),
            default: Box::new(NearestMatch),
        }
    }

    pub fn register(
        &mut self,
        matrix_type: impl Into<String>,
        strategy: Box<dyn CellLookupStrategy>,
    ) {
        self.strategies.insert(matrix_type.into(), strategy);
    }

    pub fn for_matrix_type(&self, matrix_type: &str) -> &dyn CellLookupStrategy {
        self.strategies
            .get(matrix_type)
            .map(|s| s.as_ref())
            .unwrap_or(self.default.as_ref())
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(axis_1: &str, axis_2: &str, value: &str) -> BentonMatrixDetailRow {
        BentonMatrixDetailRow {
            id: 0,
            matrix_id: 1,
            matrix_year: 2025,
            axis_1_value: axis_1.to_string(),
            axis_2_value: axis_2.to_string(),
            cell_value: value.parse().unwrap(),
            created_at: 0,
        }
    }

    #[test]
    fn test_exact_match_wins() {
        let cells = vec![cell("10", "A", "1.00"), cell("20", "A", "2.00")];
        let got = NearestMatch.resolve(&cells, "20", "A");
        assert_eq!(got, Some("2.00".parse().unwrap()));
    }

    #[test]
    fn test_nearest_numeric() {
        let cells = vec![
            cell("1000", "1", "50.00"),
            cell("2000", "1", "45.00"),
            cell("3000", "1", "40.00"),
        ];
        let got = NearestMatch.resolve(&cells, "2200", "1");
        assert_eq!(got, Some("45.00".parse().unwrap()));
    }

    #[test]
    fn test_tie_prefers_lower_axis_value() {
        let cells = vec![cell("1000", "1", "50.00"), cell("2000", "1", "45.00")];
        let got = NearestMatch.resolve(&cells, "1500", "1");
        assert_eq!(got, Some("50.00".parse().unwrap()));
    }

    #[test]
    fn test_non_numeric_requires_exact() {
        let cells = vec![cell("RES", "good", "1.10")];
        assert!(NearestMatch.resolve(&cells, "COM", "good").is_none());
        assert_eq!(
            NearestMatch.resolve(&cells, "RES", "good"),
            Some("1.10".parse().unwrap())
        );
    }

    #[test]
    fn test_registry_falls_back_to_default() {
        let registry = StrategyRegistry::new();
        let cells = vec![cell("10", "10", "5.00")];
        let got = registry
            .for_matrix_type("IMPRV")
            .resolve(&cells, "10", "10");
        assert_eq!(got, Some("5.00".parse().unwrap()));
    }
}

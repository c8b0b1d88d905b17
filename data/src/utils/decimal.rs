//! Fixed-precision decimal helpers
//!
//! Monetary and factor columns carry declared (precision, scale) pairs from
//! the schema. SQLite stores them as TEXT; these helpers keep the declared
//! bounds honest on the way in and parse them back on the way out.

use rust_decimal::Decimal;

/// Check that a decimal fits a declared (precision, scale) pair: at most
/// `scale` fractional digits and at most `precision - scale` integer digits.
pub fn fits(value: &Decimal, precision: u32, scale: u32) -> bool {
    if value.scale() > scale {
        return false;
    }
    let int_digits = precision - scale;
    let limit = Decimal::from(10_i64.pow(int_digits));
    value.abs() < limit
}

/// Parse a decimal string exactly (no float round-trip)
pub fn parse_exact(raw: &str) -> Option<Decimal> {
    Decimal::from_str_exact(raw.trim()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_exact(s).unwrap()
    }

    #[test]
    fn test_fits_within_bounds() {
        assert!(fits(&d("150.00"), 10, 2));
        assert!(fits(&d("99999999.99"), 10, 2));
        assert!(fits(&d("1.0"), 5, 2));
        assert!(fits(&d("-42.5"), 10, 2));
    }

    #[test]
    fn test_fits_rejects_excess_scale() {
        assert!(!fits(&d("1.123"), 10, 2));
    }

    #[test]
    fn test_fits_rejects_excess_precision() {
        assert!(!fits(&d("100000000.00"), 10, 2));
        assert!(!fits(&d("1000.00"), 5, 2));
    }

    #[test]
    fn test_parse_exact() {
        assert_eq!(parse_exact("150.00"), Some(d("150.00")));
        assert_eq!(parse_exact(" 1.5 "), Some(d("1.5")));
        assert_eq!(parse_exact("not a number"), None);
    }
}

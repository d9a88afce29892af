//! Money calculation utilities using rust_decimal for precision
//!
//! Amounts are stored and serialized as `f64`; every calculation converts to
//! `Decimal` first and rounds back to 2 decimal places (half-up).

use rust_decimal::prelude::*;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Round to 2 decimal places
#[inline]
pub fn round(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    round(value).to_f64().unwrap_or_default()
}

/// Round an f64 amount to cents
pub fn round_f64(value: f64) -> f64 {
    to_f64(to_decimal(value))
}

/// price × quantity, `None` on overflow
pub fn line_subtotal(price: f64, quantity: i64) -> Option<Decimal> {
    to_decimal(price).checked_mul(Decimal::from(quantity)).map(round)
}

/// Sum of amounts
pub fn sum<I: IntoIterator<Item = f64>>(values: I) -> Decimal {
    values.into_iter().map(to_decimal).sum()
}

/// Check if payment is sufficient (paid >= required - tolerance)
pub fn is_payment_sufficient(paid: f64, required: f64) -> bool {
    to_decimal(paid) >= to_decimal(required) - MONEY_TOLERANCE
}

/// Compare two monetary values for equality (within 0.01 tolerance)
pub fn money_eq(a: f64, b: f64) -> bool {
    (to_decimal(a) - to_decimal(b)).abs() < MONEY_TOLERANCE
}

/// `a > b` beyond the comparison tolerance
pub fn exceeds(a: f64, b: f64) -> bool {
    to_decimal(a) - to_decimal(b) >= MONEY_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_decimal_precision() {
        // 0.1 + 0.2 != 0.3 in f64
        assert_ne!(0.1_f64 + 0.2_f64, 0.3);
        assert_eq!(to_f64(to_decimal(0.1) + to_decimal(0.2)), 0.3);
    }

    #[test]
    fn test_accumulation_precision() {
        assert_eq!(to_f64(sum((0..1000).map(|_| 0.01))), 10.0);
    }

    #[test]
    fn test_half_up_rounding() {
        assert_eq!(round_f64(2.345), 2.35);
        assert_eq!(round_f64(2.344), 2.34);
        assert_eq!(line_subtotal(19.99, 3).map(to_f64), Some(59.97));
    }

    #[test]
    fn test_line_subtotal_overflow() {
        assert_eq!(line_subtotal(7e28, 2), None);
        assert_eq!(line_subtotal(1_000_000.0, 9_999).map(to_f64), Some(9_999_000_000.0));
    }

    #[test]
    fn test_comparisons() {
        assert!(money_eq(10.0, 10.004));
        assert!(!money_eq(10.0, 10.02));
        assert!(is_payment_sufficient(9.995, 10.0));
        assert!(!is_payment_sufficient(9.9, 10.0));
        assert!(exceeds(10.02, 10.0));
        assert!(!exceeds(10.001, 10.0));
    }

    #[test]
    fn test_non_finite_is_zero() {
        assert_eq!(to_decimal(f64::NAN), Decimal::ZERO);
        assert_eq!(to_decimal(f64::INFINITY), Decimal::ZERO);
    }
}

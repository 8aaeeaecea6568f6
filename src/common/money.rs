// src/common/money.rs
//! Conversion between JSON decimal amounts and integer cents.
//!
//! All monetary arithmetic in this crate happens on `i64` cents. Floats only
//! exist at the JSON boundary, where amounts are 2-decimal numbers. Keeping
//! the interior integral avoids accumulation drift across many small
//! expenses.

use serde::Serializer;
use thiserror::Error;

/// Largest representable amount: 10^15 cents, far beyond any group tab.
const MAX_CENTS: i64 = 1_000_000_000_000_000;

#[derive(Debug, Error)]
pub enum MoneyError {
    #[error("amount must be a finite number")]
    NotFinite,
    #[error("amount is out of range")]
    OutOfRange,
}

/// Convert a JSON decimal amount to cents, rounding half away from zero at
/// the second decimal place.
pub fn amount_to_cents(amount: f64) -> Result<i64, MoneyError> {
    if !amount.is_finite() {
        return Err(MoneyError::NotFinite);
    }
    let cents = (amount * 100.0).round();
    if cents.abs() > MAX_CENTS as f64 {
        return Err(MoneyError::OutOfRange);
    }
    Ok(cents as i64)
}

/// Convert cents back to a JSON decimal amount.
pub fn cents_to_amount(cents: i64) -> f64 {
    cents as f64 / 100.0
}

/// Serde helper for serializing a cents field as a decimal amount.
pub fn serialize_cents<S>(cents: &i64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_f64(cents_to_amount(*cents))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_whole_cents() {
        assert_eq!(amount_to_cents(90.00).unwrap(), 9000);
        assert_eq!(amount_to_cents(33.33).unwrap(), 3333);
        assert_eq!(amount_to_cents(0.01).unwrap(), 1);
        assert_eq!(cents_to_amount(3334), 33.34);
    }

    #[test]
    fn test_rounding_at_boundary() {
        // 19.995 is not representable exactly; value must land on a cent
        let cents = amount_to_cents(19.995).unwrap();
        assert!(cents == 1999 || cents == 2000);
        assert_eq!(amount_to_cents(10.004).unwrap(), 1000);
        assert_eq!(amount_to_cents(10.006).unwrap(), 1001);
    }

    #[test]
    fn test_rejects_non_finite() {
        assert!(amount_to_cents(f64::NAN).is_err());
        assert!(amount_to_cents(f64::INFINITY).is_err());
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(amount_to_cents(1e20).is_err());
    }
}

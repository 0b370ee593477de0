//! # Money Conversion
//!
//! Decimal prices arrive from clients as JSON numbers; the payment provider
//! wants integer minor units. The conversion truncates (`19.99` -> `1999`)
//! and rejects anything that would produce a nonsensical charge.

use crate::error::{ShelfError, ShelfResult};

/// Largest charge we will forward to the provider, in minor units.
/// Stripe caps amounts at 8 digits for most currencies.
pub const MAX_CHARGE_MINOR: i64 = 99_999_999;

/// Convert a decimal price to integer minor units (price x 100, truncated).
///
/// Rejects non-finite, zero, negative, sub-minor-unit, and oversized prices
/// with a `Validation` error so a bad price never reaches the provider.
pub fn minor_units(price: f64) -> ShelfResult<i64> {
    if !price.is_finite() {
        return Err(ShelfError::Validation(format!(
            "price must be a finite number, got {price}"
        )));
    }
    if price <= 0.0 {
        return Err(ShelfError::Validation(format!(
            "price must be positive, got {price}"
        )));
    }

    // The f64 product can land a hair under the decimal value
    // (19.99 * 100.0 == 1998.999...); nudge up before truncating. The nudge
    // is far below half a minor unit, so a genuine fractional remainder
    // still truncates (10.999 stays 1099).
    let amount = (price * 100.0 + 1e-6).trunc();
    if amount < 1.0 {
        return Err(ShelfError::Validation(format!(
            "price {price} is below one minor unit"
        )));
    }
    if amount > MAX_CHARGE_MINOR as f64 {
        return Err(ShelfError::Validation(format!(
            "price {price} exceeds the maximum chargeable amount"
        )));
    }

    Ok(amount as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_and_fractional_prices() {
        assert_eq!(minor_units(19.99).unwrap(), 1999);
        assert_eq!(minor_units(10.0).unwrap(), 1000);
        assert_eq!(minor_units(0.5).unwrap(), 50);
    }

    #[test]
    fn test_prices_whose_float_product_falls_short() {
        // each of these has price * 100.0 just under the decimal value
        assert_eq!(minor_units(19.99).unwrap(), 1999);
        assert_eq!(minor_units(0.29).unwrap(), 29);
        assert_eq!(minor_units(1.15).unwrap(), 115);
        assert_eq!(minor_units(2.99).unwrap(), 299);
    }

    #[test]
    fn test_truncation_not_rounding() {
        assert_eq!(minor_units(10.999).unwrap(), 1099);
    }

    #[test]
    fn test_rejects_zero_and_negative() {
        assert!(minor_units(0.0).is_err());
        assert!(minor_units(-5.0).is_err());
    }

    #[test]
    fn test_rejects_non_finite() {
        assert!(minor_units(f64::NAN).is_err());
        assert!(minor_units(f64::INFINITY).is_err());
        assert!(minor_units(f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_rejects_sub_minor_unit_and_oversized() {
        assert!(minor_units(0.001).is_err());
        assert!(minor_units(1.0e12).is_err());
    }
}

//! Exact money arithmetic on two-decimal amounts.
//!
//! All amounts cross the wire and the database as decimal strings and live in
//! memory as `rust_decimal::Decimal`. Binary floating point never touches a
//! balance; equality checks go through integer minor units.

use num_traits::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

use crate::constants::MONEY_SCALE;
use crate::errors::{Error, Result, ValidationError};

/// Largest magnitude any single amount may carry: one trillion. Keeps every
/// validated amount safely inside i64 minor units.
fn max_amount() -> Decimal {
    Decimal::new(100_000_000_000_000, MONEY_SCALE)
}

/// Parses a wire amount into an exact two-decimal value.
///
/// Rejects anything that is not a plain decimal, that carries sub-cent
/// precision, or that exceeds the platform magnitude bound. A malformed
/// amount is a client error, reported before any of the allocation rejection
/// reasons apply.
pub fn parse_amount(raw: &str) -> Result<Decimal> {
    let value = Decimal::from_str(raw.trim()).map_err(|_| {
        Error::Validation(ValidationError::InvalidInput(format!(
            "not a decimal amount: '{}'",
            raw
        )))
    })?;
    if value.normalize().scale() > MONEY_SCALE {
        return Err(Error::Validation(ValidationError::InvalidInput(format!(
            "amount '{}' has sub-cent precision",
            raw
        ))));
    }
    if value.abs() > max_amount() {
        return Err(Error::Validation(ValidationError::InvalidInput(format!(
            "amount '{}' is out of range",
            raw
        ))));
    }
    Ok(value)
}

/// Converts a validated two-decimal amount to integer minor units (bani).
pub fn minor_units(value: Decimal) -> i64 {
    let scaled = value * Decimal::ONE_HUNDRED;
    debug_assert!(scaled.fract().is_zero(), "amount has sub-cent precision");
    scaled.trunc().to_i64().unwrap_or(i64::MAX)
}

/// Rounds to two decimals, midpoints away from zero.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Canonical two-decimal string form used in the database and on the wire.
pub fn format_amount(value: Decimal) -> String {
    let mut canonical = round2(value);
    canonical.rescale(MONEY_SCALE);
    canonical.to_string()
}

/// Parses a stored database amount. Stored amounts are written canonically,
/// so a failure indicates corruption; it reads as zero, which can only ever
/// shrink a capacity.
pub fn parse_stored(raw: &str) -> Decimal {
    Decimal::from_str(raw).unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parses_plain_amounts() {
        assert_eq!(parse_amount("50.00").unwrap(), dec!(50.00));
        assert_eq!(parse_amount(" 19.99 ").unwrap(), dec!(19.99));
        assert_eq!(parse_amount("0").unwrap(), Decimal::ZERO);
        assert_eq!(parse_amount("-3.10").unwrap(), dec!(-3.10));
    }

    #[test]
    fn rejects_sub_cent_precision() {
        assert!(parse_amount("10.005").is_err());
        assert!(parse_amount("0.001").is_err());
        // trailing zeros beyond two decimals are still exact
        assert_eq!(parse_amount("10.0000").unwrap(), dec!(10));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_amount("ten").is_err());
        assert!(parse_amount("10,00").is_err());
        assert!(parse_amount("").is_err());
    }

    #[test]
    fn rejects_out_of_range_magnitudes() {
        assert!(parse_amount("10000000000000.00").is_err());
        assert!(parse_amount("999999999999.99").is_ok());
    }

    #[test]
    fn minor_units_are_exact() {
        assert_eq!(minor_units(dec!(50.00)), 5000);
        assert_eq!(minor_units(dec!(19.99)), 1999);
        assert_eq!(minor_units(dec!(0.01)), 1);
        assert_ne!(minor_units(dec!(20.00)), minor_units(dec!(19.99)));
    }

    #[test]
    fn formats_canonically() {
        assert_eq!(format_amount(dec!(50)), "50.00");
        assert_eq!(format_amount(dec!(19.9)), "19.90");
        assert_eq!(format_amount(dec!(10.005)), "10.01");
    }
}

//! Money helpers with fixed-point decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All amounts are `rust_decimal::Decimal` values in a single implicit
//! currency unit; display formatting (and display-only conversion) is a
//! presentation concern outside this workspace.

use rust_decimal::Decimal;
use rust_decimal::prelude::*;

/// Number of decimal places in the currency's minor unit (cents).
pub const MINOR_UNIT_PLACES: u32 = 2;

/// Returns one minor unit (0.01).
#[must_use]
pub fn minor_unit() -> Decimal {
    Decimal::new(1, MINOR_UNIT_PLACES)
}

/// Rounds an amount to minor-unit precision using Banker's Rounding.
#[must_use]
pub fn round_to_minor_units(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MINOR_UNIT_PLACES, RoundingStrategy::MidpointNearestEven)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_minor_unit() {
        assert_eq!(minor_unit(), dec!(0.01));
    }

    #[test]
    fn test_round_exact_amount_unchanged() {
        assert_eq!(round_to_minor_units(dec!(12.34)), dec!(12.34));
        assert_eq!(round_to_minor_units(dec!(0)), dec!(0));
    }

    #[test]
    fn test_round_half_to_even() {
        assert_eq!(round_to_minor_units(dec!(1.005)), dec!(1.00));
        assert_eq!(round_to_minor_units(dec!(1.015)), dec!(1.02));
        assert_eq!(round_to_minor_units(dec!(1.0051)), dec!(1.01));
    }

    #[test]
    fn test_round_negative() {
        assert_eq!(round_to_minor_units(dec!(-33.333)), dec!(-33.33));
    }
}

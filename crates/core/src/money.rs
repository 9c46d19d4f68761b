//! Minor-unit money arithmetic.
//!
//! All currency flows through the engine as integer minor units (cents).
//! Percentage math goes through [`Decimal`] and rounds to whole cents,
//! midpoint away from zero, at each derived output.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use thiserror::Error;

/// An amount in minor units (cents).
pub type Minor = i64;

/// Errors specific to minor-unit arithmetic.
#[derive(Debug, Error)]
pub enum MoneyError {
    /// A percentage or division result overflowed or was not representable.
    #[error("amount conversion overflowed or was not finite")]
    AmountConversion,
}

/// Calculate `percent` of a minor-unit amount, rounded to whole cents.
///
/// # Errors
///
/// Returns [`MoneyError::AmountConversion`] when the multiplication
/// overflows or the result cannot be represented as an `i64`.
pub fn percent_of_minor(percent: Percentage, minor: Minor) -> Result<Minor, MoneyError> {
    let minor = Decimal::from_i64(minor).ok_or(MoneyError::AmountConversion)?;

    (percent * Decimal::ONE) // decimal_percentage doesn't expose the underlying Decimal
        .checked_mul(minor)
        .ok_or(MoneyError::AmountConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(MoneyError::AmountConversion)
}

/// Divide a flat minor-unit amount evenly across `shares`, returning the
/// per-share amount rounded to whole cents. Zero shares yield zero.
///
/// # Errors
///
/// Returns [`MoneyError::AmountConversion`] when the division result cannot
/// be represented as an `i64`.
pub fn split_evenly(total: Minor, shares: usize) -> Result<Minor, MoneyError> {
    if shares == 0 {
        return Ok(0);
    }

    Decimal::from(total)
        .checked_div(Decimal::from(shares as u64))
        .ok_or(MoneyError::AmountConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(MoneyError::AmountConversion)
}

/// Convert a rate expressed in percentage points (0–100) into a
/// [`Percentage`] fraction.
///
/// # Errors
///
/// Returns [`MoneyError::AmountConversion`] when the rate is not
/// representable as a finite float.
pub fn percentage_from_points(points: Decimal) -> Result<Percentage, MoneyError> {
    points
        .checked_div(Decimal::ONE_HUNDRED)
        .ok_or(MoneyError::AmountConversion)?
        .to_f64()
        .map(Percentage::from)
        .ok_or(MoneyError::AmountConversion)
}

/// Combine county and state rates into a zip code's sales-tax rate, in
/// percentage points.
///
/// Zip rows persist this sum at creation time and recompute it whenever a
/// county or state rate changes; keeping the rule here keeps every caller
/// consistent.
///
/// # Errors
///
/// Returns [`MoneyError::AmountConversion`] on overflow.
pub fn combined_sales_tax_points(
    county_one: Decimal,
    county_two: Decimal,
    state: Decimal,
) -> Result<Decimal, MoneyError> {
    county_one
        .checked_add(county_two)
        .and_then(|sum| sum.checked_add(state))
        .ok_or(MoneyError::AmountConversion)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn percent_of_minor_calculates_correctly() -> TestResult {
        let result = percent_of_minor(Percentage::from(0.07), 500_000)?;

        assert_eq!(result, 35_000);

        Ok(())
    }

    #[test]
    fn percent_of_minor_rounds_midpoint_away_from_zero() -> TestResult {
        // 2.5% of 101 cents = 2.525 -> 3
        let result = percent_of_minor(Percentage::from(0.025), 101)?;

        assert_eq!(result, 3);

        Ok(())
    }

    #[test]
    fn percent_of_minor_overflow_returns_error() {
        let result = percent_of_minor(Percentage::from(2.0), Minor::MAX);

        assert!(matches!(result, Err(MoneyError::AmountConversion)));
    }

    #[test]
    fn split_evenly_shares_sum_close_to_total() -> TestResult {
        let total = 1_000;
        let shares = 3;
        let per_share = split_evenly(total, shares)?;

        assert_eq!(per_share, 333);

        let drift = (total - per_share * shares as i64).abs();
        assert!(drift <= shares as i64, "drift {drift} exceeds share count");

        Ok(())
    }

    #[test]
    fn split_evenly_zero_shares_is_zero() -> TestResult {
        assert_eq!(split_evenly(500, 0)?, 0);

        Ok(())
    }

    #[test]
    fn percentage_from_points_is_a_fraction() -> TestResult {
        let percent = percentage_from_points(Decimal::from(7))?;
        let tax = percent_of_minor(percent, 10_000)?;

        assert_eq!(tax, 700);

        Ok(())
    }

    #[test]
    fn combined_sales_tax_points_sums_components() -> TestResult {
        let combined = combined_sales_tax_points(
            Decimal::new(325, 2),
            Decimal::new(125, 2),
            Decimal::new(250, 2),
        )?;

        assert_eq!(combined, Decimal::new(700, 2));

        Ok(())
    }
}

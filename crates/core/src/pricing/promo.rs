//! Promo-code grants and price-time re-validation.
//!
//! A grant is bound to a cart line by the (external) promo controller. The
//! engine does not trust the binding: it re-checks the active flag, the
//! validity window and category eligibility when it prices, so a stale grant
//! prices as zero discount instead of surviving past expiry.

use decimal_percentage::Percentage;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{
    money::{Minor, MoneyError, percent_of_minor},
    pricing::line::LineCategory,
};

/// A promo code bound to a line, as loaded from the store.
#[derive(Debug, Clone)]
pub struct PromoGrant {
    /// The customer-facing code.
    pub code: String,

    /// Percentage off the line's sub-total.
    pub discount: Percentage,

    /// Admin kill-switch.
    pub is_active: bool,

    /// Start of the validity window.
    pub starts_at: Timestamp,

    /// End of the validity window.
    pub ends_at: Timestamp,

    /// When present, the grant only applies to lines of this category.
    pub category: Option<LineCategory>,
}

/// How a bound grant fared at price time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PromoOutcome {
    /// No grant was bound to the line.
    NotPresent,

    /// The grant was valid and its discount applied.
    Applied,

    /// The grant has been deactivated since binding.
    Inactive,

    /// Price time fell outside the grant's validity window.
    OutsideWindow,

    /// The grant is restricted to a different line category.
    CategoryMismatch,
}

impl PromoOutcome {
    /// Whether the discount applied.
    #[must_use]
    pub const fn applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

impl PromoGrant {
    /// Re-validate the grant against a line category at a point in time.
    #[must_use]
    pub fn outcome(&self, category: LineCategory, now: Timestamp) -> PromoOutcome {
        if !self.is_active {
            return PromoOutcome::Inactive;
        }

        if now < self.starts_at || now > self.ends_at {
            return PromoOutcome::OutsideWindow;
        }

        if self.category.is_some_and(|eligible| eligible != category) {
            return PromoOutcome::CategoryMismatch;
        }

        PromoOutcome::Applied
    }
}

/// Resolve a line's promo discount: zero unless a valid grant applies.
///
/// # Errors
///
/// Returns [`MoneyError`] when the percentage math is unrepresentable.
pub fn promo_discount(
    grant: Option<&PromoGrant>,
    category: LineCategory,
    sub_total: Minor,
    now: Timestamp,
) -> Result<(Minor, PromoOutcome), MoneyError> {
    let Some(grant) = grant else {
        return Ok((0, PromoOutcome::NotPresent));
    };

    let outcome = grant.outcome(category, now);

    if !outcome.applied() {
        return Ok((0, outcome));
    }

    Ok((percent_of_minor(grant.discount, sub_total)?, outcome))
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn grant(is_active: bool, category: Option<LineCategory>) -> PromoGrant {
        PromoGrant {
            code: "SUMMER10".to_string(),
            discount: Percentage::from(0.10),
            is_active,
            starts_at: Timestamp::UNIX_EPOCH,
            ends_at: Timestamp::MAX,
            category,
        }
    }

    #[test]
    fn valid_grant_discounts_the_sub_total() -> TestResult {
        let (discount, outcome) = promo_discount(
            Some(&grant(true, None)),
            LineCategory::FuelDelivery,
            50_000,
            Timestamp::UNIX_EPOCH,
        )?;

        assert_eq!(discount, 5_000);
        assert_eq!(outcome, PromoOutcome::Applied);

        Ok(())
    }

    #[test]
    fn deactivated_grant_prices_as_zero() -> TestResult {
        let (discount, outcome) = promo_discount(
            Some(&grant(false, None)),
            LineCategory::FuelDelivery,
            50_000,
            Timestamp::UNIX_EPOCH,
        )?;

        assert_eq!(discount, 0);
        assert_eq!(outcome, PromoOutcome::Inactive);

        Ok(())
    }

    #[test]
    fn expired_grant_is_outside_window() -> TestResult {
        let mut expired = grant(true, None);
        expired.ends_at = Timestamp::UNIX_EPOCH;

        let (discount, outcome) = promo_discount(
            Some(&expired),
            LineCategory::FuelDelivery,
            50_000,
            Timestamp::MAX,
        )?;

        assert_eq!(discount, 0);
        assert_eq!(outcome, PromoOutcome::OutsideWindow);

        Ok(())
    }

    #[test]
    fn category_restricted_grant_skips_other_categories() -> TestResult {
        let (discount, outcome) = promo_discount(
            Some(&grant(true, Some(LineCategory::TankExchange))),
            LineCategory::Accessory,
            10_000,
            Timestamp::UNIX_EPOCH,
        )?;

        assert_eq!(discount, 0);
        assert_eq!(outcome, PromoOutcome::CategoryMismatch);

        Ok(())
    }

    #[test]
    fn unbound_line_reports_not_present() -> TestResult {
        let (discount, outcome) = promo_discount(
            None,
            LineCategory::FuelDelivery,
            10_000,
            Timestamp::UNIX_EPOCH,
        )?;

        assert_eq!(discount, 0);
        assert_eq!(outcome, PromoOutcome::NotPresent);

        Ok(())
    }
}

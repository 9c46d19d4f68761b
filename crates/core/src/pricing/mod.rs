//! Cart and order pricing.
//!
//! [`PricingEngine::price_batch`] derives every monetary field for a batch of
//! lines belonging to one customer: tiered vendor delivery fee, sales tax,
//! promo discount, evenly apportioned platform fees, leakage, revenue split
//! and refund-on-cancel. The engine is pure — reference data arrives as a
//! [`RateBook`] and [`GeneralCharges`], and inputs are never mutated.
//!
//! A line must always be priced as part of its complete batch: the flat-fee
//! shares depend on the batch's line count, so pricing a line in isolation
//! produces a different (incorrect) apportionment.

use jiff::Timestamp;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    ids::{ProductId, VendorId},
    money::{Minor, MoneyError, percent_of_minor},
    pricing::{
        charges::{FeeShares, GeneralCharges},
        line::{LineInput, OrderType, PricedLine},
        tiers::{RateBook, TierLookupError},
    },
};

pub mod charges;
pub mod line;
pub mod promo;
pub mod tiers;

/// Options for one pricing call.
#[derive(Debug, Clone, Copy)]
pub struct PricingOptions {
    /// Charge each distinct vendor's flat leakage fee.
    pub check_leakage: bool,

    /// Price-time instant used to re-validate promo grants.
    pub now: Timestamp,
}

/// Pricing failures. Missing reference data is fatal to the whole batch —
/// the engine never silently prices a fee at zero.
#[derive(Debug, Error)]
pub enum PricingError {
    /// No tier ladder exists for a line's vendor/product/order-type.
    #[error("no tier ladder for vendor {vendor}, product {product} ({order_type})")]
    MissingLadder {
        /// Vendor the lookup was scoped to.
        vendor: VendorId,

        /// Product the lookup was scoped to.
        product: ProductId,

        /// Order type the lookup was scoped to.
        order_type: OrderType,
    },

    /// The ladder exists but could not resolve a fee for the line.
    #[error("tier lookup failed for vendor {vendor}, product {product}")]
    Tier {
        /// Vendor the lookup was scoped to.
        vendor: VendorId,

        /// Product the lookup was scoped to.
        product: ProductId,

        /// The underlying gap.
        #[source]
        source: TierLookupError,
    },

    /// Percentage or division arithmetic was unrepresentable.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Aggregate totals over one priced batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    /// Sum of line sub-totals plus vendor delivery fees.
    pub sub_total: Minor,

    /// Sum of line grand totals — the amount charged to the customer.
    pub grand_total: Minor,

    /// Sum of sales tax.
    pub sales_tax: Minor,

    /// Sum of applied promo discounts.
    pub promo_discount: Minor,

    /// Sum of delivery-location surcharges.
    pub location_amount: Minor,

    /// Leakage collected, one flat fee per distinct vendor in the batch.
    pub leakage_fee: Minor,

    /// The batch's total service fee (the flat setting, post-rounding).
    pub service_fee: Minor,

    /// The batch's total service charge.
    pub service_charge: Minor,

    /// The batch's total platform delivery fee.
    pub delivery_fee: Minor,
}

/// A priced batch: per-line results in input order plus aggregate totals.
#[derive(Debug, Clone, Default)]
pub struct PricedBatch {
    /// Priced lines, parallel to the input slice.
    pub lines: Vec<PricedLine>,

    /// Aggregate totals.
    pub totals: Totals,
}

/// Sum a set of priced lines into [`Totals`].
#[must_use]
pub fn aggregate(lines: &[PricedLine]) -> Totals {
    lines.iter().fold(Totals::default(), |acc, line| Totals {
        sub_total: acc
            .sub_total
            .saturating_add(line.sub_total)
            .saturating_add(line.vendor_delivery_fee),
        grand_total: acc.grand_total.saturating_add(line.grand_total),
        sales_tax: acc.sales_tax.saturating_add(line.sales_tax),
        promo_discount: acc.promo_discount.saturating_add(line.promo_discount),
        location_amount: acc.location_amount.saturating_add(line.location_price),
        leakage_fee: acc.leakage_fee.saturating_add(line.leakage_fee),
        service_fee: acc.service_fee.saturating_add(line.service_fee),
        service_charge: acc.service_charge.saturating_add(line.service_charge),
        delivery_fee: acc.delivery_fee.saturating_add(line.delivery_fee),
    })
}

/// The pricing engine. Construct once with the current general charges and
/// reuse across batches; it holds no per-batch state.
#[derive(Debug, Clone)]
pub struct PricingEngine {
    charges: GeneralCharges,
}

impl PricingEngine {
    /// Create an engine over the current general charges.
    #[must_use]
    pub const fn new(charges: GeneralCharges) -> Self {
        Self { charges }
    }

    /// Price a complete batch of lines.
    ///
    /// Returns priced lines parallel to the input plus aggregate totals.
    /// The leakage fee, when enabled, is charged on the first line of each
    /// distinct vendor so the batch total counts each vendor once.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError`] when reference data is missing for any line
    /// or an amount is unrepresentable; no partial batch is returned.
    pub fn price_batch(
        &self,
        lines: &[LineInput],
        rates: &RateBook,
        opts: &PricingOptions,
    ) -> Result<PricedBatch, PricingError> {
        if lines.is_empty() {
            return Ok(PricedBatch::default());
        }

        let shares = self.charges.apportion(lines.len())?;

        let mut vendors_charged = FxHashSet::default();
        let mut priced = Vec::with_capacity(lines.len());

        for line in lines {
            let first_for_vendor = vendors_charged.insert(line.pricing.vendor);

            priced.push(self.price_line(line, rates, shares, opts, first_for_vendor)?);
        }

        let totals = aggregate(&priced);

        Ok(PricedBatch {
            lines: priced,
            totals,
        })
    }

    fn price_line(
        &self,
        line: &LineInput,
        rates: &RateBook,
        shares: FeeShares,
        opts: &PricingOptions,
        first_for_vendor: bool,
    ) -> Result<PricedLine, PricingError> {
        let unit_net = line.unit_price - percent_of_minor(line.unit_discount, line.unit_price)?;
        let sub_total = (unit_net + line.accessory_price) * Minor::from(line.quantity);

        let sales_tax = if line.taxable {
            percent_of_minor(line.sales_tax_rate, sub_total)?
        } else {
            0
        };

        let ladder = rates
            .ladder(&line.pricing)
            .ok_or(PricingError::MissingLadder {
                vendor: line.pricing.vendor,
                product: line.pricing.product,
                order_type: line.pricing.order_type,
            })?;

        let vendor_delivery_fee = ladder
            .delivery_fee(line.quantity, line.category, line.cylinder_size)
            .map_err(|source| PricingError::Tier {
                vendor: line.pricing.vendor,
                product: line.pricing.product,
                source,
            })?;

        let (promo_discount, promo_outcome) =
            promo::promo_discount(line.promo.as_ref(), line.category, sub_total, opts.now)?;

        let leakage_fee = if opts.check_leakage && first_for_vendor {
            line.leakage_fee
        } else {
            0
        };

        let grand_total = sub_total
            + shares.service_fee
            + shares.service_charge
            + shares.delivery_fee
            + line.location_price
            + line.time_slot_price
            - promo_discount
            + vendor_delivery_fee
            + sales_tax
            + leakage_fee;

        let vendor_received = percent_of_minor(line.commission, grand_total)?;
        let admin_received = grand_total - vendor_received;

        let type_charges = self.charges.for_order_type(line.pricing.order_type);

        Ok(PricedLine {
            line: line.line,
            sub_total,
            vendor_delivery_fee,
            sales_tax,
            promo_discount,
            promo_outcome,
            service_fee: shares.service_fee,
            service_charge: shares.service_charge,
            delivery_fee: shares.delivery_fee,
            location_price: line.location_price,
            time_slot_price: line.time_slot_price,
            leakage_fee,
            grand_total,
            vendor_received,
            admin_received,
            freelance_driver_amount: type_charges.freelance_driver_price,
            customer_cancellation: type_charges.customer_cancellation,
            driver_cancellation: type_charges.driver_cancellation,
            refund_on_cancel: grand_total - type_charges.customer_cancellation,
        })
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::fixtures;

    use super::*;

    #[test]
    fn empty_batch_prices_to_empty_defaults() -> TestResult {
        let engine = PricingEngine::new(GeneralCharges::default());

        let batch = engine.price_batch(&[], &RateBook::new(), &fixtures::options())?;

        assert!(batch.lines.is_empty());
        assert_eq!(batch.totals, Totals::default());

        Ok(())
    }

    #[test]
    fn grand_total_decomposes_exactly_per_line() -> TestResult {
        let (lines, rates, charges) = fixtures::three_line_batch();
        let engine = PricingEngine::new(charges);

        let batch = engine.price_batch(&lines, &rates, &fixtures::options())?;

        for line in &batch.lines {
            let reassembled = line.sub_total
                + line.service_fee
                + line.service_charge
                + line.delivery_fee
                + line.location_price
                + line.time_slot_price
                - line.promo_discount
                + line.vendor_delivery_fee
                + line.sales_tax
                + line.leakage_fee;

            assert_eq!(reassembled, line.grand_total);
        }

        Ok(())
    }

    #[test]
    fn revenue_split_conserves_the_grand_total() -> TestResult {
        let (lines, rates, charges) = fixtures::three_line_batch();
        let engine = PricingEngine::new(charges);

        let batch = engine.price_batch(&lines, &rates, &fixtures::options())?;

        for line in &batch.lines {
            assert_eq!(line.vendor_received + line.admin_received, line.grand_total);
        }

        Ok(())
    }

    #[test]
    fn missing_ladder_fails_the_whole_batch() {
        let (lines, _, charges) = fixtures::three_line_batch();
        let engine = PricingEngine::new(charges);

        let result = engine.price_batch(&lines, &RateBook::new(), &fixtures::options());

        assert!(
            matches!(result, Err(PricingError::MissingLadder { .. })),
            "expected MissingLadder, got {result:?}"
        );
    }

    #[test]
    fn leakage_charged_once_per_distinct_vendor() -> TestResult {
        let (lines, rates, charges) = fixtures::three_line_batch();
        let engine = PricingEngine::new(charges);

        let opts = PricingOptions {
            check_leakage: true,
            ..fixtures::options()
        };

        let batch = engine.price_batch(&lines, &rates, &opts)?;

        // Lines 0 and 1 share a vendor; line 2 belongs to another.
        let charged: Vec<Minor> = batch.lines.iter().map(|line| line.leakage_fee).collect();

        assert_eq!(charged[0], fixtures::LEAKAGE_FEE);
        assert_eq!(charged[1], 0);
        assert_eq!(charged[2], fixtures::LEAKAGE_FEE);
        assert_eq!(batch.totals.leakage_fee, fixtures::LEAKAGE_FEE * 2);

        Ok(())
    }

    #[test]
    fn totals_sum_the_per_line_fields() -> TestResult {
        let (lines, rates, charges) = fixtures::three_line_batch();
        let engine = PricingEngine::new(charges);

        let batch = engine.price_batch(&lines, &rates, &fixtures::options())?;

        let grand: Minor = batch.lines.iter().map(|line| line.grand_total).sum();

        assert_eq!(batch.totals.grand_total, grand);

        Ok(())
    }
}

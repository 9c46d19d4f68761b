//! End-to-end pricing scenarios over the public engine surface.

use decimal_percentage::Percentage;
use jiff::Timestamp;
use testresult::TestResult;
use uuid::Uuid;

use flowline::{
    fixtures,
    ids::{LineId, ZipcodeId},
    money::Minor,
    pricing::{
        PricingEngine, PricingError, PricingOptions,
        line::{LineCategory, LineInput, OrderType, PricingRef},
        tiers::{RateBook, Tier, TierLadder, TierPrice},
    },
};

/// Vendor sells product P with fuel tiers [0,99] → $10 and [100,249] → $20.
/// A 50-unit line at $100/unit with 7% zip tax prices to a $5,000 sub-total,
/// $10 delivery fee, $350 tax, plus the undivided flat fees.
#[test]
fn fifty_unit_fuel_line_prices_to_the_worked_example() -> TestResult {
    let pricing = PricingRef {
        vendor: fixtures::vendor(1),
        product: fixtures::product(1),
        order_type: OrderType::FuelDelivery,
    };

    let mut rates = RateBook::new();
    rates.insert(
        pricing,
        TierLadder::new(vec![
            Tier::new(0, Some(99), 0).with_prices(vec![TierPrice {
                category: LineCategory::FuelDelivery,
                cylinder_size: None,
                price: 1_000,
            }]),
            Tier::new(100, Some(249), 1).with_prices(vec![TierPrice {
                category: LineCategory::FuelDelivery,
                cylinder_size: None,
                price: 2_000,
            }]),
        ]),
    );

    let line = LineInput {
        line: LineId::from_uuid(Uuid::from_u128(1)),
        pricing,
        category: LineCategory::FuelDelivery,
        cylinder_size: None,
        quantity: 50,
        zipcode: ZipcodeId::new(5),
        unit_price: 10_000,
        unit_discount: Percentage::from(0.0),
        accessory_price: 0,
        location_price: 0,
        time_slot_price: 0,
        taxable: true,
        sales_tax_rate: Percentage::from(0.07),
        commission: Percentage::from(0.80),
        leakage_fee: 0,
        promo: None,
    };

    let charges = fixtures::general_charges();
    let engine = PricingEngine::new(charges);

    let batch = engine.price_batch(
        &[line],
        &rates,
        &PricingOptions {
            check_leakage: false,
            now: Timestamp::UNIX_EPOCH,
        },
    )?;

    let [priced] = batch.lines.as_slice() else {
        panic!("expected exactly one priced line");
    };

    assert_eq!(priced.sub_total, 500_000);
    assert_eq!(priced.vendor_delivery_fee, 1_000);
    assert_eq!(priced.sales_tax, 35_000);

    // A single line carries the whole of each flat fee.
    let flat_fees = charges.service_fee + charges.service_charge + charges.delivery_fee;
    assert_eq!(priced.grand_total, 536_000 + flat_fees);

    assert_eq!(priced.vendor_received + priced.admin_received, priced.grand_total);
    assert_eq!(
        priced.refund_on_cancel,
        priced.grand_total - charges.fuel_delivery.customer_cancellation
    );

    Ok(())
}

/// Per-line fee shares reassemble to the flat settings within one cent per
/// line, regardless of batch size.
#[test]
fn apportioned_fees_reassemble_to_the_flat_settings() -> TestResult {
    let (lines, rates, charges) = fixtures::three_line_batch();
    let engine = PricingEngine::new(charges);

    let batch = engine.price_batch(&lines, &rates, &fixtures::options())?;

    let tolerance = batch.lines.len() as Minor;

    let service: Minor = batch.lines.iter().map(|line| line.service_fee).sum();
    let charge: Minor = batch.lines.iter().map(|line| line.service_charge).sum();
    let delivery: Minor = batch.lines.iter().map(|line| line.delivery_fee).sum();

    assert!((service - charges.service_fee).abs() <= tolerance);
    assert!((charge - charges.service_charge).abs() <= tolerance);
    assert!((delivery - charges.delivery_fee).abs() <= tolerance);

    Ok(())
}

/// A promo bound before expiry but priced after it contributes nothing.
#[test]
fn stale_promo_does_not_survive_past_expiry() -> TestResult {
    let (mut lines, rates, charges) = fixtures::three_line_batch();

    // The second fixture line carries the promo; price long after its window.
    let late = PricingOptions {
        check_leakage: false,
        now: Timestamp::MAX,
    };

    for line in &mut lines {
        if let Some(promo) = &mut line.promo {
            promo.ends_at = Timestamp::UNIX_EPOCH;
        }
    }

    let engine = PricingEngine::new(charges);
    let batch = engine.price_batch(&lines, &rates, &late)?;

    assert!(batch.lines.iter().all(|line| line.promo_discount == 0));
    assert_eq!(batch.totals.promo_discount, 0);

    Ok(())
}

/// A quantity falling into a ladder gap fails the batch instead of pricing
/// the fee at zero.
#[test]
fn ladder_gap_is_a_reference_data_error() {
    let (mut lines, _, charges) = fixtures::three_line_batch();
    lines.truncate(1);

    let pricing = lines.first().map(|line| line.pricing).unwrap_or_else(|| {
        unreachable!("fixture batch is non-empty")
    });

    // A ladder whose only band starts above the line's quantity.
    let mut rates = RateBook::new();
    rates.insert(
        pricing,
        TierLadder::new(vec![Tier::new(1_000, None, 0).with_prices(vec![TierPrice {
            category: LineCategory::FuelDelivery,
            cylinder_size: None,
            price: 5_000,
        }])]),
    );

    let engine = PricingEngine::new(charges);
    let result = engine.price_batch(&lines, &rates, &fixtures::options());

    assert!(
        matches!(result, Err(PricingError::Tier { .. })),
        "expected a tier lookup failure, got {result:?}"
    );
}

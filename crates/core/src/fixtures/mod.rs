//! Ready-made inputs for scenario tests and examples.

use decimal_percentage::Percentage;
use jiff::Timestamp;
use uuid::Uuid;

use crate::{
    assignment::{DriverSnapshot, OrderSnapshot},
    ids::{DriverId, LineId, OrderId, ProductId, VendorId, ZipcodeId},
    money::Minor,
    pricing::{
        PricingOptions,
        charges::{GeneralCharges, OrderTypeCharges},
        line::{CylinderSize, LineCategory, LineInput, OrderType, PricingRef},
        promo::PromoGrant,
        tiers::{RateBook, Tier, TierLadder, TierPrice, seed_bands},
    },
};

/// Leakage fee both fixture vendors charge.
pub const LEAKAGE_FEE: Minor = 250;

/// Pricing options pinned to the epoch, leakage off.
#[must_use]
pub fn options() -> PricingOptions {
    PricingOptions {
        check_leakage: false,
        now: Timestamp::UNIX_EPOCH,
    }
}

/// A ladder over the built-in bands for `order_type`, with one flat price
/// per band for the given category.
#[must_use]
pub fn seeded_ladder(order_type: OrderType, category: LineCategory, fees: &[Minor]) -> TierLadder {
    let tiers = seed_bands(order_type)
        .into_iter()
        .zip(fees)
        .enumerate()
        .map(|(position, ((from, to), fee))| {
            Tier::new(from, to, position as u32).with_prices(vec![TierPrice {
                category,
                cylinder_size: None,
                price: *fee,
            }])
        })
        .collect();

    TierLadder::new(tiers)
}

/// A vendor id derived from a small integer.
#[must_use]
pub const fn vendor(n: u128) -> VendorId {
    VendorId::from_uuid(Uuid::from_u128(0x1000 + n))
}

/// A product id derived from a small integer.
#[must_use]
pub const fn product(n: u128) -> ProductId {
    ProductId::from_uuid(Uuid::from_u128(0x2000 + n))
}

/// General charges used across the pricing fixtures.
#[must_use]
pub const fn general_charges() -> GeneralCharges {
    GeneralCharges {
        service_fee: 599,
        service_charge: 299,
        delivery_fee: 1_000,
        fuel_delivery: OrderTypeCharges {
            customer_cancellation: 1_500,
            driver_cancellation: 1_000,
            freelance_driver_price: 2_500,
        },
        tank_exchange: OrderTypeCharges {
            customer_cancellation: 500,
            driver_cancellation: 300,
            freelance_driver_price: 800,
        },
    }
}

/// Three lines across two vendors, with a matching rate book: two fuel
/// lines for vendor 1 (the second carrying a 10% promo) and one cylinder
/// exchange for vendor 2.
#[must_use]
pub fn three_line_batch() -> (Vec<LineInput>, RateBook, GeneralCharges) {
    let fuel = PricingRef {
        vendor: vendor(1),
        product: product(1),
        order_type: OrderType::FuelDelivery,
    };
    let exchange = PricingRef {
        vendor: vendor(2),
        product: product(2),
        order_type: OrderType::TankExchange,
    };

    let mut rates = RateBook::new();
    rates.insert(
        fuel,
        seeded_ladder(
            OrderType::FuelDelivery,
            LineCategory::FuelDelivery,
            &[1_000, 2_000, 3_000, 4_000, 5_000],
        ),
    );
    rates.insert(
        exchange,
        seeded_ladder(
            OrderType::TankExchange,
            LineCategory::TankExchange,
            &[500, 900, 1_300, 1_800],
        ),
    );

    let base = LineInput {
        line: LineId::from_uuid(Uuid::from_u128(0x3001)),
        pricing: fuel,
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
        leakage_fee: LEAKAGE_FEE,
        promo: None,
    };

    let mut discounted = base.clone();
    discounted.line = LineId::from_uuid(Uuid::from_u128(0x3002));
    discounted.quantity = 150;
    discounted.unit_discount = Percentage::from(0.10);
    discounted.taxable = false;
    discounted.promo = Some(PromoGrant {
        code: "REFILL10".to_string(),
        discount: Percentage::from(0.10),
        is_active: true,
        starts_at: Timestamp::UNIX_EPOCH,
        ends_at: Timestamp::MAX,
        category: None,
    });

    let mut cylinder = base.clone();
    cylinder.line = LineId::from_uuid(Uuid::from_u128(0x3003));
    cylinder.pricing = exchange;
    cylinder.category = LineCategory::TankExchange;
    cylinder.cylinder_size = Some(CylinderSize::new(20));
    cylinder.quantity = 2;
    cylinder.unit_price = 4_500;
    cylinder.commission = Percentage::from(0.75);
    cylinder.leakage_fee = LEAKAGE_FEE;

    (vec![base, discounted, cylinder], rates, general_charges())
}

/// A driver covering the given zip ids, capacity 3, fuel-delivery trained.
#[must_use]
pub fn driver(n: u128, vendor: Option<VendorId>, zipcodes: &[i64]) -> DriverSnapshot {
    DriverSnapshot {
        driver: DriverId::from_uuid(Uuid::from_u128(0x4000 + n)),
        vendor,
        order_type: OrderType::FuelDelivery,
        capacity: 3,
        zipcodes: zipcodes.iter().map(|id| ZipcodeId::new(*id)).collect(),
    }
}

/// A fuel-delivery order created at the epoch.
#[must_use]
pub fn order(n: u128, vendor: VendorId, zipcode: i64) -> OrderSnapshot {
    order_at(n, vendor, zipcode, 0)
}

/// A fuel-delivery order created `created_second` seconds after the epoch.
#[must_use]
pub fn order_at(n: u128, vendor: VendorId, zipcode: i64, created_second: i64) -> OrderSnapshot {
    OrderSnapshot {
        order: OrderId::from_uuid(Uuid::from_u128(0x5000 + n)),
        vendor,
        zipcode: ZipcodeId::new(zipcode),
        order_type: OrderType::FuelDelivery,
        created_at: Timestamp::from_second(created_second).unwrap_or(Timestamp::UNIX_EPOCH),
    }
}

//! Pricing rows and their conversion into engine inputs.

use decimal_percentage::Percentage;
use jiff::Timestamp;
use rustc_hash::FxHashMap;
use uuid::Uuid;

use flowline::{
    ids::{LineId, ProductId, VendorId, ZipcodeId},
    pricing::{
        Totals,
        charges::GeneralCharges,
        line::{CylinderSize, LineCategory, LineInput, OrderType, PricedLine, PricingRef},
        promo::PromoGrant,
        tiers::{RateBook, Tier, TierLadder, TierPrice},
    },
};

use crate::domain::pricing::errors::PricingServiceError;

/// A cart or order line joined with the product, vendor, zip and optional
/// promo reference data it prices against.
#[derive(Debug, Clone)]
pub struct LineRow {
    pub id: Uuid,
    pub vendor_id: Uuid,
    pub product_id: Uuid,
    pub category: i16,
    pub order_type: i16,
    pub cylinder_size: Option<i32>,
    pub quantity: i32,
    pub zipcode_id: i64,
    pub location_price: i64,
    pub index_price: i64,
    /// Product discount in percentage points (0–100).
    pub product_discount: f64,
    pub accessory_price: i64,
    pub is_sales_tax: bool,
    /// Combined zip sales-tax rate in percentage points.
    pub zip_sales_tax: f64,
    /// Vendor commission in percentage points.
    pub commission: f64,
    pub leakage_fee: i64,
    pub promo: Option<PromoRow>,
}

/// The promo code bound to a line, as stored.
#[derive(Debug, Clone)]
pub struct PromoRow {
    pub code: String,
    /// Discount in percentage points.
    pub discount: f64,
    pub is_active: bool,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub category: Option<i16>,
}

/// One (tier band, price row) pair of a vendor-product ladder.
#[derive(Debug, Clone)]
pub struct TierRow {
    pub vendor_id: Uuid,
    pub product_id: Uuid,
    pub order_type: i16,
    pub qty_from: i32,
    pub qty_to: Option<i32>,
    pub position: i32,
    pub category: i16,
    pub cylinder_size: Option<i32>,
    pub price: i64,
}

/// One general-charge setting row.
#[derive(Debug, Clone)]
pub struct ChargeRow {
    pub key: String,
    pub order_type: Option<i16>,
    pub amount: i64,
}

/// A priced cart or order batch, ready for checkout.
#[derive(Debug, Clone)]
pub struct PricedCart {
    /// Priced lines in line-creation order.
    pub lines: Vec<PricedLine>,

    /// Aggregate totals; `grand_total` feeds the payment intent.
    pub totals: Totals,
}

fn points(value: f64) -> Percentage {
    Percentage::from(value / 100.0)
}

/// Convert a joined line row into an engine input.
///
/// # Errors
///
/// Returns an error when the row carries an unknown order-type or category
/// code, or a negative quantity.
pub fn build_line_input(row: &LineRow) -> Result<LineInput, PricingServiceError> {
    let order_type = OrderType::from_code(row.order_type)
        .ok_or(PricingServiceError::UnknownOrderType(row.order_type))?;
    let category = LineCategory::from_code(row.category)
        .ok_or(PricingServiceError::UnknownCategory(row.category))?;

    let promo = row.promo.as_ref().map(build_promo_grant).transpose()?;

    Ok(LineInput {
        line: LineId::from_uuid(row.id),
        pricing: PricingRef {
            vendor: VendorId::from_uuid(row.vendor_id),
            product: ProductId::from_uuid(row.product_id),
            order_type,
        },
        category,
        cylinder_size: row.cylinder_size.map(CylinderSize::new),
        quantity: u32::try_from(row.quantity)?,
        zipcode: ZipcodeId::new(row.zipcode_id),
        unit_price: if category == LineCategory::Accessory {
            0
        } else {
            row.index_price
        },
        unit_discount: points(row.product_discount),
        accessory_price: if category == LineCategory::Accessory {
            row.accessory_price
        } else {
            0
        },
        location_price: row.location_price,
        time_slot_price: 0,
        taxable: row.is_sales_tax,
        sales_tax_rate: points(row.zip_sales_tax),
        commission: points(row.commission),
        leakage_fee: row.leakage_fee,
        promo,
    })
}

fn build_promo_grant(row: &PromoRow) -> Result<PromoGrant, PricingServiceError> {
    let category = row
        .category
        .map(|code| {
            LineCategory::from_code(code).ok_or(PricingServiceError::UnknownCategory(code))
        })
        .transpose()?;

    Ok(PromoGrant {
        code: row.code.clone(),
        discount: points(row.discount),
        is_active: row.is_active,
        starts_at: row.starts_at,
        ends_at: row.ends_at,
        category,
    })
}

/// Assemble tier rows into the rate book a batch prices against.
///
/// # Errors
///
/// Returns an error when a row carries an unknown order-type or category
/// code, or negative band bounds.
pub fn assemble_rate_book(rows: &[TierRow]) -> Result<RateBook, PricingServiceError> {
    type BandKey = (u32, Option<u32>, u32);

    let mut bands: FxHashMap<PricingRef, FxHashMap<BandKey, Vec<TierPrice>>> =
        FxHashMap::default();

    for row in rows {
        let order_type = OrderType::from_code(row.order_type)
            .ok_or(PricingServiceError::UnknownOrderType(row.order_type))?;
        let category = LineCategory::from_code(row.category)
            .ok_or(PricingServiceError::UnknownCategory(row.category))?;

        let pricing = PricingRef {
            vendor: VendorId::from_uuid(row.vendor_id),
            product: ProductId::from_uuid(row.product_id),
            order_type,
        };

        let band = (
            u32::try_from(row.qty_from)?,
            row.qty_to.map(u32::try_from).transpose()?,
            u32::try_from(row.position)?,
        );

        bands
            .entry(pricing)
            .or_default()
            .entry(band)
            .or_default()
            .push(TierPrice {
                category,
                cylinder_size: row.cylinder_size.map(CylinderSize::new),
                price: row.price,
            });
    }

    let mut book = RateBook::new();

    for (pricing, ladder_bands) in bands {
        let tiers = ladder_bands
            .into_iter()
            .map(|((from, to, position), prices)| {
                Tier::new(from, to, position).with_prices(prices)
            })
            .collect();

        book.insert(pricing, TierLadder::new(tiers));
    }

    Ok(book)
}

/// Fold general-charge setting rows into [`GeneralCharges`]. Unknown keys
/// are ignored so new settings do not break pricing.
#[must_use]
pub fn assemble_general_charges(rows: &[ChargeRow]) -> GeneralCharges {
    let mut charges = GeneralCharges::default();

    for row in rows {
        match (row.key.as_str(), row.order_type.map(OrderType::from_code)) {
            ("service_fee", None) => charges.service_fee = row.amount,
            ("service_charge", None) => charges.service_charge = row.amount,
            ("delivery_fee", None) => charges.delivery_fee = row.amount,
            (key, Some(Some(order_type))) => {
                let block = match order_type {
                    OrderType::FuelDelivery => &mut charges.fuel_delivery,
                    OrderType::TankExchange => &mut charges.tank_exchange,
                };

                match key {
                    "cancellation_charge_customer" => block.customer_cancellation = row.amount,
                    "cancellation_charge_driver" => block.driver_cancellation = row.amount,
                    "freelance_driver_price" => block.freelance_driver_price = row.amount,
                    _ => {}
                }
            }
            _ => {}
        }
    }

    charges
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use flowline::pricing::charges::OrderTypeCharges;

    use super::*;

    fn line_row() -> LineRow {
        LineRow {
            id: Uuid::from_u128(1),
            vendor_id: Uuid::from_u128(2),
            product_id: Uuid::from_u128(3),
            category: 1,
            order_type: 1,
            cylinder_size: None,
            quantity: 50,
            zipcode_id: 5,
            location_price: 0,
            index_price: 10_000,
            product_discount: 10.0,
            accessory_price: 1_500,
            is_sales_tax: true,
            zip_sales_tax: 7.0,
            commission: 80.0,
            leakage_fee: 250,
            promo: None,
        }
    }

    #[test]
    fn product_line_uses_index_price_and_zeroes_accessory() -> TestResult {
        let input = build_line_input(&line_row())?;

        assert_eq!(input.unit_price, 10_000);
        assert_eq!(input.accessory_price, 0);
        assert_eq!(input.quantity, 50);

        Ok(())
    }

    #[test]
    fn accessory_line_swaps_the_pricing_basis() -> TestResult {
        let mut row = line_row();
        row.category = 3;

        let input = build_line_input(&row)?;

        assert_eq!(input.unit_price, 0);
        assert_eq!(input.accessory_price, 1_500);
        assert_eq!(input.category, LineCategory::Accessory);

        Ok(())
    }

    #[test]
    fn stored_points_convert_to_fractions() -> TestResult {
        let input = build_line_input(&line_row())?;

        let tax = flowline::money::percent_of_minor(input.sales_tax_rate, 10_000)?;

        assert_eq!(tax, 700);

        Ok(())
    }

    #[test]
    fn unknown_order_type_code_is_rejected() {
        let mut row = line_row();
        row.order_type = 9;

        let result = build_line_input(&row);

        assert!(
            matches!(result, Err(PricingServiceError::UnknownOrderType(9))),
            "expected UnknownOrderType, got {result:?}"
        );
    }

    #[test]
    fn tier_rows_group_into_ladders_by_pricing_ref() -> TestResult {
        let rows = vec![
            TierRow {
                vendor_id: Uuid::from_u128(2),
                product_id: Uuid::from_u128(3),
                order_type: 1,
                qty_from: 0,
                qty_to: Some(99),
                position: 0,
                category: 1,
                cylinder_size: None,
                price: 1_000,
            },
            TierRow {
                vendor_id: Uuid::from_u128(2),
                product_id: Uuid::from_u128(3),
                order_type: 1,
                qty_from: 100,
                qty_to: None,
                position: 1,
                category: 1,
                cylinder_size: None,
                price: 2_000,
            },
        ];

        let book = assemble_rate_book(&rows)?;

        let pricing = PricingRef {
            vendor: VendorId::from_uuid(Uuid::from_u128(2)),
            product: ProductId::from_uuid(Uuid::from_u128(3)),
            order_type: OrderType::FuelDelivery,
        };

        let ladder = book.ladder(&pricing).ok_or("missing ladder")?;

        assert_eq!(ladder.delivery_fee(50, LineCategory::FuelDelivery, None)?, 1_000);
        assert_eq!(ladder.delivery_fee(500, LineCategory::FuelDelivery, None)?, 2_000);

        Ok(())
    }

    #[test]
    fn charge_rows_fold_into_general_charges() {
        let rows = vec![
            ChargeRow {
                key: "service_fee".to_string(),
                order_type: None,
                amount: 599,
            },
            ChargeRow {
                key: "cancellation_charge_customer".to_string(),
                order_type: Some(1),
                amount: 1_500,
            },
            ChargeRow {
                key: "freelance_driver_price".to_string(),
                order_type: Some(2),
                amount: 800,
            },
            ChargeRow {
                key: "some_future_setting".to_string(),
                order_type: None,
                amount: 42,
            },
        ];

        let charges = assemble_general_charges(&rows);

        let expected = GeneralCharges {
            service_fee: 599,
            fuel_delivery: OrderTypeCharges {
                customer_cancellation: 1_500,
                ..OrderTypeCharges::default()
            },
            tank_exchange: OrderTypeCharges {
                freelance_driver_price: 800,
                ..OrderTypeCharges::default()
            },
            ..GeneralCharges::default()
        };

        assert_eq!(charges, expected);
    }
}

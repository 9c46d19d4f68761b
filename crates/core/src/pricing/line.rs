//! Pricing line inputs and outputs.

use decimal_percentage::Percentage;
use serde::{Deserialize, Serialize};

use crate::{
    ids::{LineId, ProductId, VendorId, ZipcodeId},
    money::Minor,
    pricing::promo::{PromoGrant, PromoOutcome},
};

/// Order type: fuel delivery or tank exchange. Determines which tier ladder
/// and which general-charge keys apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderType {
    /// Bulk fuel delivered to the customer's tank.
    FuelDelivery,

    /// Cylinder exchange.
    TankExchange,
}

impl OrderType {
    /// Decode the store's numeric order-type code (1 = fuel delivery,
    /// 2 = tank exchange).
    #[must_use]
    pub const fn from_code(code: i16) -> Option<Self> {
        match code {
            1 => Some(Self::FuelDelivery),
            2 => Some(Self::TankExchange),
            _ => None,
        }
    }

    /// The store's numeric code for this order type.
    #[must_use]
    pub const fn code(self) -> i16 {
        match self {
            Self::FuelDelivery => 1,
            Self::TankExchange => 2,
        }
    }
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FuelDelivery => f.write_str("fuel_delivery"),
            Self::TankExchange => f.write_str("tank_exchange"),
        }
    }
}

/// What a line sells, which decides its per-unit pricing basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineCategory {
    /// Fuel priced off the product's index price.
    FuelDelivery,

    /// An exchanged cylinder priced off the product's index price.
    TankExchange,

    /// An accessory priced off its accessory price.
    Accessory,
}

impl LineCategory {
    /// Decode the store's numeric category code.
    #[must_use]
    pub const fn from_code(code: i16) -> Option<Self> {
        match code {
            1 => Some(Self::FuelDelivery),
            2 => Some(Self::TankExchange),
            3 => Some(Self::Accessory),
            _ => None,
        }
    }

    /// The store's numeric code for this category.
    #[must_use]
    pub const fn code(self) -> i16 {
        match self {
            Self::FuelDelivery => 1,
            Self::TankExchange => 2,
            Self::Accessory => 3,
        }
    }
}

/// Cylinder size key used to narrow tier pricing rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CylinderSize(i32);

impl CylinderSize {
    /// Wrap a raw size key.
    #[must_use]
    pub const fn new(size: i32) -> Self {
        Self(size)
    }

    /// Unwrap to the raw size key.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

/// The vendor/product/order-type triple a line's delivery fee is looked up
/// under. Also the rate-book key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PricingRef {
    /// Selling vendor.
    pub vendor: VendorId,

    /// Product or accessory row.
    pub product: ProductId,

    /// Order type the tier ladder is scoped to.
    pub order_type: OrderType,
}

/// One purchasable unit, fully resolved against reference data and ready to
/// price. Built by the service layer from a cart or order line row.
#[derive(Debug, Clone)]
pub struct LineInput {
    /// The cart/order line row being priced.
    pub line: LineId,

    /// Rate-book key for the tiered vendor delivery fee.
    pub pricing: PricingRef,

    /// Pricing basis category.
    pub category: LineCategory,

    /// Optional cylinder size narrowing the tier price row.
    pub cylinder_size: Option<CylinderSize>,

    /// Quantity ordered.
    pub quantity: u32,

    /// Delivery zip code.
    pub zipcode: ZipcodeId,

    /// Product index price per unit, minor units.
    pub unit_price: Minor,

    /// Product discount applied to the index price.
    pub unit_discount: Percentage,

    /// Accessory price per unit, minor units. Zero for product lines.
    pub accessory_price: Minor,

    /// Delivery-location surcharge for this line.
    pub location_price: Minor,

    /// Reserved time-slot surcharge; currently always zero.
    pub time_slot_price: Minor,

    /// Whether the vendor-product is subject to sales tax.
    pub taxable: bool,

    /// The delivery zip's combined sales-tax rate.
    pub sales_tax_rate: Percentage,

    /// Vendor commission on the grand total.
    pub commission: Percentage,

    /// Vendor's flat leakage fee, minor units.
    pub leakage_fee: Minor,

    /// Promo grant bound to the line, if any. Re-validated at price time.
    pub promo: Option<PromoGrant>,
}

/// A fully priced line. Field meanings mirror the persisted order columns;
/// every amount is minor units rounded to whole cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PricedLine {
    /// The line this prices.
    pub line: LineId,

    /// `(product unit + accessory unit) × quantity`.
    pub sub_total: Minor,

    /// Tier-resolved vendor delivery fee.
    pub vendor_delivery_fee: Minor,

    /// Sales tax on the sub-total, zero when not taxable.
    pub sales_tax: Minor,

    /// Promo discount off the sub-total, zero unless a valid grant applied.
    pub promo_discount: Minor,

    /// How the bound promo grant fared at price time.
    pub promo_outcome: PromoOutcome,

    /// This line's share of the flat platform service fee.
    pub service_fee: Minor,

    /// This line's share of the flat platform service charge.
    pub service_charge: Minor,

    /// This line's share of the flat platform delivery fee.
    pub delivery_fee: Minor,

    /// Delivery-location surcharge.
    pub location_price: Minor,

    /// Reserved time-slot surcharge.
    pub time_slot_price: Minor,

    /// Vendor leakage fee carried by this line (first line per vendor).
    pub leakage_fee: Minor,

    /// Sum of all of the above, the amount the customer pays for this line.
    pub grand_total: Minor,

    /// Vendor's commission share of the grand total.
    pub vendor_received: Minor,

    /// Platform's share of the grand total.
    pub admin_received: Minor,

    /// Flat payout when a freelance driver fulfils this order type.
    pub freelance_driver_amount: Minor,

    /// Flat charge kept from the customer on cancellation.
    pub customer_cancellation: Minor,

    /// Flat charge applied to a driver who abandons the order.
    pub driver_cancellation: Minor,

    /// Amount refunded if the customer cancels after payment.
    pub refund_on_cancel: Minor,
}

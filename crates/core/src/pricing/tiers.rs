//! Tiered vendor delivery-fee lookup.
//!
//! A vendor prices delivery per (product, order type) through an ordered
//! ladder of quantity bands; each band carries price rows keyed by line
//! category and optional cylinder size. Ladders are seeded per new
//! vendor-product from the built-in bands for the order type and editable
//! afterwards, so lookups must treat gaps as missing reference data rather
//! than pricing the fee at zero.

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::{
    money::Minor,
    pricing::line::{CylinderSize, LineCategory, OrderType, PricingRef},
};

/// A price row within a tier band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierPrice {
    /// Line category this row prices.
    pub category: LineCategory,

    /// Cylinder size this row is narrowed to; `None` matches any size.
    pub cylinder_size: Option<CylinderSize>,

    /// Delivery fee in minor units.
    pub price: Minor,
}

/// One quantity band of a ladder.
#[derive(Debug, Clone)]
pub struct Tier {
    from: u32,
    to: Option<u32>,
    position: u32,
    prices: Vec<TierPrice>,
}

impl Tier {
    /// Create a band covering `[from, to]` inclusive; `None` leaves the band
    /// open-ended.
    #[must_use]
    pub const fn new(from: u32, to: Option<u32>, position: u32) -> Self {
        Self {
            from,
            to,
            position,
            prices: Vec::new(),
        }
    }

    /// Attach price rows to the band.
    #[must_use]
    pub fn with_prices(mut self, prices: Vec<TierPrice>) -> Self {
        self.prices = prices;
        self
    }

    /// Lower bound of the band.
    #[must_use]
    pub const fn from(&self) -> u32 {
        self.from
    }

    /// Inclusive upper bound, `None` when open-ended.
    #[must_use]
    pub const fn to(&self) -> Option<u32> {
        self.to
    }

    /// Ladder rank of the band.
    #[must_use]
    pub const fn position(&self) -> u32 {
        self.position
    }

    /// Whether this band covers the quantity.
    #[must_use]
    pub fn contains(&self, quantity: u32) -> bool {
        quantity >= self.from && self.to.is_none_or(|to| quantity <= to)
    }

    /// Find the price row for a category and optional cylinder size.
    ///
    /// A row with a cylinder size only matches that size; a row without one
    /// matches any. Size-specific rows win over generic rows.
    #[must_use]
    pub fn price_for(
        &self,
        category: LineCategory,
        cylinder_size: Option<CylinderSize>,
    ) -> Option<Minor> {
        let specific = self
            .prices
            .iter()
            .find(|row| row.category == category && row.cylinder_size == cylinder_size);

        specific
            .or_else(|| {
                self.prices
                    .iter()
                    .find(|row| row.category == category && row.cylinder_size.is_none())
            })
            .map(|row| row.price)
    }
}

/// Why a ladder lookup failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TierLookupError {
    /// No band covers the quantity — the ladder has a gap or ends early.
    #[error("no tier band covers quantity {quantity}")]
    BandGap {
        /// Quantity that fell into a gap.
        quantity: u32,
    },

    /// The covering band has no price row for the category/cylinder pair.
    #[error("no tier price for category {category:?} at quantity {quantity}")]
    MissingPrice {
        /// Quantity whose band was found.
        quantity: u32,

        /// Category the lookup asked for.
        category: LineCategory,

        /// Cylinder size the lookup asked for.
        cylinder_size: Option<CylinderSize>,
    },
}

/// An ordered ladder of quantity bands for one (vendor, product, order type).
#[derive(Debug, Clone, Default)]
pub struct TierLadder {
    tiers: Vec<Tier>,
}

impl TierLadder {
    /// Build a ladder, ordering bands by position rank.
    #[must_use]
    pub fn new(mut tiers: Vec<Tier>) -> Self {
        tiers.sort_by_key(Tier::position);
        Self { tiers }
    }

    /// The band covering a quantity, if any.
    #[must_use]
    pub fn band_for(&self, quantity: u32) -> Option<&Tier> {
        self.tiers.iter().find(|tier| tier.contains(quantity))
    }

    /// Resolve the vendor delivery fee for a quantity/category/cylinder.
    ///
    /// # Errors
    ///
    /// Returns [`TierLookupError::BandGap`] when no band covers the
    /// quantity, and [`TierLookupError::MissingPrice`] when the band has no
    /// matching price row.
    pub fn delivery_fee(
        &self,
        quantity: u32,
        category: LineCategory,
        cylinder_size: Option<CylinderSize>,
    ) -> Result<Minor, TierLookupError> {
        let band = self
            .band_for(quantity)
            .ok_or(TierLookupError::BandGap { quantity })?;

        band.price_for(category, cylinder_size)
            .ok_or(TierLookupError::MissingPrice {
                quantity,
                category,
                cylinder_size,
            })
    }
}

/// The built-in band bounds seeded for a new vendor-product, by order type.
#[must_use]
pub fn seed_bands(order_type: OrderType) -> Vec<(u32, Option<u32>)> {
    match order_type {
        OrderType::FuelDelivery => vec![
            (0, Some(99)),
            (100, Some(249)),
            (250, Some(499)),
            (500, Some(999)),
            (1000, None),
        ],
        OrderType::TankExchange => vec![(0, Some(3)), (4, Some(6)), (7, Some(10)), (11, None)],
    }
}

/// Every ladder the engine needs for one pricing batch, keyed by the lines'
/// pricing refs.
#[derive(Debug, Clone, Default)]
pub struct RateBook {
    ladders: FxHashMap<PricingRef, TierLadder>,
}

impl RateBook {
    /// An empty rate book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a ladder for a pricing ref, replacing any existing one.
    pub fn insert(&mut self, pricing: PricingRef, ladder: TierLadder) {
        self.ladders.insert(pricing, ladder);
    }

    /// Look up the ladder for a pricing ref.
    #[must_use]
    pub fn ladder(&self, pricing: &PricingRef) -> Option<&TierLadder> {
        self.ladders.get(pricing)
    }
}

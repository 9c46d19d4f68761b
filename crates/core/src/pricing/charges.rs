//! Platform general charges and flat-fee apportionment.

use serde::{Deserialize, Serialize};

use crate::{
    money::{Minor, MoneyError, split_evenly},
    pricing::line::OrderType,
};

/// Flat charges scoped to one order type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTypeCharges {
    /// Kept from the customer when they cancel.
    pub customer_cancellation: Minor,

    /// Charged to a driver who abandons an order.
    pub driver_cancellation: Minor,

    /// Flat payout to a freelance driver fulfilling the order.
    pub freelance_driver_price: Minor,
}

/// Admin-configured platform-wide flat charges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralCharges {
    /// Flat service fee per pricing batch.
    pub service_fee: Minor,

    /// Flat service charge per pricing batch.
    pub service_charge: Minor,

    /// Flat platform delivery fee per pricing batch.
    pub delivery_fee: Minor,

    /// Charges keyed to fuel-delivery orders.
    pub fuel_delivery: OrderTypeCharges,

    /// Charges keyed to tank-exchange orders.
    pub tank_exchange: OrderTypeCharges,
}

/// Per-line shares of the batch-level flat fees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeeShares {
    /// Per-line service fee.
    pub service_fee: Minor,

    /// Per-line service charge.
    pub service_charge: Minor,

    /// Per-line platform delivery fee.
    pub delivery_fee: Minor,
}

impl GeneralCharges {
    /// The flat charges for an order type.
    #[must_use]
    pub const fn for_order_type(&self, order_type: OrderType) -> &OrderTypeCharges {
        match order_type {
            OrderType::FuelDelivery => &self.fuel_delivery,
            OrderType::TankExchange => &self.tank_exchange,
        }
    }

    /// Divide the flat fees evenly across the lines of one pricing batch.
    ///
    /// Placing N items together must not multiply the flat fees by N, so
    /// each fee is split across the batch, never across a customer's wider
    /// history.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError`] when a division result is unrepresentable.
    pub fn apportion(&self, line_count: usize) -> Result<FeeShares, MoneyError> {
        Ok(FeeShares {
            service_fee: split_evenly(self.service_fee, line_count)?,
            service_charge: split_evenly(self.service_charge, line_count)?,
            delivery_fee: split_evenly(self.delivery_fee, line_count)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn charges() -> GeneralCharges {
        GeneralCharges {
            service_fee: 1_000,
            service_charge: 250,
            delivery_fee: 500,
            ..GeneralCharges::default()
        }
    }

    #[test]
    fn shares_times_line_count_stays_within_rounding_tolerance() -> TestResult {
        for line_count in 1..=7 {
            let shares = charges().apportion(line_count)?;

            let reassembled = shares.service_fee * line_count as i64;
            let drift = (reassembled - 1_000).abs();

            assert!(
                drift <= line_count as i64,
                "{line_count} lines drifted {drift} cents"
            );
        }

        Ok(())
    }

    #[test]
    fn single_line_carries_the_whole_fee() -> TestResult {
        let shares = charges().apportion(1)?;

        assert_eq!(shares.service_fee, 1_000);
        assert_eq!(shares.service_charge, 250);
        assert_eq!(shares.delivery_fee, 500);

        Ok(())
    }

    #[test]
    fn order_type_selects_its_charge_block() {
        let general = GeneralCharges {
            fuel_delivery: OrderTypeCharges {
                customer_cancellation: 1_500,
                driver_cancellation: 1_000,
                freelance_driver_price: 2_000,
            },
            tank_exchange: OrderTypeCharges {
                customer_cancellation: 500,
                driver_cancellation: 300,
                freelance_driver_price: 800,
            },
            ..GeneralCharges::default()
        };

        assert_eq!(
            general
                .for_order_type(OrderType::FuelDelivery)
                .customer_cancellation,
            1_500
        );
        assert_eq!(
            general
                .for_order_type(OrderType::TankExchange)
                .freelance_driver_price,
            800
        );
    }
}

//! Daily driver assignment planning.
//!
//! Matches a day's unassigned orders to eligible drivers under an explicit,
//! documented policy:
//!
//! - orders are processed oldest `created_at` first (stable on ties);
//! - a vendor's own drivers are always tried before freelancers;
//! - within each group, the candidate with the most remaining capacity is
//!   tried first (stable on ties);
//! - a candidate is eligible when their coverage set contains the order's
//!   zip code, their specialization matches the order type, and the
//!   [`CapacityLedger`] still shows headroom.
//!
//! Orders that exhaust all candidates stay unassigned and become eligible
//! again on the next run. The planner is pure; persisting each match is the
//! job layer's concern.

use std::cmp::Reverse;

use jiff::Timestamp;
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use crate::ids::{DriverId, OrderId, VendorId, ZipcodeId};
use crate::pricing::line::OrderType;

pub mod ledger;

pub use ledger::CapacityLedger;

/// An unassigned order as fetched for today's run.
#[derive(Debug, Clone)]
pub struct OrderSnapshot {
    /// The order row.
    pub order: OrderId,

    /// Vendor the order was placed with.
    pub vendor: VendorId,

    /// Delivery zip code.
    pub zipcode: ZipcodeId,

    /// Order type a driver must specialize in.
    pub order_type: OrderType,

    /// Creation time, drives processing priority.
    pub created_at: Timestamp,
}

/// An eligible driver (already filtered to online, approved, not suspended).
#[derive(Debug, Clone)]
pub struct DriverSnapshot {
    /// The driver row.
    pub driver: DriverId,

    /// Employing vendor; `None` marks a freelancer.
    pub vendor: Option<VendorId>,

    /// Order type the driver handles.
    pub order_type: OrderType,

    /// Maximum orders per day.
    pub capacity: u32,

    /// Zip codes the driver covers.
    pub zipcodes: FxHashSet<ZipcodeId>,
}

impl DriverSnapshot {
    /// Whether the driver covers a zip code.
    #[must_use]
    pub fn covers(&self, zipcode: ZipcodeId) -> bool {
        self.zipcodes.contains(&zipcode)
    }

    /// Whether the driver is employed by no vendor.
    #[must_use]
    pub const fn is_freelance(&self) -> bool {
        self.vendor.is_none()
    }
}

/// One planned match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    /// The matched order.
    pub order: OrderId,

    /// The driver it goes to.
    pub driver: DriverId,
}

/// The result of planning one day's batch.
#[derive(Debug, Clone, Default)]
pub struct AssignmentPlan {
    /// Matches in the order they were decided.
    pub assignments: Vec<Assignment>,

    /// Orders no candidate could take.
    pub unassigned: Vec<OrderId>,
}

/// The day's candidate drivers, split into vendor fleets and the shared
/// freelance pool. Freelancers serve every vendor's orders; their load is
/// shared through the ledger rather than by removal from the pool.
#[derive(Debug, Clone, Default)]
pub struct DriverPool {
    by_vendor: FxHashMap<VendorId, Vec<DriverSnapshot>>,
    freelance: Vec<DriverSnapshot>,
}

impl DriverPool {
    /// Split a flat driver list into vendor fleets and freelancers,
    /// preserving fetch order within each group.
    #[must_use]
    pub fn new(drivers: impl IntoIterator<Item = DriverSnapshot>) -> Self {
        let mut pool = Self::default();

        for driver in drivers {
            match driver.vendor {
                Some(vendor) => pool.by_vendor.entry(vendor).or_default().push(driver),
                None => pool.freelance.push(driver),
            }
        }

        pool
    }

    /// Candidates for a vendor's order: the vendor's fleet, then freelancers.
    pub fn candidates_for(&self, vendor: VendorId) -> impl Iterator<Item = &DriverSnapshot> {
        self.by_vendor
            .get(&vendor)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .chain(self.freelance.iter())
    }
}

/// Sort orders into dispatch priority: oldest first, stable on ties.
pub fn sort_for_dispatch(orders: &mut [OrderSnapshot]) {
    orders.sort_by_key(|order| order.created_at);
}

/// Pick the driver for one order, without charging the ledger.
///
/// Returns `None` when no eligible candidate has remaining capacity.
#[must_use]
pub fn select_driver(
    order: &OrderSnapshot,
    pool: &DriverPool,
    ledger: &CapacityLedger,
) -> Option<DriverId> {
    let eligible: SmallVec<[(&DriverSnapshot, u32); 8]> = pool
        .candidates_for(order.vendor)
        .filter(|driver| driver.order_type == order.order_type && driver.covers(order.zipcode))
        .filter_map(|driver| {
            let used = ledger.assigned_count(driver.driver);

            (used < driver.capacity).then(|| (driver, driver.capacity - used))
        })
        .collect();

    eligible
        .iter()
        .min_by_key(|(driver, remaining)| (u8::from(driver.is_freelance()), Reverse(*remaining)))
        .map(|(driver, _)| driver.driver)
}

/// Plan a whole day's batch, charging the ledger as matches are made so
/// later orders see earlier assignments.
#[must_use]
pub fn plan_assignments(
    mut orders: Vec<OrderSnapshot>,
    pool: &DriverPool,
    ledger: &mut CapacityLedger,
) -> AssignmentPlan {
    sort_for_dispatch(&mut orders);

    let mut plan = AssignmentPlan::default();

    for order in &orders {
        match select_driver(order, pool, ledger) {
            Some(driver) => {
                ledger.record(driver);
                plan.assignments.push(Assignment {
                    order: order.order,
                    driver,
                });
            }
            None => plan.unassigned.push(order.order),
        }
    }

    plan
}

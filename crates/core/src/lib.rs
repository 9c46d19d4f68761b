//! Flowline
//!
//! The pricing and dispatch core of a propane-delivery marketplace. Two
//! independent, stateless components:
//!
//! - [`pricing`] — derives every monetary field for a customer's cart or
//!   order batch: tiered vendor delivery fees, sales tax, promo discounts,
//!   evenly apportioned platform fees, leakage, revenue split and
//!   refund-on-cancel. [`schedule`] carries the sibling vendor-slot
//!   admission gate used when lines are created.
//! - [`assignment`] — plans the daily matching of unassigned orders to
//!   eligible drivers under zip-coverage, specialization and per-driver
//!   capacity constraints.
//!
//! Everything here is pure computation over snapshots; loading reference
//! data and persisting results belongs to the service layer built on top.

pub mod assignment;
pub mod fixtures;
pub mod ids;
pub mod money;
pub mod pricing;
pub mod schedule;

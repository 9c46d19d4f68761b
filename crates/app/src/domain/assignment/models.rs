//! Assignment rows, snapshot conversion and the run report.

use jiff::{Timestamp, civil::Date};
use uuid::Uuid;

use flowline::{
    assignment::{DriverSnapshot, OrderSnapshot},
    ids::{DriverId, OrderId, VendorId, ZipcodeId},
    pricing::line::OrderType,
};

use crate::domain::assignment::errors::AssignmentServiceError;

/// An unassigned order row in scheduler scope.
#[derive(Debug, Clone)]
pub struct OrderRow {
    pub id: Uuid,
    pub vendor_id: Uuid,
    pub zipcode_id: i64,
    pub order_type: i16,
    pub created_at: Timestamp,
}

/// An eligible driver row (already filtered to online, approved, not
/// suspended by the fetch).
#[derive(Debug, Clone)]
pub struct DriverRow {
    pub id: Uuid,
    pub vendor_id: Option<Uuid>,
    pub order_type: i16,
    pub order_capacity: i32,
    pub zipcode_ids: Vec<i64>,
}

/// Convert an order row into a planner snapshot.
///
/// # Errors
///
/// Returns an error on an unknown order-type code.
pub fn build_order_snapshot(row: &OrderRow) -> Result<OrderSnapshot, AssignmentServiceError> {
    Ok(OrderSnapshot {
        order: OrderId::from_uuid(row.id),
        vendor: VendorId::from_uuid(row.vendor_id),
        zipcode: ZipcodeId::new(row.zipcode_id),
        order_type: OrderType::from_code(row.order_type)
            .ok_or(AssignmentServiceError::UnknownOrderType(row.order_type))?,
        created_at: row.created_at,
    })
}

/// Convert a driver row into a planner snapshot.
///
/// # Errors
///
/// Returns an error on an unknown order-type code or a negative capacity.
pub fn build_driver_snapshot(row: &DriverRow) -> Result<DriverSnapshot, AssignmentServiceError> {
    Ok(DriverSnapshot {
        driver: DriverId::from_uuid(row.id),
        vendor: row.vendor_id.map(VendorId::from_uuid),
        order_type: OrderType::from_code(row.order_type)
            .ok_or(AssignmentServiceError::UnknownOrderType(row.order_type))?,
        capacity: u32::try_from(row.order_capacity)?,
        zipcodes: row.zipcode_ids.iter().map(|id| ZipcodeId::new(*id)).collect(),
    })
}

/// What one daily run did — the operational record of the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignmentRunReport {
    /// Business-local date the run covered.
    pub date: Date,

    /// Orders fetched as unassigned for the day.
    pub considered: usize,

    /// Orders matched and persisted.
    pub assigned: usize,

    /// Orders left for the next run (no eligible driver, or lost a race).
    pub unassigned: usize,

    /// Matches whose write failed; their capacity was released.
    pub failed_writes: usize,
}

impl AssignmentRunReport {
    /// An empty report for a date.
    #[must_use]
    pub const fn empty(date: Date) -> Self {
        Self {
            date,
            considered: 0,
            assigned: 0,
            unassigned: 0,
            failed_writes: 0,
        }
    }
}

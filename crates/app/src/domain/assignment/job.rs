//! The daily driver-assignment job.
//!
//! Runs once per day (cron, 01:00 business-local): fetches the day's
//! unassigned orders and the eligible driver pool, plans matches with the
//! engine's capacity ledger, and persists each match as it is decided so a
//! re-run only sees what is still unassigned. The job never panics and
//! never propagates store errors out of a run — a failed write releases the
//! driver's ledger charge and the run keeps going.

use std::sync::Arc;

use jiff::{civil::Date, tz::TimeZone};
use tracing::{error, info, warn};

use flowline::assignment::{CapacityLedger, DriverPool, select_driver, sort_for_dispatch};

use crate::domain::{
    assignment::{
        errors::AssignmentServiceError, models::AssignmentRunReport, service::AssignmentStore,
    },
    time::local_day_range,
};

#[derive(Clone)]
pub struct DailyAssignment {
    store: Arc<dyn AssignmentStore>,
    tz: TimeZone,
}

impl DailyAssignment {
    /// Build the job over a store and the business time zone.
    #[must_use]
    pub fn new(store: Arc<dyn AssignmentStore>, tz: TimeZone) -> Self {
        Self { store, tz }
    }

    /// Run the batch for a business-local date. Never fails: an aborted run
    /// logs its error and reports zero work, leaving every order eligible
    /// for the next firing.
    #[tracing::instrument(name = "assignment.job.run", skip(self), fields(date = %date))]
    pub async fn run(&self, date: Date) -> AssignmentRunReport {
        match self.dispatch(date).await {
            Ok(report) => {
                info!(
                    considered = report.considered,
                    assigned = report.assigned,
                    unassigned = report.unassigned,
                    failed_writes = report.failed_writes,
                    "daily assignment complete"
                );

                report
            }
            Err(err) => {
                error!(error = %err, "daily assignment run aborted");

                AssignmentRunReport::empty(date)
            }
        }
    }

    async fn dispatch(&self, date: Date) -> Result<AssignmentRunReport, AssignmentServiceError> {
        let range = local_day_range(date, &self.tz)?;

        let mut orders = self.store.unassigned_orders(range).await?;
        let drivers = self.store.eligible_drivers().await?;
        let counts = self.store.assigned_counts(range).await?;

        let pool = DriverPool::new(drivers);
        let mut ledger = CapacityLedger::from_counts(counts);

        sort_for_dispatch(&mut orders);

        let mut report = AssignmentRunReport::empty(date);
        report.considered = orders.len();

        for order in &orders {
            let Some(driver) = select_driver(order, &pool, &ledger) else {
                report.unassigned += 1;
                continue;
            };

            // Charge the ledger before the write so a later order in this
            // pass cannot double-book the driver while the write is in
            // flight; release on any outcome that didn't stick.
            ledger.record(driver);

            match self.store.assign_driver(order.order, driver).await {
                Ok(true) => {
                    info!(order = %order.order, driver = %driver, "order assigned");
                    report.assigned += 1;
                }
                Ok(false) => {
                    warn!(order = %order.order, "order no longer assignable, skipping");
                    ledger.release(driver);
                    report.unassigned += 1;
                }
                Err(err) => {
                    warn!(order = %order.order, driver = %driver, error = %err, "assignment write failed");
                    ledger.release(driver);
                    report.failed_writes += 1;
                }
            }
        }

        Ok(report)
    }
}

//! Assignment store: the scheduler's narrow view of the relational store.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::warn;

use flowline::{
    assignment::{DriverSnapshot, OrderSnapshot},
    ids::{DriverId, OrderId},
};

use crate::{
    database::Db,
    domain::assignment::{
        errors::AssignmentServiceError,
        models::{build_driver_snapshot, build_order_snapshot},
        repositories::{PgDriversRepository, PgOrdersRepository},
    },
};

#[derive(Debug, Clone)]
pub struct PgAssignmentStore {
    db: Db,
    orders: PgOrdersRepository,
    drivers: PgDriversRepository,
}

impl PgAssignmentStore {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            orders: PgOrdersRepository::new(),
            drivers: PgDriversRepository::new(),
        }
    }
}

#[async_trait]
impl AssignmentStore for PgAssignmentStore {
    async fn unassigned_orders(
        &self,
        range: (Timestamp, Timestamp),
    ) -> Result<Vec<OrderSnapshot>, AssignmentServiceError> {
        let mut tx = self.db.begin().await.map_err(AssignmentServiceError::from)?;
        let rows = self.orders.unassigned_orders(&mut tx, range).await?;
        tx.commit().await.map_err(AssignmentServiceError::from)?;

        // A malformed row must not take the whole batch down with it.
        Ok(rows
            .iter()
            .filter_map(|row| match build_order_snapshot(row) {
                Ok(snapshot) => Some(snapshot),
                Err(error) => {
                    warn!(order = %row.id, %error, "skipping malformed order row");
                    None
                }
            })
            .collect())
    }

    async fn eligible_drivers(&self) -> Result<Vec<DriverSnapshot>, AssignmentServiceError> {
        let mut tx = self.db.begin().await.map_err(AssignmentServiceError::from)?;
        let rows = self.drivers.eligible_drivers(&mut tx).await?;
        tx.commit().await.map_err(AssignmentServiceError::from)?;

        Ok(rows
            .iter()
            .filter_map(|row| match build_driver_snapshot(row) {
                Ok(snapshot) => Some(snapshot),
                Err(error) => {
                    warn!(driver = %row.id, %error, "skipping malformed driver row");
                    None
                }
            })
            .collect())
    }

    async fn assigned_counts(
        &self,
        range: (Timestamp, Timestamp),
    ) -> Result<Vec<(DriverId, u32)>, AssignmentServiceError> {
        let mut tx = self.db.begin().await.map_err(AssignmentServiceError::from)?;
        let counts = self.orders.assigned_counts(&mut tx, range).await?;
        tx.commit().await.map_err(AssignmentServiceError::from)?;

        counts
            .into_iter()
            .map(|(driver, count)| {
                Ok((DriverId::from_uuid(driver), u32::try_from(count)?))
            })
            .collect()
    }

    async fn assign_driver(
        &self,
        order: OrderId,
        driver: DriverId,
    ) -> Result<bool, AssignmentServiceError> {
        let mut tx = self.db.begin().await.map_err(AssignmentServiceError::from)?;

        let won = self
            .orders
            .assign_driver(&mut tx, order.into_uuid(), driver.into_uuid())
            .await?;

        tx.commit().await.map_err(AssignmentServiceError::from)?;

        Ok(won)
    }
}

#[automock]
#[async_trait]
pub trait AssignmentStore: Send + Sync {
    /// Driverless, dispatchable orders scheduled within the instant range.
    async fn unassigned_orders(
        &self,
        range: (Timestamp, Timestamp),
    ) -> Result<Vec<OrderSnapshot>, AssignmentServiceError>;

    /// Every driver currently able to take work.
    async fn eligible_drivers(&self) -> Result<Vec<DriverSnapshot>, AssignmentServiceError>;

    /// Per-driver counts of orders already assigned within the range.
    async fn assigned_counts(
        &self,
        range: (Timestamp, Timestamp),
    ) -> Result<Vec<(DriverId, u32)>, AssignmentServiceError>;

    /// Persist one match. Returns `false` when the order was no longer
    /// assignable (another actor won the row).
    async fn assign_driver(
        &self,
        order: OrderId,
        driver: DriverId,
    ) -> Result<bool, AssignmentServiceError>;
}

//! Scheduler-scope order reads and the assignment write.

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::domain::assignment::models::OrderRow;

const GET_UNASSIGNED_ORDERS_SQL: &str = include_str!("../sql/get_unassigned_orders.sql");
const GET_ASSIGNED_COUNTS_SQL: &str = include_str!("../sql/get_assigned_counts.sql");
const ASSIGN_DRIVER_SQL: &str = include_str!("../sql/assign_driver.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Driverless, still-dispatchable orders scheduled within the range, in
    /// creation order.
    pub(crate) async fn unassigned_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        range: (Timestamp, Timestamp),
    ) -> Result<Vec<OrderRow>, sqlx::Error> {
        query_as::<Postgres, OrderRow>(GET_UNASSIGNED_ORDERS_SQL)
            .bind(SqlxTimestamp::from(range.0))
            .bind(SqlxTimestamp::from(range.1))
            .fetch_all(&mut **tx)
            .await
    }

    /// Per-driver counts of orders already assigned within the range; seeds
    /// the run's capacity ledger.
    pub(crate) async fn assigned_counts(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        range: (Timestamp, Timestamp),
    ) -> Result<Vec<(Uuid, i64)>, sqlx::Error> {
        let rows = query(GET_ASSIGNED_COUNTS_SQL)
            .bind(SqlxTimestamp::from(range.0))
            .bind(SqlxTimestamp::from(range.1))
            .fetch_all(&mut **tx)
            .await?;

        rows.iter()
            .map(|row| Ok((row.try_get("driver_id")?, row.try_get("assigned")?)))
            .collect()
    }

    /// Write the driver onto the order. The `driver_id IS NULL` guard makes
    /// the write a no-op when another actor got there first; the returned
    /// flag reports whether this write won.
    pub(crate) async fn assign_driver(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: Uuid,
        driver: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let rows_affected = query(ASSIGN_DRIVER_SQL)
            .bind(order)
            .bind(driver)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected == 1)
    }
}

impl<'r> FromRow<'r, PgRow> for OrderRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            vendor_id: row.try_get("vendor_id")?,
            zipcode_id: row.try_get("zipcode_id")?,
            order_type: row.try_get("order_type")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}

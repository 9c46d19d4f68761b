//! Eligible-driver reads.

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::assignment::models::DriverRow;

const GET_ELIGIBLE_DRIVERS_SQL: &str = include_str!("../sql/get_eligible_drivers.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgDriversRepository;

impl PgDriversRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Every online, approved, non-suspended driver — vendor fleets and
    /// freelancers alike.
    pub(crate) async fn eligible_drivers(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<DriverRow>, sqlx::Error> {
        query_as::<Postgres, DriverRow>(GET_ELIGIBLE_DRIVERS_SQL)
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for DriverRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            vendor_id: row.try_get("vendor_id")?,
            order_type: row.try_get("order_type")?,
            order_capacity: row.try_get("order_capacity")?,
            zipcode_ids: row.try_get("zipcode_ids")?,
        })
    }
}

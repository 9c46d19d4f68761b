//! Vendor schedule reads.

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_scalar, query_as};
use uuid::Uuid;

use crate::domain::schedule::models::SlotWindowRow;

const GET_SLOT_WINDOWS_SQL: &str = include_str!("../sql/get_slot_windows.sql");
const COUNT_SLOT_BOOKINGS_SQL: &str = include_str!("../sql/count_slot_bookings.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgSchedulesRepository;

impl PgSchedulesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// A vendor's full weekly schedule.
    pub(crate) async fn slot_windows(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        vendor: Uuid,
    ) -> Result<Vec<SlotWindowRow>, sqlx::Error> {
        query_as::<Postgres, SlotWindowRow>(GET_SLOT_WINDOWS_SQL)
            .bind(vendor)
            .fetch_all(&mut **tx)
            .await
    }

    /// Non-cancelled bookings for a vendor's slot within an instant range.
    pub(crate) async fn booked_count(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        vendor: Uuid,
        timeslot: Uuid,
        range: (Timestamp, Timestamp),
    ) -> Result<i64, sqlx::Error> {
        query_scalar::<Postgres, i64>(COUNT_SLOT_BOOKINGS_SQL)
            .bind(vendor)
            .bind(timeslot)
            .bind(SqlxTimestamp::from(range.0))
            .bind(SqlxTimestamp::from(range.1))
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for SlotWindowRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            timeslot_id: row.try_get("timeslot_id")?,
            weekday: row.try_get("weekday")?,
            max_accept_order_limit: row.try_get("max_accept_order_limit")?,
            is_checked: row.try_get("is_checked")?,
        })
    }
}

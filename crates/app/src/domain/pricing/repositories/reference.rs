//! General-charge settings reads.

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::pricing::models::ChargeRow;

const GET_GENERAL_CHARGES_SQL: &str = include_str!("../sql/get_general_charges.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgReferenceRepository;

impl PgReferenceRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Every general-charge setting row.
    pub(crate) async fn general_charge_rows(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<ChargeRow>, sqlx::Error> {
        query_as::<Postgres, ChargeRow>(GET_GENERAL_CHARGES_SQL)
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for ChargeRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            key: row.try_get("key")?,
            order_type: row.try_get("order_type")?,
            amount: row.try_get("amount")?,
        })
    }
}

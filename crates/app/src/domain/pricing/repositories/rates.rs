//! Tier ladder reads.

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use uuid::Uuid;

use crate::domain::pricing::models::TierRow;

const GET_RATE_ROWS_FOR_CART_SQL: &str = include_str!("../sql/get_rate_rows_for_cart.sql");
const GET_RATE_ROWS_FOR_ORDERS_SQL: &str = include_str!("../sql/get_rate_rows_for_orders.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgRatesRepository;

impl PgRatesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Tier/price rows for every vendor-product a customer's active cart
    /// references.
    pub(crate) async fn rate_rows_for_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: Uuid,
    ) -> Result<Vec<TierRow>, sqlx::Error> {
        query_as::<Postgres, TierRow>(GET_RATE_ROWS_FOR_CART_SQL)
            .bind(customer)
            .fetch_all(&mut **tx)
            .await
    }

    /// Tier/price rows for every vendor-product the given orders reference.
    pub(crate) async fn rate_rows_for_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: &[Uuid],
    ) -> Result<Vec<TierRow>, sqlx::Error> {
        query_as::<Postgres, TierRow>(GET_RATE_ROWS_FOR_ORDERS_SQL)
            .bind(orders)
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for TierRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            vendor_id: row.try_get("vendor_id")?,
            product_id: row.try_get("product_id")?,
            order_type: row.try_get("order_type")?,
            qty_from: row.try_get("qty_from")?,
            qty_to: row.try_get("qty_to")?,
            position: row.try_get("position")?,
            category: row.try_get("category")?,
            cylinder_size: row.try_get("cylinder_size")?,
            price: row.try_get("price")?,
        })
    }
}

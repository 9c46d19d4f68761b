//! Cart and order line reads.

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use uuid::Uuid;

use crate::domain::pricing::models::{LineRow, PromoRow};

const GET_ACTIVE_CART_LINES_SQL: &str = include_str!("../sql/get_active_cart_lines.sql");
const GET_ORDER_LINES_SQL: &str = include_str!("../sql/get_order_lines.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgLinesRepository;

impl PgLinesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// A customer's active (non-deleted) cart lines, joined with the
    /// reference data they price against, in creation order.
    pub(crate) async fn active_cart_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: Uuid,
    ) -> Result<Vec<LineRow>, sqlx::Error> {
        query_as::<Postgres, LineRow>(GET_ACTIVE_CART_LINES_SQL)
            .bind(customer)
            .fetch_all(&mut **tx)
            .await
    }

    /// Specific persisted order lines, joined the same way.
    pub(crate) async fn order_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: &[Uuid],
    ) -> Result<Vec<LineRow>, sqlx::Error> {
        query_as::<Postgres, LineRow>(GET_ORDER_LINES_SQL)
            .bind(orders)
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for LineRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        // The promo join is optional; a present code implies the rest of
        // the promo columns are present.
        let promo = match row.try_get::<Option<String>, _>("promo_code")? {
            Some(code) => Some(PromoRow {
                code,
                discount: row.try_get("promo_discount")?,
                is_active: row.try_get("promo_is_active")?,
                starts_at: row.try_get::<SqlxTimestamp, _>("promo_starts_at")?.to_jiff(),
                ends_at: row.try_get::<SqlxTimestamp, _>("promo_ends_at")?.to_jiff(),
                category: row.try_get("promo_category")?,
            }),
            None => None,
        };

        Ok(Self {
            id: row.try_get("id")?,
            vendor_id: row.try_get("vendor_id")?,
            product_id: row.try_get("product_id")?,
            category: row.try_get("category")?,
            order_type: row.try_get("order_type")?,
            cylinder_size: row.try_get("cylinder_size")?,
            quantity: row.try_get("quantity")?,
            zipcode_id: row.try_get("zipcode_id")?,
            location_price: row.try_get("location_price")?,
            index_price: row.try_get("index_price")?,
            product_discount: row.try_get("product_discount")?,
            accessory_price: row.try_get("accessory_price")?,
            is_sales_tax: row.try_get("is_sales_tax")?,
            zip_sales_tax: row.try_get("zip_sales_tax")?,
            commission: row.try_get("commission")?,
            leakage_fee: row.try_get("leakage_fee")?,
            promo,
        })
    }
}

//! Pricing service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::Span;
use uuid::Uuid;

use flowline::pricing::{PricingEngine, PricingOptions};

use crate::{
    database::Db,
    domain::pricing::{
        errors::PricingServiceError,
        models::{
            ChargeRow, LineRow, PricedCart, TierRow, assemble_general_charges,
            assemble_rate_book, build_line_input,
        },
        repositories::{PgLinesRepository, PgRatesRepository, PgReferenceRepository},
    },
};

/// Options for one pricing request.
#[derive(Debug, Clone, Copy, Default)]
pub struct PricingRequest {
    /// Charge each distinct vendor's flat leakage fee.
    pub check_leakage: bool,
}

#[derive(Debug, Clone)]
pub struct PgPricingService {
    db: Db,
    lines: PgLinesRepository,
    rates: PgRatesRepository,
    reference: PgReferenceRepository,
}

impl PgPricingService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            lines: PgLinesRepository::new(),
            rates: PgRatesRepository::new(),
            reference: PgReferenceRepository::new(),
        }
    }

    /// Convert fetched rows into engine inputs and run the engine over the
    /// complete batch.
    fn run_engine(
        line_rows: &[LineRow],
        tier_rows: &[TierRow],
        charge_rows: &[ChargeRow],
        request: PricingRequest,
    ) -> Result<PricedCart, PricingServiceError> {
        let inputs = line_rows
            .iter()
            .map(build_line_input)
            .collect::<Result<Vec<_>, _>>()?;

        let rates = assemble_rate_book(tier_rows)?;
        let charges = assemble_general_charges(charge_rows);

        let engine = PricingEngine::new(charges);
        let batch = engine.price_batch(
            &inputs,
            &rates,
            &PricingOptions {
                check_leakage: request.check_leakage,
                now: Timestamp::now(),
            },
        )?;

        Ok(PricedCart {
            lines: batch.lines,
            totals: batch.totals,
        })
    }
}

#[async_trait]
impl PricingService for PgPricingService {
    #[tracing::instrument(
        name = "pricing.service.price_active_cart",
        skip(self),
        fields(customer = %customer, line_count = tracing::field::Empty),
        err
    )]
    async fn price_active_cart(
        &self,
        customer: Uuid,
        request: PricingRequest,
    ) -> Result<PricedCart, PricingServiceError> {
        let mut tx = self.db.begin().await.map_err(PricingServiceError::from)?;

        let line_rows = self.lines.active_cart_lines(&mut tx, customer).await?;
        let tier_rows = self.rates.rate_rows_for_cart(&mut tx, customer).await?;
        let charge_rows = self.reference.general_charge_rows(&mut tx).await?;

        tx.commit().await.map_err(PricingServiceError::from)?;

        Span::current().record("line_count", tracing::field::display(line_rows.len()));

        Self::run_engine(&line_rows, &tier_rows, &charge_rows, request)
    }

    #[tracing::instrument(
        name = "pricing.service.price_order_lines",
        skip(self, orders),
        fields(order_count = orders.len()),
        err
    )]
    async fn price_order_lines(
        &self,
        orders: &[Uuid],
        request: PricingRequest,
    ) -> Result<PricedCart, PricingServiceError> {
        let mut tx = self.db.begin().await.map_err(PricingServiceError::from)?;

        let line_rows = self.lines.order_lines(&mut tx, orders).await?;
        let tier_rows = self.rates.rate_rows_for_orders(&mut tx, orders).await?;
        let charge_rows = self.reference.general_charge_rows(&mut tx).await?;

        tx.commit().await.map_err(PricingServiceError::from)?;

        Self::run_engine(&line_rows, &tier_rows, &charge_rows, request)
    }
}

#[automock]
#[async_trait]
pub trait PricingService: Send + Sync {
    /// Price a customer's complete active cart. The whole cart is one
    /// batch: flat-fee apportionment depends on its line count.
    async fn price_active_cart(
        &self,
        customer: Uuid,
        request: PricingRequest,
    ) -> Result<PricedCart, PricingServiceError>;

    /// Re-price specific persisted order lines as one batch (e.g. for a
    /// refund preview).
    async fn price_order_lines(
        &self,
        orders: &[Uuid],
        request: PricingRequest,
    ) -> Result<PricedCart, PricingServiceError>;
}

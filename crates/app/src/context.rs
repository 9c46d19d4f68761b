//! App Context

use std::sync::Arc;

use jiff::tz::TimeZone;
use thiserror::Error;

use crate::{
    database::{self, Db},
    domain::{
        assignment::{DailyAssignment, PgAssignmentStore},
        pricing::{PgPricingService, PricingService},
        schedule::{PgScheduleService, ScheduleService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

/// Service handles built once at process start and passed by reference —
/// there are no process-global singletons.
#[derive(Clone)]
pub struct AppContext {
    pub pricing: Arc<dyn PricingService>,
    pub schedule: Arc<dyn ScheduleService>,
    pub assignment: DailyAssignment,
}

impl AppContext {
    /// Build application context from a database URL and the business time
    /// zone.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(url: &str, tz: TimeZone) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        let db = Db::new(pool);

        Ok(Self {
            pricing: Arc::new(PgPricingService::new(db.clone())),
            schedule: Arc::new(PgScheduleService::new(db.clone(), tz.clone())),
            assignment: DailyAssignment::new(Arc::new(PgAssignmentStore::new(db)), tz),
        })
    }
}

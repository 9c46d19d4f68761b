//! Schedule service errors.

use std::num::TryFromIntError;

use sqlx::Error;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum ScheduleServiceError {
    #[error("schedule row carries an unknown weekday code {0}")]
    UnknownWeekday(i16),

    #[error("schedule row carries an invalid order limit")]
    InvalidLimit(#[from] TryFromIntError),

    #[error("date out of range for the business time zone")]
    Time(#[from] jiff::Error),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for ScheduleServiceError {
    fn from(error: Error) -> Self {
        Self::Sql(error)
    }
}

//! Assignment service errors.

use std::num::TryFromIntError;

use sqlx::Error;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum AssignmentServiceError {
    #[error("row carries an unknown order-type code {0}")]
    UnknownOrderType(i16),

    #[error("row carries an invalid capacity or count")]
    InvalidCount(#[from] TryFromIntError),

    #[error("date out of range for the business time zone")]
    Time(#[from] jiff::Error),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for AssignmentServiceError {
    fn from(error: Error) -> Self {
        Self::Sql(error)
    }
}

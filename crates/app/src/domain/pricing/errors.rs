//! Pricing service errors.

use std::num::TryFromIntError;

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum PricingServiceError {
    #[error("line references an unknown order-type code {0}")]
    UnknownOrderType(i16),

    #[error("line references an unknown category code {0}")]
    UnknownCategory(i16),

    #[error("line carries an invalid quantity")]
    InvalidQuantity(#[from] TryFromIntError),

    #[error("pricing computation failed")]
    Pricing(#[from] flowline::pricing::PricingError),

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("not found")]
    NotFound,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for PricingServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            _ => Self::Sql(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_maps_to_not_found() {
        let mapped = PricingServiceError::from(Error::RowNotFound);

        assert!(matches!(mapped, PricingServiceError::NotFound));
    }

    #[test]
    fn negative_quantity_is_rejected() {
        let result = u32::try_from(-1_i32);

        assert!(result.is_err());
    }
}

//! Classification of Diesel and pool failures shared by the repositories.
//!
//! Each repository maps a [`StoreFailure`] onto its own port error, turning
//! the constraint violations it owns into domain-meaningful variants.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Exclusion constraint guarding against overlapping showtimes.
pub(crate) const SHOWTIME_OVERLAP_CONSTRAINT: &str = "showtimes_no_overlap";

/// Failure categories the repositories care about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StoreFailure {
    /// Connection could not be obtained or was lost.
    Connection(String),
    /// A unique constraint rejected the write.
    UniqueViolation { constraint: Option<String> },
    /// The showtime exclusion constraint rejected the write.
    OverlapViolation,
    /// Any other query failure.
    Query(String),
}

impl From<PoolError> for StoreFailure {
    fn from(error: PoolError) -> Self {
        match error {
            PoolError::Checkout { message } | PoolError::Build { message } => {
                Self::Connection(message)
            }
        }
    }
}

impl From<DieselError> for StoreFailure {
    fn from(error: DieselError) -> Self {
        match &error {
            DieselError::DatabaseError(kind, info) => debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            ),
            _ => debug!(
                error_type = %std::any::type_name_of_val(&error),
                "diesel operation failed"
            ),
        }

        match error {
            DieselError::DatabaseError(kind, info) => {
                let constraint = info.constraint_name().map(str::to_owned);
                if constraint.as_deref() == Some(SHOWTIME_OVERLAP_CONSTRAINT) {
                    return Self::OverlapViolation;
                }
                match kind {
                    DatabaseErrorKind::UniqueViolation => Self::UniqueViolation { constraint },
                    DatabaseErrorKind::ClosedConnection
                    | DatabaseErrorKind::UnableToSendCommand => {
                        Self::Connection("database connection error".to_owned())
                    }
                    _ => Self::Query(info.message().to_owned()),
                }
            }
            DieselError::NotFound => Self::Query("record not found".to_owned()),
            DieselError::QueryBuilderError(_) => Self::Query("database query error".to_owned()),
            other => Self::Query(other.to_string()),
        }
    }
}

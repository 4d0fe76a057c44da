//! # Query Errors
//!
//! Everything here except `Datastore` is a client-input error detected
//! during planning, before any storage I/O happens.

use thiserror::Error;

use crate::datastore::DatastoreError;
use crate::schema::SchemaError;

/// Result type for query planning and execution
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors raised by the filter parser, value coercion, and the planner
#[derive(Debug, Clone, Error)]
pub enum QueryError {
    /// Field alias missing from the field table
    #[error("Filter contains invalid field: {0}")]
    InvalidFilterField(String),

    /// Operator alias missing from the operator table
    #[error("Filter contains invalid operator: {0}")]
    InvalidFilterOperator(String),

    /// Malformed value for a date-typed property
    #[error("Invalid date format. Please use 'YYYY-MM-DD'")]
    InvalidDateFormat,

    /// Malformed value for a time-typed property
    #[error("Invalid time format. Please use 'HH:MM'")]
    InvalidTimeFormat,

    /// Malformed value for an integer-typed property
    #[error("Invalid numeric value: {0}")]
    InvalidNumber(String),

    /// Schema lookup miss; the alias tables should make this unreachable
    #[error(transparent)]
    UnknownProperty(#[from] SchemaError),

    /// Storage engine failure, propagated as-is
    #[error(transparent)]
    Datastore(#[from] DatastoreError),
}

impl QueryError {
    /// HTTP status this error maps to at the endpoint boundary
    pub fn status_code(&self) -> u16 {
        match self {
            QueryError::Datastore(err) if !err.is_client_error() => 500,
            _ => 400,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_bad_requests() {
        assert_eq!(QueryError::InvalidFilterField("X".into()).status_code(), 400);
        assert_eq!(QueryError::InvalidDateFormat.status_code(), 400);
        assert_eq!(
            QueryError::Datastore(DatastoreError::InvalidKey("x".into())).status_code(),
            400
        );
        assert_eq!(
            QueryError::Datastore(DatastoreError::LockPoisoned).status_code(),
            500
        );
    }
}

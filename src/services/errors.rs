//! # Service Errors

use thiserror::Error;

use crate::datastore::DatastoreError;
use crate::query::QueryError;
use crate::tasks::TaskError;

/// Result type for entity service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced by the entity services
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    /// Referenced entity does not exist
    #[error("{0}")]
    NotFound(String),

    /// Caller is authenticated but not allowed to do this
    #[error("{0}")]
    Forbidden(String),

    /// Request conflicts with current state (double registration, sold out)
    #[error("{0}")]
    Conflict(String),

    /// Request is malformed
    #[error("{0}")]
    BadRequest(String),

    /// Filter parsing, coercion, or planning failure
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Storage failure
    #[error(transparent)]
    Datastore(#[from] DatastoreError),

    /// Side-effect worker failure surfaced through a synchronous trigger
    #[error(transparent)]
    Task(#[from] TaskError),
}

impl ServiceError {
    /// HTTP status this error maps to
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::NotFound(_) => 404,
            ServiceError::Forbidden(_) => 403,
            ServiceError::Conflict(_) => 409,
            ServiceError::BadRequest(_) => 400,
            ServiceError::Query(err) => err.status_code(),
            ServiceError::Datastore(err) => {
                if err.is_client_error() {
                    400
                } else {
                    500
                }
            }
            ServiceError::Task(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ServiceError::NotFound("x".into()).status_code(), 404);
        assert_eq!(ServiceError::Forbidden("x".into()).status_code(), 403);
        assert_eq!(ServiceError::Conflict("x".into()).status_code(), 409);
        assert_eq!(ServiceError::BadRequest("x".into()).status_code(), 400);
        assert_eq!(
            ServiceError::Query(QueryError::InvalidDateFormat).status_code(),
            400
        );
        assert_eq!(
            ServiceError::Datastore(DatastoreError::LockPoisoned).status_code(),
            500
        );
    }
}

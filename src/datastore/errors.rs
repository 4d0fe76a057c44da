//! # Datastore Errors
//!
//! Error types for the document store.

use thiserror::Error;

/// Result type for datastore operations
pub type DatastoreResult<T> = Result<T, DatastoreError>;

/// Errors raised by the document store
#[derive(Debug, Clone, Error)]
pub enum DatastoreError {
    /// A websafe key string could not be decoded
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// A query violates an engine constraint
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// A stored document is missing or mistypes a required property
    #[error("Malformed '{kind}' document: {detail}")]
    MalformedDocument {
        /// Entity kind of the offending document
        kind: String,
        /// What was missing or mistyped
        detail: String,
    },

    /// The store's lock was poisoned by a panicking writer
    #[error("Datastore lock poisoned")]
    LockPoisoned,
}

impl DatastoreError {
    /// Shorthand for a malformed-document error
    pub fn malformed(kind: impl Into<String>, detail: impl Into<String>) -> Self {
        DatastoreError::MalformedDocument {
            kind: kind.into(),
            detail: detail.into(),
        }
    }

    /// True when the error is caused by client input rather than state
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DatastoreError::InvalidKey(_) | DatastoreError::InvalidQuery(_)
        )
    }
}

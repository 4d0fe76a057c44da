//! # Task Errors

use thiserror::Error;

use crate::datastore::DatastoreError;

/// Result type for side-effect task execution
pub type TaskResult<T> = Result<T, TaskError>;

/// Errors raised while executing a background task
#[derive(Debug, Clone, Error)]
pub enum TaskError {
    /// Email could not be built or delivered
    #[error("Email delivery failed: {0}")]
    Email(String),

    /// Datastore failure while computing a task result
    #[error(transparent)]
    Datastore(#[from] DatastoreError),
}

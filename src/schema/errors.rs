//! # Schema Errors

use thiserror::Error;

/// Result type for schema lookups
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors raised by entity schema lookups
#[derive(Debug, Clone, Error)]
pub enum SchemaError {
    /// The named property is not declared on the entity kind
    #[error("Unknown property '{property}' on kind '{kind}'")]
    UnknownProperty {
        kind: &'static str,
        property: String,
    },
}

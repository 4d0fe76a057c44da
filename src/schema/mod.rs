//! # Entity Schemas
//!
//! Static property-name to semantic-type catalogs, one per entity kind.

pub mod errors;
pub mod types;

pub use errors::{SchemaError, SchemaResult};
pub use types::{EntitySchema, PropertyType, CONFERENCE, PROFILE, SESSION};

//! # Document Datastore
//!
//! In-memory document store with ancestor keys, per-kind id allocation,
//! write-buffered transactions, and native query evaluation.
//!
//! The engine supports at most one inequality property per query, with the
//! primary sort tied to it; the `query` module's planner translates richer
//! filter sets onto that surface.

pub mod errors;
pub mod key;
pub mod query;
pub mod store;
pub mod value;

pub use errors::{DatastoreError, DatastoreResult};
pub use key::{Key, KeyId};
pub use query::{CompareOp, Predicate, Query};
pub use store::{Datastore, Record, Transaction};
pub use value::{Document, IndexValue, PropertyValue};

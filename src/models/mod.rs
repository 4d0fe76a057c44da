//! # Entities and Wire Forms
//!
//! Persisted entity structs with document conversion, plus the serde forms
//! they cross the wire as. Dates travel as `YYYY-MM-DD` strings and times as
//! `HH:MM`; documents hold them natively.

pub mod conference;
pub mod forms;
pub mod profile;
pub mod session;

pub use conference::{Conference, ConferenceForm, ConferenceForms};
pub use forms::{BooleanMessage, ConferenceQueryForms, SessionQueryForms, StringMessage};
pub use profile::{Profile, ProfileForm, ProfileMiniForm, TeeShirtSize};
pub use session::{Session, SessionForm, SessionForms};

use crate::datastore::{DatastoreError, DatastoreResult, Document};

/// Reads a required string property
pub(crate) fn require_str(document: &Document, kind: &str, name: &str) -> DatastoreResult<String> {
    document
        .get(name)
        .and_then(|value| value.as_str())
        .map(str::to_string)
        .ok_or_else(|| DatastoreError::malformed(kind, format!("missing string '{}'", name)))
}

/// Reads a required integer property
pub(crate) fn require_int(document: &Document, kind: &str, name: &str) -> DatastoreResult<i64> {
    document
        .get(name)
        .and_then(|value| value.as_int())
        .ok_or_else(|| DatastoreError::malformed(kind, format!("missing integer '{}'", name)))
}

/// Reads an optional string property
pub(crate) fn optional_str(document: &Document, name: &str) -> Option<String> {
    document
        .get(name)
        .and_then(|value| value.as_str())
        .map(str::to_string)
}

/// Reads a repeated string property, empty when unset
pub(crate) fn str_list(document: &Document, name: &str) -> Vec<String> {
    document
        .get(name)
        .and_then(|value| value.as_str_list())
        .map(<[String]>::to_vec)
        .unwrap_or_default()
}

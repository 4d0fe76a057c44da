//! # Shared Form Messages

use serde::{Deserialize, Serialize};

use crate::query::FilterSpec;

/// Single outbound string value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringMessage {
    pub data: String,
}

impl StringMessage {
    pub fn new(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }
}

/// Single outbound boolean value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BooleanMessage {
    pub data: bool,
}

impl BooleanMessage {
    pub fn new(data: bool) -> Self {
        Self { data }
    }
}

/// Inbound conference query: a list of filter triples
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConferenceQueryForms {
    pub filters: Vec<FilterSpec>,
}

/// Inbound session query: a list of filter triples
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionQueryForms {
    pub filters: Vec<FilterSpec>,
}

//! # Session Entity
//!
//! A session is a child of its conference key. Date and start time are
//! required and stored natively; duration is minutes.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::{optional_str, require_int, require_str};
use crate::datastore::{DatastoreError, DatastoreResult, Document, Key, PropertyValue, Record};

/// Persisted session entity
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub key: Key,
    pub name: String,
    pub highlights: Option<String>,
    pub speaker: String,
    pub duration: i64,
    pub type_of_session: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
}

impl Session {
    pub const KIND: &'static str = "Session";

    /// Converts to the stored document representation
    pub fn to_document(&self) -> Document {
        let mut document = Document::new();
        document.insert("name".into(), PropertyValue::Str(self.name.clone()));
        if let Some(highlights) = &self.highlights {
            document.insert("highlights".into(), PropertyValue::Str(highlights.clone()));
        }
        document.insert("speaker".into(), PropertyValue::Str(self.speaker.clone()));
        document.insert("duration".into(), PropertyValue::Int(self.duration));
        document.insert(
            "typeOfSession".into(),
            PropertyValue::Str(self.type_of_session.clone()),
        );
        document.insert("date".into(), PropertyValue::Date(self.date));
        document.insert("startTime".into(), PropertyValue::Time(self.start_time));
        document
    }

    /// Rebuilds the entity from a fetched record
    pub fn from_record(record: &Record) -> DatastoreResult<Self> {
        let document = &record.properties;
        Ok(Self {
            key: record.key.clone(),
            name: require_str(document, Self::KIND, "name")?,
            highlights: optional_str(document, "highlights"),
            speaker: require_str(document, Self::KIND, "speaker")?,
            duration: require_int(document, Self::KIND, "duration")?,
            type_of_session: require_str(document, Self::KIND, "typeOfSession")?,
            date: document
                .get("date")
                .and_then(|v| v.as_date())
                .ok_or_else(|| DatastoreError::malformed(Self::KIND, "missing date 'date'"))?,
            start_time: document
                .get("startTime")
                .and_then(|v| v.as_time())
                .ok_or_else(|| {
                    DatastoreError::malformed(Self::KIND, "missing time 'startTime'")
                })?,
        })
    }

    /// Outbound form
    pub fn to_form(&self) -> SessionForm {
        SessionForm {
            websafe_key: Some(self.key.websafe()),
            name: Some(self.name.clone()),
            highlights: self.highlights.clone(),
            speaker: Some(self.speaker.clone()),
            duration: Some(self.duration),
            type_of_session: Some(self.type_of_session.clone()),
            date: Some(self.date.format("%Y-%m-%d").to_string()),
            start_time: Some(self.start_time.format("%H:%M").to_string()),
        }
    }
}

/// Session wire form; also the inbound create payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub websafe_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlights: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_of_session: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
}

/// Multiple outbound session forms
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionForms {
    pub items: Vec<SessionForm>,
}

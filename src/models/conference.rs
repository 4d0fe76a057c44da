//! # Conference Entity
//!
//! A conference is a child of its organizer's profile key; the parent is
//! fixed at creation and never reassigned. `month` is derived from the
//! start date (0 when unset) so it can be filtered as an integer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{optional_str, require_int, require_str, str_list};
use crate::datastore::{DatastoreResult, Document, Key, PropertyValue, Record};

/// Persisted conference entity
#[derive(Debug, Clone, PartialEq)]
pub struct Conference {
    pub key: Key,
    pub name: String,
    pub description: Option<String>,
    pub organizer_user_id: String,
    pub topics: Vec<String>,
    pub city: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub month: i64,
    pub end_date: Option<NaiveDate>,
    pub max_attendees: i64,
    pub seats_available: i64,
}

impl Conference {
    pub const KIND: &'static str = "Conference";

    /// Converts to the stored document representation
    pub fn to_document(&self) -> Document {
        let mut document = Document::new();
        document.insert("name".into(), PropertyValue::Str(self.name.clone()));
        if let Some(description) = &self.description {
            document.insert("description".into(), PropertyValue::Str(description.clone()));
        }
        document.insert(
            "organizerUserId".into(),
            PropertyValue::Str(self.organizer_user_id.clone()),
        );
        document.insert("topics".into(), PropertyValue::StrList(self.topics.clone()));
        if let Some(city) = &self.city {
            document.insert("city".into(), PropertyValue::Str(city.clone()));
        }
        if let Some(start_date) = self.start_date {
            document.insert("startDate".into(), PropertyValue::Date(start_date));
        }
        document.insert("month".into(), PropertyValue::Int(self.month));
        if let Some(end_date) = self.end_date {
            document.insert("endDate".into(), PropertyValue::Date(end_date));
        }
        document.insert("maxAttendees".into(), PropertyValue::Int(self.max_attendees));
        document.insert(
            "seatsAvailable".into(),
            PropertyValue::Int(self.seats_available),
        );
        document
    }

    /// Rebuilds the entity from a fetched record
    pub fn from_record(record: &Record) -> DatastoreResult<Self> {
        let document = &record.properties;
        Ok(Self {
            key: record.key.clone(),
            name: require_str(document, Self::KIND, "name")?,
            description: optional_str(document, "description"),
            organizer_user_id: require_str(document, Self::KIND, "organizerUserId")?,
            topics: str_list(document, "topics"),
            city: optional_str(document, "city"),
            start_date: document.get("startDate").and_then(|v| v.as_date()),
            month: require_int(document, Self::KIND, "month")?,
            end_date: document.get("endDate").and_then(|v| v.as_date()),
            max_attendees: require_int(document, Self::KIND, "maxAttendees")?,
            seats_available: require_int(document, Self::KIND, "seatsAvailable")?,
        })
    }

    /// Outbound form, with the organizer's display name resolved by the
    /// caller
    pub fn to_form(&self, organizer_display_name: &str) -> ConferenceForm {
        ConferenceForm {
            name: Some(self.name.clone()),
            description: self.description.clone(),
            organizer_user_id: Some(self.organizer_user_id.clone()),
            topics: self.topics.clone(),
            city: self.city.clone(),
            start_date: self
                .start_date
                .map(|d| d.format("%Y-%m-%d").to_string()),
            month: Some(self.month),
            max_attendees: Some(self.max_attendees),
            seats_available: Some(self.seats_available),
            end_date: self.end_date.map(|d| d.format("%Y-%m-%d").to_string()),
            websafe_key: Some(self.key.websafe()),
            organizer_display_name: Some(organizer_display_name.to_string()),
        }
    }
}

/// Conference wire form; also the inbound create/update payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConferenceForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organizer_user_id: Option<String>,
    pub topics: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_attendees: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seats_available: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub websafe_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organizer_display_name: Option<String>,
}

/// Multiple outbound conference forms
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConferenceForms {
    pub items: Vec<ConferenceForm>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Conference {
        Conference {
            key: Key::with_id(Conference::KIND, 1)
                .under(Key::with_name("Profile", "test1@test.com")),
            name: "room #1".into(),
            description: None,
            organizer_user_id: "test1@test.com".into(),
            topics: vec!["programming".into(), "web design".into()],
            city: Some("London".into()),
            start_date: NaiveDate::from_ymd_opt(2015, 6, 18),
            month: 6,
            end_date: NaiveDate::from_ymd_opt(2015, 6, 23),
            max_attendees: 100,
            seats_available: 100,
        }
    }

    #[test]
    fn test_document_round_trip() {
        let conference = sample();
        let record = Record {
            key: conference.key.clone(),
            properties: conference.to_document(),
        };
        assert_eq!(Conference::from_record(&record).unwrap(), conference);
    }

    #[test]
    fn test_unset_optionals_not_stored() {
        let mut conference = sample();
        conference.city = None;
        conference.start_date = None;
        conference.end_date = None;
        let document = conference.to_document();
        assert!(!document.contains_key("city"));
        assert!(!document.contains_key("startDate"));
        assert!(!document.contains_key("endDate"));
    }

    #[test]
    fn test_form_formats_dates() {
        let form = sample().to_form("Luiz");
        assert_eq!(form.start_date.as_deref(), Some("2015-06-18"));
        assert_eq!(form.end_date.as_deref(), Some("2015-06-23"));
        assert_eq!(form.organizer_display_name.as_deref(), Some("Luiz"));
        assert!(form.websafe_key.is_some());
    }

    #[test]
    fn test_form_json_is_camel_case() {
        let json = serde_json::to_value(sample().to_form("Luiz")).unwrap();
        assert!(json.get("maxAttendees").is_some());
        assert!(json.get("organizerUserId").is_some());
        assert!(json.get("max_attendees").is_none());
    }
}

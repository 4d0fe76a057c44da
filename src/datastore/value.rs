//! # Property Values
//!
//! Native typed values held by document properties, plus the base (index)
//! representation the store uses for comparison and sorting. A `Date`
//! compares as a midnight timestamp and a `Time` as an epoch-anchored
//! timestamp, which is why bound values for native range predicates must be
//! coerced to the base representation before they reach the store.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// Native value of a document property
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// UTF-8 string
    Str(String),
    /// 64-bit signed integer
    Int(i64),
    /// Calendar date
    Date(NaiveDate),
    /// Time of day
    Time(NaiveTime),
    /// Full timestamp
    DateTime(NaiveDateTime),
    /// Repeated string property
    StrList(Vec<String>),
}

/// A stored document: property name to native value
pub type Document = BTreeMap<String, PropertyValue>;

/// Base representation used for index comparison and sorting.
///
/// Variant order fixes a deterministic cross-type ordering; same-type
/// comparisons are the only ones the planner ever produces.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum IndexValue {
    Int(i64),
    Timestamp(NaiveDateTime),
    Str(String),
}

/// Date every time-of-day value is anchored to in the index
pub fn epoch_date() -> NaiveDate {
    DateTime::<Utc>::UNIX_EPOCH.date_naive()
}

impl PropertyValue {
    /// Projects this value into the index representation.
    ///
    /// A repeated property projects through its smallest element; equality
    /// matching against a list is handled separately by the query evaluator.
    pub fn index_value(&self) -> IndexValue {
        match self {
            PropertyValue::Str(s) => IndexValue::Str(s.clone()),
            PropertyValue::Int(n) => IndexValue::Int(*n),
            PropertyValue::Date(d) => IndexValue::Timestamp(d.and_time(NaiveTime::MIN)),
            PropertyValue::Time(t) => IndexValue::Timestamp(epoch_date().and_time(*t)),
            PropertyValue::DateTime(dt) => IndexValue::Timestamp(*dt),
            PropertyValue::StrList(items) => IndexValue::Str(
                items.iter().min().cloned().unwrap_or_default(),
            ),
        }
    }

    /// String value, if this is a string property
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Integer value, if this is an integer property
    pub fn as_int(&self) -> Option<i64> {
        match self {
            PropertyValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Date value, if this is a date property
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            PropertyValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Time value, if this is a time property
    pub fn as_time(&self) -> Option<NaiveTime> {
        match self {
            PropertyValue::Time(t) => Some(*t),
            _ => None,
        }
    }

    /// List value, if this is a repeated string property
    pub fn as_str_list(&self) -> Option<&[String]> {
        match self {
            PropertyValue::StrList(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Str(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Str(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Int(value)
    }
}

impl From<NaiveDate> for PropertyValue {
    fn from(value: NaiveDate) -> Self {
        PropertyValue::Date(value)
    }
}

impl From<NaiveTime> for PropertyValue {
    fn from(value: NaiveTime) -> Self {
        PropertyValue::Time(value)
    }
}

impl From<Vec<String>> for PropertyValue {
    fn from(value: Vec<String>) -> Self {
        PropertyValue::StrList(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_projects_to_midnight() {
        let d = NaiveDate::from_ymd_opt(2015, 6, 18).unwrap();
        let projected = PropertyValue::Date(d).index_value();
        assert_eq!(projected, IndexValue::Timestamp(d.and_time(NaiveTime::MIN)));
    }

    #[test]
    fn test_time_anchored_to_epoch() {
        let t = NaiveTime::from_hms_opt(19, 30, 0).unwrap();
        let projected = PropertyValue::Time(t).index_value();
        assert_eq!(projected, IndexValue::Timestamp(epoch_date().and_time(t)));
    }

    #[test]
    fn test_time_ordering_through_index() {
        let early = PropertyValue::Time(NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        let late = PropertyValue::Time(NaiveTime::from_hms_opt(19, 0, 0).unwrap());
        assert!(early.index_value() < late.index_value());
    }

    #[test]
    fn test_list_projects_smallest_element() {
        let v = PropertyValue::StrList(vec!["web".into(), "misc".into()]);
        assert_eq!(v.index_value(), IndexValue::Str("misc".into()));
    }

    #[test]
    fn test_date_comparable_with_base_datetime_bound() {
        // A native Date and a Base-coerced DateTime bound meet in the index.
        let d = NaiveDate::from_ymd_opt(2015, 6, 18).unwrap();
        let stored = PropertyValue::Date(d);
        let bound = PropertyValue::DateTime(d.and_time(NaiveTime::MIN));
        assert_eq!(stored.index_value(), bound.index_value());
    }
}

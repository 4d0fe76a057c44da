//! # Value Coercion
//!
//! Maps a raw string filter value to the comparison type of its target
//! property. Two representations exist because the store indexes date and
//! time properties as timestamps while documents hold them natively: a bound
//! headed for the store must be coerced with `Base`, and a bound compared
//! in-process against fetched documents must be coerced with `Native`.
//! Mixing them up silently produces wrong comparison results, which is why
//! the two call sites in the planner request different representations.

use chrono::{NaiveDate, NaiveTime};

use super::errors::{QueryError, QueryResult};
use crate::datastore::value::{epoch_date, PropertyValue};
use crate::schema::PropertyType;

/// Target representation for a coerced value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Representation {
    /// Storage index representation (dates and times become timestamps)
    Base,
    /// The type the document property actually holds
    Native,
}

/// Coerces a raw string to the comparison type of a property.
pub fn coerce(
    property_type: PropertyType,
    raw: &str,
    representation: Representation,
) -> QueryResult<PropertyValue> {
    match property_type {
        PropertyType::Date => {
            let date = parse_date(raw)?;
            Ok(match representation {
                Representation::Base => PropertyValue::DateTime(date.and_time(NaiveTime::MIN)),
                Representation::Native => PropertyValue::Date(date),
            })
        }
        PropertyType::Time => {
            let time = parse_time(raw)?;
            Ok(match representation {
                Representation::Base => PropertyValue::DateTime(epoch_date().and_time(time)),
                Representation::Native => PropertyValue::Time(time),
            })
        }
        PropertyType::Int => raw
            .trim()
            .parse::<i64>()
            .map(PropertyValue::Int)
            .map_err(|_| QueryError::InvalidNumber(raw.to_string())),
        PropertyType::Str | PropertyType::StrList => Ok(PropertyValue::Str(raw.to_string())),
    }
}

/// Parses the first ten characters of `raw` as a `YYYY-MM-DD` date.
pub fn parse_date(raw: &str) -> QueryResult<NaiveDate> {
    let prefix = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").map_err(|_| QueryError::InvalidDateFormat)
}

/// Parses the first five characters of `raw` as an `HH:MM` time of day.
pub fn parse_time(raw: &str) -> QueryResult<NaiveTime> {
    let prefix = raw.get(..5).unwrap_or(raw);
    NaiveTime::parse_from_str(prefix, "%H:%M").map_err(|_| QueryError::InvalidTimeFormat)
}

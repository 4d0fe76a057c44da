//! # Filter Parsing
//!
//! Validates caller-supplied `(field, operator, value)` triples against a
//! field-alias table and the operator table, classifies each as equality or
//! inequality, and splits them into the two views the planner needs: every
//! inequality in submission order, and the storage-bound list carrying all
//! equalities plus only the first inequality. The split is the documented
//! workaround for the store's one-inequality-per-query limitation; there is
//! no cap on how many inequalities end up in the residual view.

use serde::{Deserialize, Serialize};

use super::errors::{QueryError, QueryResult};
use crate::datastore::CompareOp;

/// A raw caller-supplied filter triple
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSpec {
    pub field: String,
    pub operator: String,
    pub value: String,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            field: String::new(),
            operator: String::new(),
            value: String::new(),
        }
    }
}

impl FilterSpec {
    pub fn new(
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }
}

/// Comparison operator, resolved from its caller-facing alias
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
    Ne,
}

impl Operator {
    /// Resolves an operator alias (`EQ`, `GT`, `GTEQ`, `LT`, `LTEQ`, `NE`)
    pub fn from_alias(alias: &str) -> Option<Self> {
        match alias {
            "EQ" => Some(Operator::Eq),
            "GT" => Some(Operator::Gt),
            "GTEQ" => Some(Operator::Gte),
            "LT" => Some(Operator::Lt),
            "LTEQ" => Some(Operator::Lte),
            "NE" => Some(Operator::Ne),
            _ => None,
        }
    }

    /// Comparison symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Ne => "!=",
        }
    }

    /// Every operator except `=` is an inequality
    pub fn is_inequality(&self) -> bool {
        !matches!(self, Operator::Eq)
    }

    /// The store-level operator this resolves to
    pub fn compare_op(&self) -> CompareOp {
        match self {
            Operator::Eq => CompareOp::Eq,
            Operator::Gt => CompareOp::Gt,
            Operator::Gte => CompareOp::Gte,
            Operator::Lt => CompareOp::Lt,
            Operator::Lte => CompareOp::Lte,
            Operator::Ne => CompareOp::Ne,
        }
    }
}

/// Field-alias table for one entity kind
#[derive(Debug, Clone, Copy)]
pub struct FieldTable {
    entries: &'static [(&'static str, &'static str)],
}

impl FieldTable {
    pub const fn new(entries: &'static [(&'static str, &'static str)]) -> Self {
        Self { entries }
    }

    /// Resolves a caller-facing field alias to its model property name
    pub fn resolve(&self, alias: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(a, _)| *a == alias)
            .map(|(_, property)| *property)
    }
}

/// Conference query field aliases
pub const CONFERENCE_FIELDS: FieldTable = FieldTable::new(&[
    ("CITY", "city"),
    ("TOPIC", "topics"),
    ("MONTH", "month"),
    ("MAX_ATTENDEES", "maxAttendees"),
]);

/// Session query field aliases
pub const SESSION_FIELDS: FieldTable = FieldTable::new(&[
    ("NAME", "name"),
    ("DURATION", "duration"),
    ("TYPE_OF_SESSION", "typeOfSession"),
    ("DATE", "date"),
    ("START_TIME", "startTime"),
    ("SPEAKER", "speaker"),
]);

/// A validated filter: resolved property, resolved operator, raw value.
///
/// The value stays a string here; coercion happens during planning, where
/// the target representation (base vs native) is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFilter {
    pub property: &'static str,
    pub operator: Operator,
    pub value: String,
}

/// The two views produced by [`split`]
#[derive(Debug, Clone, Default)]
pub struct SplitFilters {
    /// Every inequality filter, in submission order
    pub inequalities: Vec<ParsedFilter>,
    /// Equality filters plus only the first inequality; safe to hand to the
    /// storage engine as-is
    pub storage_bound: Vec<ParsedFilter>,
}

/// Parses and splits caller filters.
///
/// Fails on the first unknown field or operator alias; nothing is handed to
/// the store on failure.
pub fn split(specs: &[FilterSpec], fields: &FieldTable) -> QueryResult<SplitFilters> {
    let mut result = SplitFilters::default();
    for spec in specs {
        let property = fields
            .resolve(&spec.field)
            .ok_or_else(|| QueryError::InvalidFilterField(spec.field.clone()))?;
        let operator = Operator::from_alias(&spec.operator)
            .ok_or_else(|| QueryError::InvalidFilterOperator(spec.operator.clone()))?;
        let parsed = ParsedFilter {
            property,
            operator,
            value: spec.value.clone(),
        };

        if operator.is_inequality() {
            // Only the first inequality goes to the store; the rest are
            // evaluated in-process after the fetch.
            if result.inequalities.is_empty() {
                result.storage_bound.push(parsed.clone());
            }
            result.inequalities.push(parsed);
        } else {
            result.storage_bound.push(parsed);
        }
    }
    Ok(result)
}

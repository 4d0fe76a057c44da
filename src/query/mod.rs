//! # Filtered Queries
//!
//! The filter-translation core shared by the conference and session search
//! endpoints: alias parsing, value coercion, and the planner that splits an
//! arbitrary filter conjunction between one native range query and an
//! in-process residual pass.

pub mod coerce;
pub mod errors;
pub mod filter;
pub mod planner;

pub use coerce::{coerce, parse_date, parse_time, Representation};
pub use errors::{QueryError, QueryResult};
pub use filter::{
    FieldTable, FilterSpec, Operator, ParsedFilter, SplitFilters, CONFERENCE_FIELDS,
    SESSION_FIELDS,
};
pub use planner::{compare, execute, plan, QueryPlan, ResidualPredicate};

//! # Query Planner and Executor
//!
//! Translates an arbitrary conjunction of caller filters onto a storage
//! engine that accepts at most one inequality property per query.
//!
//! The plan is fully determined before any storage I/O: filters are parsed
//! and split, the effective sort order is fixed (the delegated inequality's
//! field must lead it), storage-bound values are coerced to the base
//! representation and residual values to the native one. Execution then runs
//! the native query; with zero or one inequality the native result is the
//! final answer, otherwise the remaining inequalities run as an in-process
//! AND conjunction over the fetched records, as a stable filter that
//! preserves storage order.

use std::cmp::Ordering;

use super::coerce::{coerce, Representation};
use super::errors::QueryResult;
use super::filter::{split, FieldTable, FilterSpec, Operator};
use crate::datastore::{Datastore, Document, Predicate, PropertyValue, Query, Record};
use crate::schema::EntitySchema;

/// An inequality evaluated in-process against fetched records
#[derive(Debug, Clone, PartialEq)]
pub struct ResidualPredicate {
    pub property: &'static str,
    pub operator: Operator,
    pub value: PropertyValue,
}

impl ResidualPredicate {
    /// True when the document satisfies this predicate. A missing property
    /// never matches, mirroring index semantics.
    pub fn matches(&self, document: &Document) -> bool {
        document
            .get(self.property)
            .map_or(false, |actual| compare(actual, self.operator, &self.value))
    }
}

/// An immutable query plan; built once per request, never persisted
#[derive(Debug, Clone)]
pub struct QueryPlan {
    /// The native query delegated to the store (equalities plus at most one
    /// inequality, sort order led by the delegated field)
    pub storage_query: Query,
    /// Remaining inequalities in submission order, natively coerced
    pub residual: Vec<ResidualPredicate>,
}

/// Builds the query plan. Every alias-resolution and coercion failure
/// surfaces here, before any storage I/O.
pub fn plan(
    schema: &EntitySchema,
    specs: &[FilterSpec],
    fields: &FieldTable,
    preferred_sort: &[&str],
) -> QueryResult<QueryPlan> {
    let filters = split(specs, fields)?;

    // The delegated inequality's field must be the primary sort key;
    // caller-preferred fields follow, never duplicating one already used.
    let mut query = Query::kind(schema.kind());
    let mut used: Vec<&str> = Vec::new();
    if let Some(first) = filters.inequalities.first() {
        used.push(first.property);
        query = query.order(first.property);
    }
    for field in preferred_sort {
        if !used.contains(field) {
            used.push(field);
            query = query.order(*field);
        }
    }

    for parsed in &filters.storage_bound {
        let property_type = schema.property_type(parsed.property)?;
        let value = coerce(property_type, &parsed.value, Representation::Base)?;
        query = query.filter(Predicate::new(
            parsed.property,
            parsed.operator.compare_op(),
            value,
        ));
    }

    let mut residual = Vec::new();
    if filters.inequalities.len() > 1 {
        for parsed in &filters.inequalities[1..] {
            let property_type = schema.property_type(parsed.property)?;
            let value = coerce(property_type, &parsed.value, Representation::Native)?;
            residual.push(ResidualPredicate {
                property: parsed.property,
                operator: parsed.operator,
                value,
            });
        }
    }

    Ok(QueryPlan {
        storage_query: query,
        residual,
    })
}

/// Plans and executes a filtered query, returning matching records in
/// storage order.
///
/// The full candidate set is materialized before the residual pass; fine
/// while entity counts stay small, and the known scalability ceiling of
/// this design.
pub fn execute(
    store: &Datastore,
    schema: &EntitySchema,
    specs: &[FilterSpec],
    fields: &FieldTable,
    preferred_sort: &[&str],
) -> QueryResult<Vec<Record>> {
    let plan = plan(schema, specs, fields, preferred_sort)?;
    let mut records = store.run(&plan.storage_query)?;
    if plan.residual.is_empty() {
        // Zero or one inequality: the native result is the answer.
        return Ok(records);
    }
    // Stable filter; predicates run in submission order and short-circuit.
    records.retain(|record| {
        plan.residual
            .iter()
            .all(|predicate| predicate.matches(&record.properties))
    });
    Ok(records)
}

/// Compares a native document value against a natively coerced bound.
///
/// One comparator for all operators instead of a closure per filter; a
/// repeated property matches when any element does, and mismatched types
/// never match.
pub fn compare(actual: &PropertyValue, operator: Operator, bound: &PropertyValue) -> bool {
    if let PropertyValue::StrList(items) = actual {
        return items
            .iter()
            .any(|item| compare(&PropertyValue::Str(item.clone()), operator, bound));
    }
    match native_cmp(actual, bound) {
        Some(ordering) => match operator {
            Operator::Eq => ordering == Ordering::Equal,
            Operator::Gt => ordering == Ordering::Greater,
            Operator::Gte => ordering != Ordering::Less,
            Operator::Lt => ordering == Ordering::Less,
            Operator::Lte => ordering != Ordering::Greater,
            Operator::Ne => ordering != Ordering::Equal,
        },
        None => false,
    }
}

fn native_cmp(actual: &PropertyValue, bound: &PropertyValue) -> Option<Ordering> {
    match (actual, bound) {
        (PropertyValue::Str(a), PropertyValue::Str(b)) => Some(a.cmp(b)),
        (PropertyValue::Int(a), PropertyValue::Int(b)) => Some(a.cmp(b)),
        (PropertyValue::Date(a), PropertyValue::Date(b)) => Some(a.cmp(b)),
        (PropertyValue::Time(a), PropertyValue::Time(b)) => Some(a.cmp(b)),
        (PropertyValue::DateTime(a), PropertyValue::DateTime(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

//! # Document Store
//!
//! In-memory store: per-kind key-ordered maps, monotonic id allocation,
//! write-buffered transactions, and native query execution. Query results
//! come back sorted by the requested sort fields with ties left in key
//! order; that sequence is the "storage order" callers may rely on.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use super::errors::{DatastoreError, DatastoreResult};
use super::key::Key;
use super::query::{CompareOp, Predicate, Query};
use super::value::{Document, IndexValue, PropertyValue};

/// A fetched entity: key plus its document
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub key: Key,
    pub properties: Document,
}

#[derive(Default)]
struct Inner {
    entities: HashMap<String, BTreeMap<Key, Document>>,
    counters: HashMap<String, i64>,
}

/// The in-memory document store
#[derive(Default)]
pub struct Datastore {
    inner: RwLock<Inner>,
}

impl Datastore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates the next integer id for `kind`. Ids are monotonic per kind
    /// and never reused.
    pub fn allocate_id(&self, kind: &str) -> DatastoreResult<i64> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| DatastoreError::LockPoisoned)?;
        let counter = inner.counters.entry(kind.to_string()).or_insert(0);
        *counter += 1;
        Ok(*counter)
    }

    /// Inserts or replaces the document stored under `key`
    pub fn put(&self, key: Key, document: Document) -> DatastoreResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| DatastoreError::LockPoisoned)?;
        inner
            .entities
            .entry(key.kind().to_string())
            .or_default()
            .insert(key, document);
        Ok(())
    }

    /// Fetches the document stored under `key`, if any
    pub fn get(&self, key: &Key) -> DatastoreResult<Option<Document>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| DatastoreError::LockPoisoned)?;
        Ok(inner
            .entities
            .get(key.kind())
            .and_then(|kind_map| kind_map.get(key))
            .cloned())
    }

    /// Runs a single logical update: reads inside the closure see pending
    /// writes, and writes are applied only when the closure returns Ok.
    pub fn transaction<T, E, F>(&self, f: F) -> Result<T, E>
    where
        E: From<DatastoreError>,
        F: FnOnce(&mut Transaction<'_>) -> Result<T, E>,
    {
        let mut guard = self
            .inner
            .write()
            .map_err(|_| E::from(DatastoreError::LockPoisoned))?;
        let mut txn = Transaction {
            inner: &mut *guard,
            pending: Vec::new(),
        };
        let result = f(&mut txn);
        let Transaction { pending, .. } = txn;
        match result {
            Ok(value) => {
                for (key, document) in pending {
                    let kind = key.kind().to_string();
                    guard.entities.entry(kind).or_default().insert(key, document);
                }
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }

    /// Executes a native query, returning matching records in storage order.
    ///
    /// Records missing a filtered or sorted property are excluded, matching
    /// index semantics: an unset property is simply not in the index.
    pub fn run(&self, query: &Query) -> DatastoreResult<Vec<Record>> {
        query.validate()?;
        let inner = self
            .inner
            .read()
            .map_err(|_| DatastoreError::LockPoisoned)?;
        let Some(kind_map) = inner.entities.get(query.target_kind()) else {
            return Ok(Vec::new());
        };

        let mut records: Vec<Record> = kind_map
            .iter()
            .filter(|(key, _)| {
                query
                    .ancestor_key()
                    .map_or(true, |ancestor| key.has_ancestor(ancestor))
            })
            .filter(|(_, document)| {
                query
                    .predicates()
                    .iter()
                    .all(|predicate| matches(document, predicate))
            })
            .filter(|(_, document)| {
                query
                    .sort_fields()
                    .iter()
                    .all(|field| document.contains_key(field))
            })
            .map(|(key, document)| Record {
                key: key.clone(),
                properties: document.clone(),
            })
            .collect();

        // Stable sort keeps key order for ties.
        records.sort_by(|a, b| {
            for field in query.sort_fields() {
                if let (Some(x), Some(y)) = (a.properties.get(field), b.properties.get(field)) {
                    let ordering = x.index_value().cmp(&y.index_value());
                    if ordering != Ordering::Equal {
                        return ordering;
                    }
                }
            }
            Ordering::Equal
        });

        Ok(records)
    }
}

/// Write buffer handed to `Datastore::transaction` closures
pub struct Transaction<'a> {
    inner: &'a mut Inner,
    pending: Vec<(Key, Document)>,
}

impl Transaction<'_> {
    /// Reads a document, seeing this transaction's own pending writes first
    pub fn get(&self, key: &Key) -> Option<Document> {
        if let Some((_, document)) = self.pending.iter().rev().find(|(k, _)| k == key) {
            return Some(document.clone());
        }
        self.inner
            .entities
            .get(key.kind())
            .and_then(|kind_map| kind_map.get(key))
            .cloned()
    }

    /// Buffers a write; applied only if the transaction closure returns Ok
    pub fn put(&mut self, key: Key, document: Document) {
        self.pending.push((key, document));
    }
}

/// Evaluates one predicate against a document through the index projection.
/// Equality on a repeated property matches any element; so does a range.
fn matches(document: &Document, predicate: &Predicate) -> bool {
    let Some(actual) = document.get(&predicate.property) else {
        return false;
    };
    let bound = predicate.value.index_value();
    match actual {
        PropertyValue::StrList(items) => items
            .iter()
            .any(|item| compare_index(&IndexValue::Str(item.clone()), predicate.op, &bound)),
        scalar => compare_index(&scalar.index_value(), predicate.op, &bound),
    }
}

fn compare_index(actual: &IndexValue, op: CompareOp, bound: &IndexValue) -> bool {
    match op {
        CompareOp::Eq => actual == bound,
        CompareOp::Gt => actual > bound,
        CompareOp::Gte => actual >= bound,
        CompareOp::Lt => actual < bound,
        CompareOp::Lte => actual <= bound,
        CompareOp::Ne => actual != bound,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn doc(pairs: Vec<(&str, PropertyValue)>) -> Document {
        pairs
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect()
    }

    fn seed_conferences(store: &Datastore) -> Vec<Key> {
        let cities = [("room #1", "London", 100), ("room #2", "Baton Rouge", 5)];
        let mut keys = Vec::new();
        for (name, city, seats) in cities {
            let id = store.allocate_id("Conference").unwrap();
            let key = Key::with_id("Conference", id)
                .under(Key::with_name("Profile", "test1@test.com"));
            store
                .put(
                    key.clone(),
                    doc(vec![
                        ("name", name.into()),
                        ("city", city.into()),
                        ("seatsAvailable", (seats as i64).into()),
                    ]),
                )
                .unwrap();
            keys.push(key);
        }
        keys
    }

    #[test]
    fn test_allocate_id_monotonic() {
        let store = Datastore::new();
        let a = store.allocate_id("Conference").unwrap();
        let b = store.allocate_id("Conference").unwrap();
        let other = store.allocate_id("Session").unwrap();
        assert!(b > a);
        assert_eq!(other, 1);
    }

    #[test]
    fn test_put_get_round_trip() {
        let store = Datastore::new();
        let key = Key::with_name("Profile", "test1@test.com");
        let document = doc(vec![("displayName", "Luiz".into())]);
        store.put(key.clone(), document.clone()).unwrap();
        assert_eq!(store.get(&key).unwrap(), Some(document));
    }

    #[test]
    fn test_equality_query() {
        let store = Datastore::new();
        seed_conferences(&store);
        let results = store
            .run(&Query::kind("Conference").filter(Predicate::eq("city", "London")))
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(
            results[0].properties.get("name"),
            Some(&PropertyValue::Str("room #1".into()))
        );
    }

    #[test]
    fn test_ancestor_query() {
        let store = Datastore::new();
        let parent = Key::with_name("Profile", "test1@test.com");
        seed_conferences(&store);
        let other = Key::with_id("Conference", 99)
            .under(Key::with_name("Profile", "test2@test.com"));
        store.put(other, doc(vec![("name", "room #4".into())])).unwrap();

        let results = store
            .run(&Query::kind("Conference").ancestor(parent))
            .unwrap();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_interval_on_one_property() {
        let store = Datastore::new();
        seed_conferences(&store);
        let results = store
            .run(
                &Query::kind("Conference")
                    .filter(Predicate::new("seatsAvailable", CompareOp::Gt, 0.into()))
                    .filter(Predicate::new("seatsAvailable", CompareOp::Lte, 5.into())),
            )
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(
            results[0].properties.get("name"),
            Some(&PropertyValue::Str("room #2".into()))
        );
    }

    #[test]
    fn test_sort_order_and_key_tiebreak() {
        let store = Datastore::new();
        for (name, month) in [("c", 6), ("a", 6), ("b", 3)] {
            let id = store.allocate_id("Conference").unwrap();
            store
                .put(
                    Key::with_id("Conference", id),
                    doc(vec![("name", name.into()), ("month", (month as i64).into())]),
                )
                .unwrap();
        }
        let results = store
            .run(&Query::kind("Conference").order("month").order("name"))
            .unwrap();
        let names: Vec<_> = results
            .iter()
            .map(|r| r.properties.get("name").unwrap().as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_missing_sorted_property_excluded() {
        let store = Datastore::new();
        store
            .put(
                Key::with_id("Conference", 1),
                doc(vec![("name", "has month".into()), ("month", 5.into())]),
            )
            .unwrap();
        store
            .put(
                Key::with_id("Conference", 2),
                doc(vec![("name", "no month".into())]),
            )
            .unwrap();
        let results = store.run(&Query::kind("Conference").order("month")).unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_repeated_property_equality_matches_any_element() {
        let store = Datastore::new();
        store
            .put(
                Key::with_id("Conference", 1),
                doc(vec![(
                    "topics",
                    vec!["programming".to_string(), "web design".to_string()].into(),
                )]),
            )
            .unwrap();
        let hit = store
            .run(&Query::kind("Conference").filter(Predicate::eq("topics", "web design")))
            .unwrap();
        assert_eq!(hit.len(), 1);
        let miss = store
            .run(&Query::kind("Conference").filter(Predicate::eq("topics", "cooking")))
            .unwrap();
        assert!(miss.is_empty());
    }

    #[test]
    fn test_date_range_through_base_projection() {
        let store = Datastore::new();
        let date = NaiveDate::from_ymd_opt(2015, 7, 1).unwrap();
        store
            .put(
                Key::with_id("Session", 1),
                doc(vec![("name", "PHP".into()), ("date", date.into())]),
            )
            .unwrap();
        let bound = PropertyValue::DateTime(
            NaiveDate::from_ymd_opt(2015, 6, 1)
                .unwrap()
                .and_time(chrono::NaiveTime::MIN),
        );
        let results = store
            .run(
                &Query::kind("Session")
                    .filter(Predicate::new("date", CompareOp::Gt, bound))
                    .order("date"),
            )
            .unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_transaction_applies_on_ok() {
        let store = Datastore::new();
        let key = Key::with_name("Profile", "a@b.c");
        store
            .transaction::<_, DatastoreError, _>(|txn| {
                txn.put(key.clone(), doc(vec![("displayName", "A".into())]));
                // Reads observe the pending write.
                assert!(txn.get(&key).is_some());
                Ok(())
            })
            .unwrap();
        assert!(store.get(&key).unwrap().is_some());
    }

    #[test]
    fn test_transaction_discards_on_err() {
        let store = Datastore::new();
        let key = Key::with_name("Profile", "a@b.c");
        let result: Result<(), DatastoreError> = store.transaction(|txn| {
            txn.put(key.clone(), doc(vec![("displayName", "A".into())]));
            Err(DatastoreError::InvalidQuery("abort".into()))
        });
        assert!(result.is_err());
        assert!(store.get(&key).unwrap().is_none());
    }
}

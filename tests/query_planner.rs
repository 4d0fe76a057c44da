//! Query Planner Integration Tests
//!
//! Exercises the filter-translation core against seeded datastores:
//! single-inequality passthrough, residual correctness against brute-force
//! evaluation, delegation determinism, alias validation, coercion round
//! trips, and the end-to-end search flows.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveTime};
use confero::datastore::{Datastore, Key, PropertyValue, Query, Record};
use confero::models::{Conference, Profile, Session};
use confero::query::{
    coerce, compare, execute, parse_date, parse_time, plan, FilterSpec, Operator, QueryError,
    Representation, CONFERENCE_FIELDS, SESSION_FIELDS,
};
use confero::schema::{self, PropertyType};

// =============================================================================
// Fixtures
// =============================================================================

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn seed_conference(
    store: &Datastore,
    name: &str,
    organizer: &str,
    city: &str,
    topics: &[&str],
    month: i64,
    max_attendees: i64,
) -> Key {
    let id = store.allocate_id(Conference::KIND).unwrap();
    let key = Key::with_id(Conference::KIND, id).under(Profile::key_for(organizer));
    let conference = Conference {
        key: key.clone(),
        name: name.into(),
        description: None,
        organizer_user_id: organizer.into(),
        topics: topics.iter().map(|t| t.to_string()).collect(),
        city: Some(city.into()),
        start_date: Some(date(2015, month as u32, 18)),
        month,
        end_date: None,
        max_attendees,
        seats_available: max_attendees,
    };
    store.put(key.clone(), conference.to_document()).unwrap();
    key
}

/// Four conferences patterned after the original fixtures
fn conference_store() -> Datastore {
    let store = Datastore::new();
    seed_conference(
        &store,
        "room #1",
        "test1@test.com",
        "London",
        &["programming", "web design", "web performance"],
        6,
        100,
    );
    seed_conference(
        &store,
        "room #2",
        "test1@test.com",
        "Baton Rouge",
        &["web performance"],
        7,
        5,
    );
    seed_conference(
        &store,
        "room #3",
        "test1@test.com",
        "Paris",
        &["programming", "misc"],
        7,
        6,
    );
    seed_conference(
        &store,
        "room #4",
        "test2@test.com",
        "Tokyo",
        &["misc"],
        10,
        6,
    );
    store
}

fn seed_session(
    store: &Datastore,
    conference: &Key,
    name: &str,
    speaker: &str,
    type_of_session: &str,
    day: u32,
    start: (u32, u32),
    duration: i64,
) {
    let id = store.allocate_id(Session::KIND).unwrap();
    let session = Session {
        key: Key::with_id(Session::KIND, id).under(conference.clone()),
        name: name.into(),
        highlights: None,
        speaker: speaker.into(),
        duration,
        type_of_session: type_of_session.into(),
        date: date(2015, 6, day),
        start_time: time(start.0, start.1),
    };
    store.put(session.key.clone(), session.to_document()).unwrap();
}

/// Eight sessions: two workshops, six others with distinct start times
fn session_store() -> Datastore {
    let store = Datastore::new();
    let conference = seed_conference(
        &store,
        "room #1",
        "test1@test.com",
        "London",
        &["programming"],
        6,
        100,
    );
    seed_session(&store, &conference, "PHP", "superman", "educational", 18, (9, 0), 60);
    seed_session(&store, &conference, "Python", "flash", "educational", 18, (10, 0), 60);
    seed_session(&store, &conference, "Raw Metal", "batman", "workshop", 18, (11, 0), 45);
    seed_session(&store, &conference, "Intro to Poker", "joker", "fun", 19, (18, 30), 60);
    seed_session(&store, &conference, "Google App Engine", "Bill Gates", "informative", 19, (19, 0), 90);
    seed_session(&store, &conference, "Scaling Up", "Bill Gates", "informative", 20, (20, 0), 30);
    seed_session(&store, &conference, "Soldering", "batman", "workshop", 20, (14, 0), 120);
    seed_session(&store, &conference, "Closing Keynote", "flash", "keynote", 21, (17, 0), 30);
    store
}

fn names(records: &[Record]) -> Vec<String> {
    records
        .iter()
        .map(|record| {
            record
                .properties
                .get("name")
                .and_then(|value| value.as_str())
                .unwrap()
                .to_string()
        })
        .collect()
}

/// Brute-force evaluation: every filter applied natively over the full
/// record set, no delegation. The two-stage plan must agree with this.
fn brute_force(store: &Datastore, kind: &str, specs: &[FilterSpec]) -> BTreeSet<Key> {
    let schema = if kind == "Session" {
        &schema::SESSION
    } else {
        &schema::CONFERENCE
    };
    let fields = if kind == "Session" {
        &SESSION_FIELDS
    } else {
        &CONFERENCE_FIELDS
    };
    let all = store.run(&Query::kind(kind)).unwrap();
    all.into_iter()
        .filter(|record| {
            specs.iter().all(|spec| {
                let property = fields.resolve(&spec.field).unwrap();
                let operator = Operator::from_alias(&spec.operator).unwrap();
                let bound = coerce(
                    schema.property_type(property).unwrap(),
                    &spec.value,
                    Representation::Native,
                )
                .unwrap();
                record
                    .properties
                    .get(property)
                    .map(|actual| compare(actual, operator, &bound))
                    .unwrap_or(false)
            })
        })
        .map(|record| record.key)
        .collect()
}

fn result_keys(records: &[Record]) -> BTreeSet<Key> {
    records.iter().map(|record| record.key.clone()).collect()
}

// =============================================================================
// Single-inequality passthrough
// =============================================================================

/// With one inequality, the planner's output is exactly the native result.
#[test]
fn test_single_inequality_matches_native_query() {
    let store = session_store();
    let specs = vec![FilterSpec::new("DURATION", "GTEQ", "60")];
    let planned = execute(&store, &schema::SESSION, &specs, &SESSION_FIELDS, &["name"]).unwrap();

    let built = plan(&schema::SESSION, &specs, &SESSION_FIELDS, &["name"]).unwrap();
    assert!(built.residual.is_empty());
    let native = store.run(&built.storage_query).unwrap();
    assert_eq!(planned, native);
}

/// Equality-only filter sets are also pure passthrough.
#[test]
fn test_equality_only_matches_native_query() {
    let store = session_store();
    let specs = vec![FilterSpec::new("SPEAKER", "EQ", "Bill Gates")];
    let records = execute(&store, &schema::SESSION, &specs, &SESSION_FIELDS, &["name"]).unwrap();
    assert_eq!(
        names(&records),
        vec!["Google App Engine".to_string(), "Scaling Up".to_string()]
    );
}

// =============================================================================
// Residual correctness vs brute force
// =============================================================================

#[test]
fn test_two_inequalities_agree_with_brute_force() {
    let store = session_store();
    let specs = vec![
        FilterSpec::new("DURATION", "GT", "30"),
        FilterSpec::new("START_TIME", "LT", "12:00"),
    ];
    let planned = execute(&store, &schema::SESSION, &specs, &SESSION_FIELDS, &[]).unwrap();
    assert_eq!(result_keys(&planned), brute_force(&store, "Session", &specs));
    assert!(!planned.is_empty());
}

#[test]
fn test_mixed_filters_agree_with_brute_force() {
    let store = session_store();
    let combos: Vec<Vec<FilterSpec>> = vec![
        vec![
            FilterSpec::new("TYPE_OF_SESSION", "EQ", "informative"),
            FilterSpec::new("DURATION", "LT", "95"),
            FilterSpec::new("START_TIME", "GTEQ", "19:00"),
        ],
        vec![
            FilterSpec::new("DATE", "GTEQ", "2015-06-19"),
            FilterSpec::new("DATE", "LTEQ", "2015-06-20"),
            FilterSpec::new("NAME", "NE", "Soldering"),
        ],
        vec![
            FilterSpec::new("SPEAKER", "NE", "batman"),
            FilterSpec::new("DURATION", "GTEQ", "45"),
            FilterSpec::new("START_TIME", "GT", "09:00"),
            FilterSpec::new("NAME", "LT", "Scaling Up"),
        ],
    ];
    for specs in combos {
        let planned = execute(&store, &schema::SESSION, &specs, &SESSION_FIELDS, &[]).unwrap();
        assert_eq!(
            result_keys(&planned),
            brute_force(&store, "Session", &specs),
            "plan disagrees with brute force for {:?}",
            specs
        );
    }
}

#[test]
fn test_conference_inequalities_agree_with_brute_force() {
    let store = conference_store();
    let specs = vec![
        FilterSpec::new("MONTH", "GT", "6"),
        FilterSpec::new("MAX_ATTENDEES", "LT", "10"),
    ];
    let planned = execute(
        &store,
        &schema::CONFERENCE,
        &specs,
        &CONFERENCE_FIELDS,
        &["name"],
    )
    .unwrap();
    assert_eq!(
        result_keys(&planned),
        brute_force(&store, "Conference", &specs)
    );
    // Sorted by the delegated month field, then name.
    assert_eq!(
        names(&planned),
        vec![
            "room #2".to_string(),
            "room #3".to_string(),
            "room #4".to_string()
        ]
    );
}

/// Two inequalities on the same field are two independent residuals.
#[test]
fn test_duplicate_field_inequalities() {
    let store = session_store();
    let specs = vec![
        FilterSpec::new("DURATION", "GT", "30"),
        FilterSpec::new("DURATION", "LT", "90"),
    ];
    let planned = execute(&store, &schema::SESSION, &specs, &SESSION_FIELDS, &[]).unwrap();
    assert_eq!(result_keys(&planned), brute_force(&store, "Session", &specs));
    for record in &planned {
        let duration = record.properties.get("duration").unwrap().as_int().unwrap();
        assert!(duration > 30 && duration < 90);
    }
}

// =============================================================================
// Delegation determinism
// =============================================================================

#[test]
fn test_same_submission_order_same_delegation() {
    let specs = vec![
        FilterSpec::new("START_TIME", "LT", "19:00"),
        FilterSpec::new("DURATION", "GT", "30"),
        FilterSpec::new("NAME", "NE", "PHP"),
    ];
    for _ in 0..10 {
        let built = plan(&schema::SESSION, &specs, &SESSION_FIELDS, &[]).unwrap();
        assert_eq!(
            built.storage_query.inequality_property(),
            Some("startTime"),
            "first-submitted inequality must win the delegated slot"
        );
        let residual: Vec<_> = built.residual.iter().map(|p| p.property).collect();
        assert_eq!(residual, vec!["duration", "name"]);
    }
}

/// Reordering the submission changes the delegation with it.
#[test]
fn test_delegation_follows_submission_order() {
    let forward = vec![
        FilterSpec::new("DURATION", "GT", "30"),
        FilterSpec::new("START_TIME", "LT", "19:00"),
    ];
    let reversed: Vec<_> = forward.iter().cloned().rev().collect();

    let built = plan(&schema::SESSION, &forward, &SESSION_FIELDS, &[]).unwrap();
    assert_eq!(built.storage_query.inequality_property(), Some("duration"));

    let built = plan(&schema::SESSION, &reversed, &SESSION_FIELDS, &[]).unwrap();
    assert_eq!(built.storage_query.inequality_property(), Some("startTime"));
}

// =============================================================================
// Alias validation
// =============================================================================

#[test]
fn test_unknown_field_alias_rejected() {
    let store = session_store();
    let specs = vec![FilterSpec::new("ROOM", "EQ", "101")];
    let err = execute(&store, &schema::SESSION, &specs, &SESSION_FIELDS, &[]).unwrap_err();
    assert!(matches!(err, QueryError::InvalidFilterField(field) if field == "ROOM"));
}

#[test]
fn test_unknown_operator_alias_rejected() {
    let store = session_store();
    let specs = vec![FilterSpec::new("NAME", "CONTAINS", "App")];
    let err = execute(&store, &schema::SESSION, &specs, &SESSION_FIELDS, &[]).unwrap_err();
    assert!(matches!(err, QueryError::InvalidFilterOperator(op) if op == "CONTAINS"));
}

/// A bad alias anywhere fails planning even when earlier filters are fine.
#[test]
fn test_late_invalid_alias_still_fails_whole_query() {
    let specs = vec![
        FilterSpec::new("NAME", "EQ", "PHP"),
        FilterSpec::new("NAME", "LIKE", "P%"),
    ];
    assert!(plan(&schema::SESSION, &specs, &SESSION_FIELDS, &[]).is_err());
}

// =============================================================================
// Coercion round trips
// =============================================================================

#[test]
fn test_date_round_trip_base_to_native_to_display() {
    let raw = "2015-06-18";
    let base = coerce(PropertyType::Date, raw, Representation::Base).unwrap();
    let PropertyValue::DateTime(dt) = base else {
        panic!("base representation of a date must be a timestamp");
    };
    let native = PropertyValue::Date(dt.date());
    assert_eq!(native.as_date().unwrap().format("%Y-%m-%d").to_string(), raw);
    assert_eq!(parse_date(raw).unwrap(), dt.date());
}

#[test]
fn test_time_round_trip_base_to_native_to_display() {
    let raw = "19:00";
    let base = coerce(PropertyType::Time, raw, Representation::Base).unwrap();
    let PropertyValue::DateTime(dt) = base else {
        panic!("base representation of a time must be a timestamp");
    };
    let native = PropertyValue::Time(dt.time());
    assert_eq!(native.as_time().unwrap().format("%H:%M").to_string(), raw);
    assert_eq!(parse_time(raw).unwrap(), dt.time());
}

// =============================================================================
// Search flows
// =============================================================================

/// Non-workshop sessions before 19:00, in storage order.
#[test]
fn test_non_workshop_sessions_before_seven_pm() {
    let store = session_store();
    let specs = vec![
        FilterSpec::new("TYPE_OF_SESSION", "NE", "workshop"),
        FilterSpec::new("START_TIME", "LT", "19:00"),
    ];
    let records = execute(&store, &schema::SESSION, &specs, &SESSION_FIELDS, &[]).unwrap();

    for record in &records {
        let type_of_session = record
            .properties
            .get("typeOfSession")
            .and_then(|v| v.as_str())
            .unwrap();
        let start_time = record
            .properties
            .get("startTime")
            .and_then(|v| v.as_time())
            .unwrap();
        assert_ne!(type_of_session, "workshop");
        assert!(start_time < time(19, 0));
    }

    // Storage order: sorted by the delegated field (typeOfSession), ties in
    // key order.
    assert_eq!(
        names(&records),
        vec![
            "PHP".to_string(),
            "Python".to_string(),
            "Intro to Poker".to_string(),
            "Closing Keynote".to_string(),
        ]
    );
}

/// A single equality filter returns exactly the matching record.
#[test]
fn test_city_equality_single_hit() {
    let store = conference_store();
    let specs = vec![FilterSpec::new("CITY", "EQ", "London")];
    let records = execute(
        &store,
        &schema::CONFERENCE,
        &specs,
        &CONFERENCE_FIELDS,
        &["name"],
    )
    .unwrap();
    assert_eq!(names(&records), vec!["room #1".to_string()]);
}

/// An empty filter list returns everything in default name order.
#[test]
fn test_empty_filters_default_order() {
    let store = conference_store();
    let records = execute(
        &store,
        &schema::CONFERENCE,
        &[],
        &CONFERENCE_FIELDS,
        &["name"],
    )
    .unwrap();
    assert_eq!(
        names(&records),
        vec![
            "room #1".to_string(),
            "room #2".to_string(),
            "room #3".to_string(),
            "room #4".to_string(),
        ]
    );
}

/// Nine chained inequalities leave exactly one survivor.
#[test]
fn test_nine_inequalities_single_survivor() {
    let store = session_store();
    // Only "Intro to Poker" (fun, 18:30 on 06-19, 60 min) satisfies all
    // nine predicates.
    let specs = vec![
        FilterSpec::new("DURATION", "GT", "45"),
        FilterSpec::new("DURATION", "LT", "90"),
        FilterSpec::new("START_TIME", "GT", "10:30"),
        FilterSpec::new("START_TIME", "LT", "19:00"),
        FilterSpec::new("DATE", "GTEQ", "2015-06-19"),
        FilterSpec::new("DATE", "LTEQ", "2015-06-20"),
        FilterSpec::new("TYPE_OF_SESSION", "NE", "workshop"),
        FilterSpec::new("NAME", "GT", "A"),
        FilterSpec::new("NAME", "LT", "Maze"),
    ];
    let records = execute(&store, &schema::SESSION, &specs, &SESSION_FIELDS, &[]).unwrap();
    assert_eq!(names(&records), vec!["Intro to Poker".to_string()]);
    assert_eq!(result_keys(&records), brute_force(&store, "Session", &specs));
}

//! # Conference Service
//!
//! Conference CRUD, filtered search through the query planner, and the
//! transactional registration path that keeps seat accounting consistent
//! with profile registration lists.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Datelike;

use super::errors::{ServiceError, ServiceResult};
use super::profile::ProfileService;
use crate::auth::AuthUser;
use crate::cache::{MemoryCache, ANNOUNCEMENTS_KEY};
use crate::datastore::{Datastore, Key, Query, Record};
use crate::models::{Conference, ConferenceForm, Profile};
use crate::query::{execute, parse_date, FilterSpec, CONFERENCE_FIELDS};
use crate::schema;
use crate::tasks::{cache_announcement, Task, TaskQueue};

/// Default values applied to missing create fields
const DEFAULT_CITY: &str = "Default City";
const DEFAULT_TOPICS: [&str; 2] = ["Default", "Topic"];

/// Conference operations
pub struct ConferenceService {
    store: Arc<Datastore>,
    cache: Arc<MemoryCache>,
    queue: TaskQueue,
}

impl ConferenceService {
    pub fn new(store: Arc<Datastore>, cache: Arc<MemoryCache>, queue: TaskQueue) -> Self {
        Self {
            store,
            cache,
            queue,
        }
    }

    fn profiles(&self) -> ProfileService {
        ProfileService::new(self.store.clone())
    }

    /// Creates a conference under the caller's profile key and enqueues the
    /// confirmation email
    pub fn create(&self, user: &AuthUser, form: &ConferenceForm) -> ServiceResult<ConferenceForm> {
        let name = form
            .name
            .as_ref()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| {
                ServiceError::BadRequest("Conference 'name' field required".to_string())
            })?;

        let profile = self.profiles().get_or_create(user)?;

        let start_date = form
            .start_date
            .as_deref()
            .map(parse_date)
            .transpose()?;
        let end_date = form.end_date.as_deref().map(parse_date).transpose()?;
        let month = start_date.map_or(0, |date| i64::from(date.month()));

        let max_attendees = form.max_attendees.unwrap_or(0);
        // Every seat is open on creation.
        let seats_available = if max_attendees > 0 { max_attendees } else { 0 };

        let city = form
            .city
            .clone()
            .filter(|city| !city.is_empty())
            .unwrap_or_else(|| DEFAULT_CITY.to_string());
        let topics = if form.topics.is_empty() {
            DEFAULT_TOPICS.iter().map(|t| t.to_string()).collect()
        } else {
            form.topics.clone()
        };

        let id = self.store.allocate_id(Conference::KIND)?;
        let key = Key::with_id(Conference::KIND, id).under(profile.key.clone());
        let conference = Conference {
            key: key.clone(),
            name: name.clone(),
            description: form.description.clone(),
            organizer_user_id: user.user_id.clone(),
            topics,
            city: Some(city),
            start_date,
            month,
            end_date,
            max_attendees,
            seats_available,
        };
        self.store.put(key, conference.to_document())?;

        let created = conference.to_form(&profile.display_name);
        self.queue.enqueue(Task::SendConfirmationEmail {
            email: user.email.clone(),
            conference_info: serde_json::to_string(&created).unwrap_or_default(),
        });
        Ok(created)
    }

    /// Updates the provided fields on an existing conference; owner only
    pub fn update(
        &self,
        user: &AuthUser,
        websafe_key: &str,
        form: &ConferenceForm,
    ) -> ServiceResult<ConferenceForm> {
        let key = Key::from_websafe(websafe_key)?;
        let properties = self.store.get(&key)?.ok_or_else(|| {
            ServiceError::NotFound(format!("No conference found with key: {}", websafe_key))
        })?;
        let mut conference = Conference::from_record(&Record { key, properties })?;

        if user.user_id != conference.organizer_user_id {
            return Err(ServiceError::Forbidden(
                "Only the owner can update the conference.".to_string(),
            ));
        }

        if let Some(name) = form.name.as_ref().filter(|name| !name.is_empty()) {
            conference.name = name.clone();
        }
        if let Some(description) = &form.description {
            conference.description = Some(description.clone());
        }
        if !form.topics.is_empty() {
            conference.topics = form.topics.clone();
        }
        if let Some(city) = &form.city {
            conference.city = Some(city.clone());
        }
        if let Some(raw) = form.start_date.as_deref() {
            let date = parse_date(raw)?;
            conference.start_date = Some(date);
            conference.month = i64::from(date.month());
        }
        if let Some(raw) = form.end_date.as_deref() {
            conference.end_date = Some(parse_date(raw)?);
        }
        if let Some(max_attendees) = form.max_attendees {
            conference.max_attendees = max_attendees;
        }
        if let Some(seats_available) = form.seats_available {
            conference.seats_available = seats_available;
        }

        self.store
            .put(conference.key.clone(), conference.to_document())?;
        let profile = self.profiles().get_or_create(user)?;
        Ok(conference.to_form(&profile.display_name))
    }

    /// Fetches one conference by its websafe key
    pub fn get(&self, websafe_key: &str) -> ServiceResult<ConferenceForm> {
        let key = Key::from_websafe(websafe_key)?;
        let properties = self.store.get(&key)?.ok_or_else(|| {
            ServiceError::NotFound(format!("No conference found with key: {}", websafe_key))
        })?;
        let conference = Conference::from_record(&Record { key, properties })?;
        let display_name = self.organizer_names([&conference])?;
        Ok(conference.to_form(
            display_name
                .get(conference.organizer_user_id.as_str())
                .map(String::as_str)
                .unwrap_or(""),
        ))
    }

    /// Conferences created by the caller (ancestor query on their profile)
    pub fn created_by(&self, user: &AuthUser) -> ServiceResult<Vec<ConferenceForm>> {
        let profile = self.profiles().get_or_create(user)?;
        let records = self.store.run(
            &Query::kind(Conference::KIND).ancestor(Profile::key_for(&user.user_id)),
        )?;
        records
            .iter()
            .map(|record| {
                Ok(Conference::from_record(record)?.to_form(&profile.display_name))
            })
            .collect()
    }

    /// Filtered conference search through the query planner
    pub fn query(&self, filters: &[FilterSpec]) -> ServiceResult<Vec<ConferenceForm>> {
        let records = execute(
            &self.store,
            &schema::CONFERENCE,
            filters,
            &CONFERENCE_FIELDS,
            &["name"],
        )?;
        let conferences = records
            .iter()
            .map(Conference::from_record)
            .collect::<Result<Vec<_>, _>>()?;
        let names = self.organizer_names(conferences.iter())?;
        Ok(conferences
            .iter()
            .map(|conference| {
                conference.to_form(
                    names
                        .get(conference.organizer_user_id.as_str())
                        .map(String::as_str)
                        .unwrap_or(""),
                )
            })
            .collect())
    }

    /// Registers the caller for a conference, taking one seat
    pub fn register(&self, user: &AuthUser, websafe_key: &str) -> ServiceResult<bool> {
        self.profiles().get_or_create(user)?;
        let conference_key = Key::from_websafe(websafe_key)?;
        let profile_key = Profile::key_for(&user.user_id);

        self.store.transaction(|txn| {
            let properties = txn.get(&conference_key).ok_or_else(|| {
                ServiceError::NotFound(format!("No conference found with key: {}", websafe_key))
            })?;
            let mut conference = Conference::from_record(&Record {
                key: conference_key.clone(),
                properties,
            })?;
            let properties = txn.get(&profile_key).ok_or_else(|| {
                ServiceError::NotFound(format!("No profile found for: {}", user.user_id))
            })?;
            let mut profile = Profile::from_record(&Record {
                key: profile_key.clone(),
                properties,
            })?;

            if profile
                .conference_keys_to_attend
                .iter()
                .any(|k| k == websafe_key)
            {
                return Err(ServiceError::Conflict(
                    "You have already registered for this conference".to_string(),
                ));
            }
            if conference.seats_available <= 0 {
                return Err(ServiceError::Conflict(
                    "There are no seats available.".to_string(),
                ));
            }

            profile.conference_keys_to_attend.push(websafe_key.to_string());
            conference.seats_available -= 1;
            txn.put(profile_key.clone(), profile.to_document());
            txn.put(conference_key.clone(), conference.to_document());
            Ok(true)
        })
    }

    /// Unregisters the caller, returning the seat. False when the caller was
    /// never registered.
    pub fn unregister(&self, user: &AuthUser, websafe_key: &str) -> ServiceResult<bool> {
        self.profiles().get_or_create(user)?;
        let conference_key = Key::from_websafe(websafe_key)?;
        let profile_key = Profile::key_for(&user.user_id);

        self.store.transaction(|txn| {
            let properties = txn.get(&conference_key).ok_or_else(|| {
                ServiceError::NotFound(format!("No conference found with key: {}", websafe_key))
            })?;
            let mut conference = Conference::from_record(&Record {
                key: conference_key.clone(),
                properties,
            })?;
            let properties = txn.get(&profile_key).ok_or_else(|| {
                ServiceError::NotFound(format!("No profile found for: {}", user.user_id))
            })?;
            let mut profile = Profile::from_record(&Record {
                key: profile_key.clone(),
                properties,
            })?;

            let before = profile.conference_keys_to_attend.len();
            profile.conference_keys_to_attend.retain(|k| k != websafe_key);
            if profile.conference_keys_to_attend.len() == before {
                return Ok(false);
            }

            conference.seats_available += 1;
            txn.put(profile_key.clone(), profile.to_document());
            txn.put(conference_key.clone(), conference.to_document());
            Ok(true)
        })
    }

    /// Conferences the caller has registered for
    pub fn attending(&self, user: &AuthUser) -> ServiceResult<Vec<ConferenceForm>> {
        let profile = self.profiles().get_or_create(user)?;
        let mut conferences = Vec::new();
        for websafe_key in &profile.conference_keys_to_attend {
            let key = Key::from_websafe(websafe_key)?;
            if let Some(properties) = self.store.get(&key)? {
                conferences.push(Conference::from_record(&Record { key, properties })?);
            }
        }
        let names = self.organizer_names(conferences.iter())?;
        Ok(conferences
            .iter()
            .map(|conference| {
                conference.to_form(
                    names
                        .get(conference.organizer_user_id.as_str())
                        .map(String::as_str)
                        .unwrap_or(""),
                )
            })
            .collect())
    }

    /// Currently cached announcement, empty when none
    pub fn announcement(&self) -> String {
        self.cache.get(ANNOUNCEMENTS_KEY).unwrap_or_default()
    }

    /// Synchronous announcement refresh (manual cron trigger)
    pub fn refresh_announcement(&self) -> ServiceResult<String> {
        Ok(cache_announcement(&self.store, &self.cache)?)
    }

    /// Resolves organizer display names for a batch of conferences
    fn organizer_names<'a>(
        &self,
        conferences: impl IntoIterator<Item = &'a Conference>,
    ) -> ServiceResult<HashMap<String, String>> {
        let mut names = HashMap::new();
        for conference in conferences {
            let organizer = conference.organizer_user_id.clone();
            if names.contains_key(&organizer) {
                continue;
            }
            let key = Profile::key_for(&organizer);
            if let Some(properties) = self.store.get(&key)? {
                let profile = Profile::from_record(&Record { key, properties })?;
                names.insert(organizer, profile.display_name);
            }
        }
        Ok(names)
    }
}

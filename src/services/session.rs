//! # Session Service
//!
//! Session creation and lookups under a conference key, filtered search
//! through the query planner, and the caller's wishlist.

use std::sync::Arc;

use super::errors::{ServiceError, ServiceResult};
use super::profile::ProfileService;
use crate::auth::AuthUser;
use crate::cache::{MemoryCache, FEATURED_SPEAKER_KEY};
use crate::datastore::{Datastore, Key, Predicate, Query, Record};
use crate::models::{Conference, Profile, Session, SessionForm};
use crate::query::{execute, parse_date, parse_time, FilterSpec, SESSION_FIELDS};
use crate::schema;
use crate::tasks::{Task, TaskQueue};

/// Session operations
pub struct SessionService {
    store: Arc<Datastore>,
    cache: Arc<MemoryCache>,
    queue: TaskQueue,
}

impl SessionService {
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

    fn load_conference(&self, websafe_key: &str) -> ServiceResult<Conference> {
        let key = Key::from_websafe(websafe_key)?;
        let properties = self.store.get(&key)?.ok_or_else(|| {
            ServiceError::NotFound(format!("No conference found with key: {}", websafe_key))
        })?;
        Ok(Conference::from_record(&Record { key, properties })?)
    }

    /// Creates a session under a conference; organizer only. Enqueues the
    /// featured-speaker recomputation.
    pub fn create(
        &self,
        user: &AuthUser,
        websafe_conference_key: &str,
        form: &SessionForm,
    ) -> ServiceResult<SessionForm> {
        let conference = self.load_conference(websafe_conference_key)?;
        if user.user_id != conference.organizer_user_id {
            return Err(ServiceError::Forbidden(
                "Only the organizer of this conference can add sessions.".to_string(),
            ));
        }

        let required = |field: &str, present: bool| {
            if present {
                Ok(())
            } else {
                Err(ServiceError::BadRequest(format!(
                    "'{}' field is required to create a session.",
                    field
                )))
            }
        };
        required("name", form.name.as_deref().is_some_and(|v| !v.is_empty()))?;
        required(
            "speaker",
            form.speaker.as_deref().is_some_and(|v| !v.is_empty()),
        )?;
        required("duration", form.duration.is_some())?;
        required("date", form.date.as_deref().is_some_and(|v| !v.is_empty()))?;
        required(
            "startTime",
            form.start_time.as_deref().is_some_and(|v| !v.is_empty()),
        )?;

        let duration = form.duration.unwrap_or(0);
        if duration <= 0 {
            return Err(ServiceError::BadRequest(
                "Duration must be greater than zero".to_string(),
            ));
        }
        let date = parse_date(form.date.as_deref().unwrap_or(""))?;
        let start_time = parse_time(form.start_time.as_deref().unwrap_or(""))?;

        let id = self.store.allocate_id(Session::KIND)?;
        let key = Key::with_id(Session::KIND, id).under(conference.key.clone());
        let session = Session {
            key: key.clone(),
            name: form.name.clone().unwrap_or_default(),
            highlights: form.highlights.clone(),
            speaker: form.speaker.clone().unwrap_or_default(),
            duration,
            type_of_session: form.type_of_session.clone().unwrap_or_default(),
            date,
            start_time,
        };
        self.store.put(key, session.to_document())?;

        self.queue.enqueue(Task::SetFeaturedSpeaker {
            conference_key: websafe_conference_key.to_string(),
            speaker: session.speaker.clone(),
        });
        Ok(session.to_form())
    }

    /// All sessions of a conference
    pub fn by_conference(&self, websafe_conference_key: &str) -> ServiceResult<Vec<SessionForm>> {
        let conference = self.load_conference(websafe_conference_key)?;
        let records = self
            .store
            .run(&Query::kind(Session::KIND).ancestor(conference.key))?;
        Self::to_forms(&records)
    }

    /// Sessions of a conference with a given type
    pub fn by_type(
        &self,
        websafe_conference_key: &str,
        type_of_session: &str,
    ) -> ServiceResult<Vec<SessionForm>> {
        let conference = self.load_conference(websafe_conference_key)?;
        let records = self.store.run(
            &Query::kind(Session::KIND)
                .ancestor(conference.key)
                .filter(Predicate::eq("typeOfSession", type_of_session)),
        )?;
        Self::to_forms(&records)
    }

    /// Sessions given by a speaker, across all conferences
    pub fn by_speaker(&self, speaker: &str) -> ServiceResult<Vec<SessionForm>> {
        let records = self
            .store
            .run(&Query::kind(Session::KIND).filter(Predicate::eq("speaker", speaker)))?;
        Self::to_forms(&records)
    }

    /// Filtered session search through the query planner
    pub fn query(&self, filters: &[FilterSpec]) -> ServiceResult<Vec<SessionForm>> {
        let records = execute(
            &self.store,
            &schema::SESSION,
            filters,
            &SESSION_FIELDS,
            &["name"],
        )?;
        Self::to_forms(&records)
    }

    /// Adds a session to the caller's wishlist
    pub fn wishlist_add(&self, user: &AuthUser, websafe_session_key: &str) -> ServiceResult<bool> {
        self.ensure_session_exists(websafe_session_key)?;
        self.profiles().get_or_create(user)?;
        let profile_key = Profile::key_for(&user.user_id);

        self.store.transaction(|txn| {
            let properties = txn.get(&profile_key).ok_or_else(|| {
                ServiceError::NotFound(format!("No profile found for: {}", user.user_id))
            })?;
            let mut profile = Profile::from_record(&Record {
                key: profile_key.clone(),
                properties,
            })?;

            if profile
                .session_keys_in_wishlist
                .iter()
                .any(|k| k == websafe_session_key)
            {
                return Err(ServiceError::Conflict(
                    "This session is already in user's wishlist".to_string(),
                ));
            }
            profile
                .session_keys_in_wishlist
                .push(websafe_session_key.to_string());
            txn.put(profile_key.clone(), profile.to_document());
            Ok(true)
        })
    }

    /// Removes a session from the caller's wishlist
    pub fn wishlist_remove(
        &self,
        user: &AuthUser,
        websafe_session_key: &str,
    ) -> ServiceResult<bool> {
        self.ensure_session_exists(websafe_session_key)?;
        self.profiles().get_or_create(user)?;
        let profile_key = Profile::key_for(&user.user_id);

        self.store.transaction(|txn| {
            let properties = txn.get(&profile_key).ok_or_else(|| {
                ServiceError::NotFound(format!("No profile found for: {}", user.user_id))
            })?;
            let mut profile = Profile::from_record(&Record {
                key: profile_key.clone(),
                properties,
            })?;

            let before = profile.session_keys_in_wishlist.len();
            profile
                .session_keys_in_wishlist
                .retain(|k| k != websafe_session_key);
            if profile.session_keys_in_wishlist.len() == before {
                return Err(ServiceError::BadRequest(
                    "Failed to find session in user's wishlist".to_string(),
                ));
            }
            txn.put(profile_key.clone(), profile.to_document());
            Ok(true)
        })
    }

    /// Sessions in the caller's wishlist
    pub fn wishlist(&self, user: &AuthUser) -> ServiceResult<Vec<SessionForm>> {
        let profile = self.profiles().get_or_create(user)?;
        let mut forms = Vec::new();
        for websafe_key in &profile.session_keys_in_wishlist {
            let key = Key::from_websafe(websafe_key)?;
            if let Some(properties) = self.store.get(&key)? {
                forms.push(Session::from_record(&Record { key, properties })?.to_form());
            }
        }
        Ok(forms)
    }

    /// Currently cached featured-speaker string, empty when none
    pub fn featured_speaker(&self) -> String {
        self.cache.get(FEATURED_SPEAKER_KEY).unwrap_or_default()
    }

    fn ensure_session_exists(&self, websafe_session_key: &str) -> ServiceResult<()> {
        let key = Key::from_websafe(websafe_session_key)?;
        if self.store.get(&key)?.is_none() {
            return Err(ServiceError::BadRequest(format!(
                "Session with key {} doesn't exist",
                websafe_session_key
            )));
        }
        Ok(())
    }

    fn to_forms(records: &[Record]) -> ServiceResult<Vec<SessionForm>> {
        records
            .iter()
            .map(|record| Ok(Session::from_record(record)?.to_form()))
            .collect()
    }
}

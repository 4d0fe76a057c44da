//! # Side-Effect Workers
//!
//! The out-of-band computations: announcement refresh, featured-speaker
//! refresh, and confirmation mail. Invoked by the queue worker, the interval
//! scheduler, and the manual cron endpoint.

use std::sync::Arc;

use tokio::sync::mpsc;

use super::email::{EmailMessage, EmailSender};
use super::errors::TaskResult;
use super::queue::Task;
use crate::cache::{MemoryCache, ANNOUNCEMENTS_KEY, FEATURED_SPEAKER_KEY};
use crate::datastore::{CompareOp, Datastore, Key, Predicate, Query};
use crate::models::{Conference, Session};
use crate::observability::Logger;

/// Prefix of the cached announcement string
pub const ANNOUNCEMENT_TPL: &str =
    "Last chance to attend! The following conferences are nearly sold out: ";

/// Recomputes the nearly-sold-out announcement and caches it.
///
/// Conferences with `0 < seatsAvailable <= 5` make the announcement; when
/// none qualify the cache entry is deleted and an empty string returned.
pub fn cache_announcement(store: &Datastore, cache: &MemoryCache) -> TaskResult<String> {
    let records = store.run(
        &Query::kind(Conference::KIND)
            .filter(Predicate::new("seatsAvailable", CompareOp::Lte, 5.into()))
            .filter(Predicate::new("seatsAvailable", CompareOp::Gt, 0.into())),
    )?;

    if records.is_empty() {
        cache.delete(ANNOUNCEMENTS_KEY);
        return Ok(String::new());
    }

    let names: Vec<String> = records
        .iter()
        .filter_map(|record| record.properties.get("name"))
        .filter_map(|value| value.as_str())
        .map(str::to_string)
        .collect();
    let announcement = format!("{}{}", ANNOUNCEMENT_TPL, names.join(", "));
    cache.set(ANNOUNCEMENTS_KEY, announcement.clone());
    Ok(announcement)
}

/// Recomputes the featured-speaker string for one conference.
///
/// The speaker is featured only when they give more than one session in the
/// conference; a single session leaves the cached value untouched.
pub fn set_featured_speaker(
    store: &Datastore,
    cache: &MemoryCache,
    conference_key: &str,
    speaker: &str,
) -> TaskResult<()> {
    let ancestor = Key::from_websafe(conference_key)?;
    let sessions = store.run(
        &Query::kind(Session::KIND)
            .ancestor(ancestor)
            .filter(Predicate::eq("speaker", speaker)),
    )?;

    if sessions.len() > 1 {
        let names: Vec<String> = sessions
            .iter()
            .filter_map(|record| record.properties.get("name"))
            .filter_map(|value| value.as_str())
            .map(str::to_string)
            .collect();
        cache.set(
            FEATURED_SPEAKER_KEY,
            format!("{}: {}", speaker, names.join(", ")),
        );
    }
    Ok(())
}

/// Drains the task queue and dispatches each job
pub struct TaskWorker {
    store: Arc<Datastore>,
    cache: Arc<MemoryCache>,
    mailer: Arc<dyn EmailSender>,
    rx: mpsc::UnboundedReceiver<Task>,
}

impl TaskWorker {
    pub fn new(
        store: Arc<Datastore>,
        cache: Arc<MemoryCache>,
        mailer: Arc<dyn EmailSender>,
        rx: mpsc::UnboundedReceiver<Task>,
    ) -> Self {
        Self {
            store,
            cache,
            mailer,
            rx,
        }
    }

    /// Runs until the queue's producer side is dropped
    pub async fn run(mut self) {
        while let Some(task) = self.rx.recv().await {
            let name = task.name();
            match self.handle(task) {
                Ok(()) => Logger::trace("task_done", &[("task", name)]),
                Err(err) => {
                    Logger::error("task_failed", &[("task", name), ("error", &err.to_string())]);
                }
            }
        }
    }

    /// Executes a single task
    pub fn handle(&self, task: Task) -> TaskResult<()> {
        match task {
            Task::SendConfirmationEmail {
                email,
                conference_info,
            } => self.mailer.send(EmailMessage::ConferenceCreated {
                to: email,
                conference_info,
            }),
            Task::SetFeaturedSpeaker {
                conference_key,
                speaker,
            } => set_featured_speaker(&self.store, &self.cache, &conference_key, &speaker),
        }
    }
}

//! # Announcement Scheduler
//!
//! Periodic refresh of the cached announcement string, standing in for the
//! original deployment's cron trigger. The manual cron endpoint drives the
//! same worker function on demand.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use super::workers::cache_announcement;
use crate::cache::MemoryCache;
use crate::datastore::Datastore;
use crate::observability::Logger;

/// Background loop refreshing the announcement cache on an interval
pub struct AnnouncementScheduler {
    store: Arc<Datastore>,
    cache: Arc<MemoryCache>,
    period: Duration,
}

impl AnnouncementScheduler {
    pub fn new(store: Arc<Datastore>, cache: Arc<MemoryCache>, period: Duration) -> Self {
        Self {
            store,
            cache,
            period,
        }
    }

    /// Spawns the refresh loop onto the current runtime
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.period);
            // The first tick fires immediately; skip it.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                match cache_announcement(&self.store, &self.cache) {
                    Ok(announcement) => Logger::trace(
                        "announcement_refreshed",
                        &[("announcement", &announcement)],
                    ),
                    Err(err) => Logger::error(
                        "announcement_refresh_failed",
                        &[("error", &err.to_string())],
                    ),
                }
            }
        })
    }
}

//! # String Cache
//!
//! Process-wide cache for precomputed announcement strings. Injected as a
//! client handle wherever it is needed; there is no global instance.

use std::collections::HashMap;
use std::sync::RwLock;

/// Cache key for the recent-announcements string
pub const ANNOUNCEMENTS_KEY: &str = "RECENT_ANNOUNCEMENTS";

/// Cache key for the featured-speaker string
pub const FEATURED_SPEAKER_KEY: &str = "FEATURED_SPEAKER";

/// In-memory named-string cache with get/set/delete
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value for `key`, if present
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
    }

    /// Stores `value` under `key`, replacing any previous value
    pub fn set(&self, key: &str, value: impl Into<String>) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key.to_string(), value.into());
        }
    }

    /// Removes the entry for `key`; returns whether one existed
    pub fn delete(&self, key: &str) -> bool {
        self.entries
            .write()
            .map(|mut entries| entries.remove(key).is_some())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_delete() {
        let cache = MemoryCache::new();
        assert_eq!(cache.get(ANNOUNCEMENTS_KEY), None);

        cache.set(ANNOUNCEMENTS_KEY, "almost sold out: room #2");
        assert_eq!(
            cache.get(ANNOUNCEMENTS_KEY).as_deref(),
            Some("almost sold out: room #2")
        );

        assert!(cache.delete(ANNOUNCEMENTS_KEY));
        assert!(!cache.delete(ANNOUNCEMENTS_KEY));
        assert_eq!(cache.get(ANNOUNCEMENTS_KEY), None);
    }

    #[test]
    fn test_set_replaces_existing() {
        let cache = MemoryCache::new();
        cache.set(FEATURED_SPEAKER_KEY, "flash: Python");
        cache.set(FEATURED_SPEAKER_KEY, "joker: Poker, Bluffing");
        assert_eq!(
            cache.get(FEATURED_SPEAKER_KEY).as_deref(),
            Some("joker: Poker, Bluffing")
        );
    }
}

//! In-memory response cache with a fixed time-to-live.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// Default validity window: five minutes.
pub const DEFAULT_TTL: Duration = Duration::from_millis(300_000);

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    data: V,
    timestamp: DateTime<Utc>,
}

/// Keyed cache whose entries expire once their age reaches the TTL.
#[derive(Debug, Clone)]
pub struct ResponseCache<V> {
    entries: HashMap<String, CacheEntry<V>>,
    ttl_ms: i64,
}

impl<V: Clone> ResponseCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl_ms: i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX),
        }
    }

    /// Look up a value, treating expired entries as misses.
    pub fn get(&self, key: &str) -> Option<V> {
        self.get_at(key, Utc::now())
    }

    pub fn get_at(&self, key: &str, now: DateTime<Utc>) -> Option<V> {
        let entry = self.entries.get(key)?;
        let age_ms = (now - entry.timestamp).num_milliseconds();
        if age_ms < self.ttl_ms {
            Some(entry.data.clone())
        } else {
            debug!("Cache entry expired: {}", key);
            None
        }
    }

    /// Store a value, replacing any previous entry and resetting its age.
    pub fn set(&mut self, key: impl Into<String>, value: V) {
        self.set_at(key, value, Utc::now());
    }

    pub fn set_at(&mut self, key: impl Into<String>, value: V, now: DateTime<Utc>) {
        self.entries.insert(
            key.into(),
            CacheEntry {
                data: value,
                timestamp: now,
            },
        );
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn purge_expired_at(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        let ttl_ms = self.ttl_ms;
        self.entries
            .retain(|_, entry| (now - entry.timestamp).num_milliseconds() < ttl_ms);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<V: Clone> Default for ResponseCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

//! Per-minute request limiter for outbound API calls.
//!
//! Requests are counted per endpoint in fixed one-minute windows
//! (`epoch_ms / 60000`). A new window starts from zero.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Default number of requests allowed per endpoint per minute.
pub const DEFAULT_REQUESTS_PER_MINUTE: u32 = 10;

const WINDOW_MS: i64 = 60_000;

/// Fixed-window counter keyed by endpoint and minute bucket.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    limit: u32,
    counts: HashMap<(String, i64), u32>,
}

fn minute_bucket(now: DateTime<Utc>) -> i64 {
    now.timestamp_millis().div_euclid(WINDOW_MS)
}

impl RateLimiter {
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            counts: HashMap::new(),
        }
    }

    /// Record a request for `endpoint` if budget remains in this minute.
    pub fn try_acquire(&mut self, endpoint: &str) -> bool {
        self.try_acquire_at(endpoint, Utc::now())
    }

    pub fn try_acquire_at(&mut self, endpoint: &str, now: DateTime<Utc>) -> bool {
        let bucket = minute_bucket(now);

        // older windows can never be consulted again
        self.counts.retain(|(_, b), _| *b >= bucket);

        let count = self
            .counts
            .entry((endpoint.to_string(), bucket))
            .or_insert(0);

        if *count >= self.limit {
            warn!(
                "Rate limit reached for '{}' ({} requests this minute)",
                endpoint, count
            );
            return false;
        }

        *count += 1;
        debug!("Rate limiter: {} request {}/{}", endpoint, count, self.limit);
        true
    }

    /// Requests still allowed for `endpoint` in the current minute.
    pub fn remaining_at(&self, endpoint: &str, now: DateTime<Utc>) -> u32 {
        let used = self
            .counts
            .get(&(endpoint.to_string(), minute_bucket(now)))
            .copied()
            .unwrap_or(0);
        self.limit.saturating_sub(used)
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_REQUESTS_PER_MINUTE)
    }
}

//! Fixed-window request counter keyed by caller identity.
//!
//! Every identifier gets a window that opens on its first request and closes
//! `window` later. Inside the window at most `max_requests` calls are
//! admitted; the counter starts over on the first call after the window
//! closes. Because windows are fixed rather than sliding, a caller can be
//! admitted up to `2 * max_requests` times across a window boundary.
//!
//! Expired entries are swept lazily on every call, so memory is bounded by
//! the number of distinct identifiers seen within one window length.

use crate::config::RateLimitConfig;
use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Outcome of a single rate limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateLimitDecision {
    /// Whether the request may proceed
    pub allowed: bool,

    /// Requests left in the current window
    pub remaining: u32,

    /// When the current window closes
    pub reset_time: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct RateLimitEntry {
    count: u32,
    reset_time: DateTime<Utc>,
}

/// Process-wide fixed-window rate limiter
///
/// The table starts empty and lives as long as the owning component. Sweep
/// and update run inside a single lock acquisition so parallel callers never
/// lose increments.
#[derive(Debug)]
pub struct RateLimiter {
    entries: Mutex<HashMap<String, RateLimitEntry>>,
    max_requests: u32,
    window: Duration,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(&RateLimitConfig::default())
    }
}

impl RateLimiter {
    /// Create an empty limiter whose `check` uses the configured defaults
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            max_requests: config.max_requests,
            window: config.window(),
        }
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Check `identifier` against the configured limit and window
    pub fn check(&self, identifier: &str) -> RateLimitDecision {
        self.check_rate_limit(identifier, self.max_requests, self.window)
    }

    /// Check `identifier` against an explicit limit and window
    pub fn check_rate_limit(
        &self,
        identifier: &str,
        max_requests: u32,
        window: Duration,
    ) -> RateLimitDecision {
        self.check_rate_limit_at(identifier, max_requests, window, Utc::now())
    }

    /// Check `identifier` as of `now`
    pub fn check_rate_limit_at(
        &self,
        identifier: &str,
        max_requests: u32,
        window: Duration,
        now: DateTime<Utc>,
    ) -> RateLimitDecision {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        entries.retain(|_, entry| entry.reset_time > now);

        match entries.get_mut(identifier) {
            None => {
                let reset_time = window_end(now, window);
                entries.insert(
                    identifier.to_string(),
                    RateLimitEntry {
                        count: 1,
                        reset_time,
                    },
                );
                RateLimitDecision {
                    allowed: true,
                    remaining: max_requests.saturating_sub(1),
                    reset_time,
                }
            }
            Some(entry) if entry.count < max_requests => {
                entry.count += 1;
                RateLimitDecision {
                    allowed: true,
                    remaining: max_requests - entry.count,
                    reset_time: entry.reset_time,
                }
            }
            Some(entry) => RateLimitDecision {
                allowed: false,
                remaining: 0,
                reset_time: entry.reset_time,
            },
        }
    }

    /// Number of identifiers with a live or not-yet-swept window
    pub fn tracked_identifiers(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

fn window_end(now: DateTime<Utc>, window: Duration) -> DateTime<Utc> {
    TimeDelta::from_std(window)
        .ok()
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

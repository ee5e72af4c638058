//! Per-source credential-failure tracking and lockout.
//!
//! [`AttemptTracker`] is an in-memory, lock-protected table keyed by request
//! source (client IP). After `max_failures` failed attempts inside a fixed
//! window the source is locked for `lockout_secs`; a success clears the
//! entry immediately. A single coarse mutex over the table is enough for
//! this endpoint's traffic.
//!
//! All time-dependent methods take `now` explicitly so one clock value
//! flows through a request and tests never sleep.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

use ink_domain::config::SecurityConfig;

/// Failure counters for a single source.
#[derive(Debug, Clone)]
struct AttemptRecord {
    count: u32,
    window_start: DateTime<Utc>,
    locked_until: Option<DateTime<Utc>>,
    last_seen: DateTime<Utc>,
}

/// In-memory brute-force lockout tracker.
pub struct AttemptTracker {
    policy: SecurityConfig,
    entries: Mutex<HashMap<String, AttemptRecord>>,
}

impl AttemptTracker {
    pub fn new(policy: SecurityConfig) -> Self {
        Self {
            policy,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Whether the source is currently locked out. A never-seen source is
    /// unlocked.
    pub fn is_locked(&self, source: &str, now: DateTime<Utc>) -> bool {
        let entries = self.entries.lock();
        entries
            .get(source)
            .and_then(|e| e.locked_until)
            .map_or(false, |until| until > now)
    }

    /// Record a failed credential attempt. Locks the source once the
    /// failure count reaches the policy limit within the window.
    pub fn record_failure(&self, source: &str, now: DateTime<Utc>) {
        let window = Duration::seconds(self.policy.window_secs as i64);
        let mut entries = self.entries.lock();
        let entry = entries.entry(source.to_string()).or_insert(AttemptRecord {
            count: 0,
            window_start: now,
            locked_until: None,
            last_seen: now,
        });

        // Expired lock or expired window — start counting fresh.
        if entry.locked_until.map_or(false, |until| until <= now)
            || now - entry.window_start > window
        {
            entry.count = 0;
            entry.window_start = now;
            entry.locked_until = None;
        }

        entry.count += 1;
        entry.last_seen = now;

        if entry.count >= self.policy.max_failures {
            let lockout = Duration::seconds(self.policy.lockout_secs as i64);
            entry.locked_until = Some(now + lockout);
            tracing::warn!(
                source,
                failures = entry.count,
                lockout_secs = self.policy.lockout_secs,
                "source locked out after repeated auth failures"
            );
        }
    }

    /// Record a successful attempt: clears the failure count and any lock.
    pub fn record_success(&self, source: &str) {
        self.entries.lock().remove(source);
    }

    /// Best-effort eviction of idle entries. Active locks are never evicted,
    /// so eviction cannot unlock a source early.
    pub fn evict_stale(&self, now: DateTime<Utc>) -> usize {
        let idle = Duration::seconds(self.policy.idle_evict_secs as i64);
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, e| {
            e.locked_until.map_or(false, |until| until > now) || now - e.last_seen < idle
        });
        before - entries.len()
    }

    #[cfg(test)]
    fn tracked_sources(&self) -> usize {
        self.entries.lock().len()
    }
}

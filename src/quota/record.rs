//! The persisted quota record.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Request counter for one user within the current window.
///
/// Created on the first request from a new user and mutated on every allowed
/// request; never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserQuota {
    /// Stable user identifier (Telegram chat ID).
    pub user_id: i64,

    /// Requests counted in the current window.
    pub request_count: u32,

    /// When the current window began.
    pub window_start: DateTime<Utc>,

    /// Lifetime request total, across all windows.
    #[serde(default)]
    pub total_requests: u64,

    /// When the user last issued an allowed request.
    #[serde(default)]
    pub last_request: Option<DateTime<Utc>>,
}

impl UserQuota {
    /// Creates a fresh record with an empty window starting at `now`.
    #[must_use]
    pub fn new(user_id: i64, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            request_count: 0,
            window_start: now,
            total_requests: 0,
            last_request: None,
        }
    }

    /// When the current window ends.
    #[must_use]
    pub fn window_end(&self, window: TimeDelta) -> DateTime<Utc> {
        self.window_start + window
    }

    /// Whether the current window has elapsed at `now`.
    #[must_use]
    pub fn window_expired(&self, now: DateTime<Utc>, window: TimeDelta) -> bool {
        now - self.window_start >= window
    }

    /// Starts a new empty window at `now`.
    pub fn reset_window(&mut self, now: DateTime<Utc>) {
        self.request_count = 0;
        self.window_start = now;
    }

    /// Counts one allowed request at `now`.
    pub fn record_request(&mut self, now: DateTime<Utc>) {
        self.request_count += 1;
        self.total_requests += 1;
        self.last_request = Some(now);
    }
}

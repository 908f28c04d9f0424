//! Usage aggregation for the admin dashboard.
//!
//! The dashboard rendering lives in the host bot; this module only computes
//! the numbers from the stored quota records.

use chrono::{DateTime, TimeDelta, Utc};

use crate::storage::{QuotaStore, StorageError};

/// Aggregated usage snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageReport {
    /// Users that have ever issued a request.
    pub user_count: usize,

    /// Lifetime request total across all users.
    pub total_requests: u64,

    /// Users whose last request falls within `window` of `now`.
    pub active_users: usize,

    /// Users currently out of quota.
    pub exhausted_users: usize,
}

impl UsageReport {
    /// Collects a snapshot from the stored quota records.
    ///
    /// `window` is the activity window (normally the quota window) and
    /// `limit` the configured per-window request limit.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails.
    pub async fn collect<S: QuotaStore>(
        store: &S,
        now: DateTime<Utc>,
        window: TimeDelta,
        limit: u32,
    ) -> Result<Self, StorageError> {
        let quotas = store.all_quotas().await?;

        let mut report = Self {
            user_count: quotas.len(),
            total_requests: 0,
            active_users: 0,
            exhausted_users: 0,
        };

        for quota in &quotas {
            report.total_requests += quota.total_requests;

            if quota
                .last_request
                .is_some_and(|last| now - last < window)
            {
                report.active_users += 1;
            }

            if !quota.window_expired(now, window) && quota.request_count >= limit {
                report.exhausted_users += 1;
            }
        }

        Ok(report)
    }
}

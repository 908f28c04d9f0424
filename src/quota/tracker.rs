//! Quota admission decisions.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{debug, error, warn};

use super::UserQuota;
use crate::config::{ConfigError, CoreConfig};
use crate::storage::{KeyLocks, QuotaStore, StorageError};

/// Retry hint reported when storage is unavailable and the real window end
/// cannot be read.
const STORAGE_RETRY_HINT: Duration = Duration::from_secs(60);

/// Outcome of a quota check. Denial is a normal result, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuotaDecision {
    /// The request may proceed; `remaining` requests are left in the window.
    Allowed { remaining: u32 },

    /// The request must not proceed. `retry_after` is how long the user
    /// should wait before trying again.
    Denied {
        retry_after: Duration,
        reason: DenialReason,
    },
}

impl QuotaDecision {
    /// Whether the request was admitted.
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }
}

/// Why a request was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    /// The user spent their whole quota for the current window.
    LimitExhausted,

    /// The storage backend failed or timed out; denying is the safe default.
    StorageUnavailable,
}

/// Enforces the per-user request quota over a rolling window.
///
/// Timestamps are injected by the caller and must be monotonic non-decreasing
/// per user; an out-of-order timestamp is a caller bug and is logged rather
/// than allowed to reset the window.
#[derive(Debug)]
pub struct QuotaTracker<S> {
    store: Arc<S>,
    limit: u32,
    window: TimeDelta,
    storage_timeout: Duration,
    locks: KeyLocks,
}

impl<S: QuotaStore> QuotaTracker<S> {
    /// Creates a tracker over `store` with a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(store: Arc<S>, config: &CoreConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            store,
            limit: config.daily_request_limit,
            window: config.window_delta()?,
            storage_timeout: config.storage_timeout,
            locks: KeyLocks::new(),
        })
    }

    /// Checks the quota for one request and consumes a unit when allowed.
    ///
    /// A storage failure fails closed: the request is denied, never admitted
    /// unmetered.
    pub async fn check_and_consume(&self, user_id: i64, now: DateTime<Utc>) -> QuotaDecision {
        let _guard = self.locks.acquire(user_id).await;

        match self.consume_locked(user_id, now).await {
            Ok(decision) => decision,
            Err(e) => {
                error!("Quota check for user {} failed closed: {}", user_id, e);
                QuotaDecision::Denied {
                    retry_after: STORAGE_RETRY_HINT,
                    reason: DenialReason::StorageUnavailable,
                }
            }
        }
    }

    async fn consume_locked(
        &self,
        user_id: i64,
        now: DateTime<Utc>,
    ) -> Result<QuotaDecision, StorageError> {
        let mut quota = self
            .bounded(self.store.load_quota(user_id))
            .await?
            .unwrap_or_else(|| UserQuota::new(user_id, now));

        if now < quota.window_start {
            // Precondition violation, not a reason to hand out a fresh window.
            warn!(
                "Out-of-order timestamp for user {}: {} precedes window start {}",
                user_id, now, quota.window_start
            );
        }

        if quota.window_expired(now, self.window) {
            debug!("Window expired for user {}, resetting count", user_id);
            quota.reset_window(now);
        }

        if quota.request_count >= self.limit {
            let retry_after = (quota.window_end(self.window) - now)
                .to_std()
                .unwrap_or_default();
            return Ok(QuotaDecision::Denied {
                retry_after,
                reason: DenialReason::LimitExhausted,
            });
        }

        quota.record_request(now);
        self.bounded(self.store.store_quota(&quota)).await?;

        Ok(QuotaDecision::Allowed {
            remaining: self.limit - quota.request_count,
        })
    }

    /// How many requests the user has left in the current window.
    ///
    /// Read-only; never consumes quota or persists a reset.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails or times out.
    pub async fn remaining_requests(
        &self,
        user_id: i64,
        now: DateTime<Utc>,
    ) -> Result<u32, StorageError> {
        let quota = self.bounded(self.store.load_quota(user_id)).await?;
        Ok(match quota {
            Some(q) if !q.window_expired(now, self.window) => {
                self.limit.saturating_sub(q.request_count)
            }
            _ => self.limit,
        })
    }

    /// When the user's quota next resets.
    ///
    /// Returns `now` for users with no active window.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails or times out.
    pub async fn reset_time(
        &self,
        user_id: i64,
        now: DateTime<Utc>,
    ) -> Result<DateTime<Utc>, StorageError> {
        let quota = self.bounded(self.store.load_quota(user_id)).await?;
        Ok(match quota {
            Some(q) if !q.window_expired(now, self.window) => q.window_end(self.window),
            _ => now,
        })
    }

    async fn bounded<T>(
        &self,
        op: impl Future<Output = Result<T, StorageError>> + Send,
    ) -> Result<T, StorageError> {
        tokio::time::timeout(self.storage_timeout, op)
            .await
            .map_err(|_| StorageError::Timeout)?
    }
}

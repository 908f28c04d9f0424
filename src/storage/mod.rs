//! Persistence abstraction shared by the quota tracker and preference store.
//!
//! A [`QuotaStore`] owns both per-user records. A successful store is visible
//! to every subsequent load from any caller; the two record kinds for a user
//! are updated independently and never need cross-record atomicity.

mod json;
mod locks;
mod memory;

use async_trait::async_trait;

pub use json::JsonStore;
pub use locks::KeyLocks;
pub use memory::MemoryStore;

use crate::prefs::UserPreferences;
use crate::quota::UserQuota;

/// Storage-layer errors.
///
/// The quota tracker treats any of these as a fail-closed denial; the
/// preference store surfaces them as a transient error.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage operation timed out")]
    Timeout,
}

/// Keyed record store for quota and preference records.
#[async_trait]
pub trait QuotaStore: Send + Sync {
    /// Loads the quota record for a user, `None` if never seen.
    async fn load_quota(&self, user_id: i64) -> Result<Option<UserQuota>, StorageError>;

    /// Stores a quota record, replacing any previous one for the same user.
    async fn store_quota(&self, quota: &UserQuota) -> Result<(), StorageError>;

    /// Loads the preference record for a user, `None` if never set.
    async fn load_preferences(
        &self,
        user_id: i64,
    ) -> Result<Option<UserPreferences>, StorageError>;

    /// Stores a preference record, replacing any previous one.
    async fn store_preferences(
        &self,
        user_id: i64,
        prefs: &UserPreferences,
    ) -> Result<(), StorageError>;

    /// Returns all quota records, for usage reporting.
    async fn all_quotas(&self) -> Result<Vec<UserQuota>, StorageError>;

    /// Flushes any buffered state to the backend. Called on shutdown.
    async fn flush(&self) -> Result<(), StorageError>;
}

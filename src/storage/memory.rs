//! In-memory storage backend.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{QuotaStore, StorageError};
use crate::prefs::UserPreferences;
use crate::quota::UserQuota;

/// Ephemeral store keeping all records in process memory.
///
/// Counters do not survive a restart; suitable for tests and for deployments
/// that accept quota loss on redeploy.
#[derive(Debug, Default)]
pub struct MemoryStore {
    quotas: RwLock<HashMap<i64, UserQuota>>,
    preferences: RwLock<HashMap<i64, UserPreferences>>,
}

impl MemoryStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuotaStore for MemoryStore {
    async fn load_quota(&self, user_id: i64) -> Result<Option<UserQuota>, StorageError> {
        Ok(self.quotas.read().await.get(&user_id).cloned())
    }

    async fn store_quota(&self, quota: &UserQuota) -> Result<(), StorageError> {
        self.quotas.write().await.insert(quota.user_id, quota.clone());
        Ok(())
    }

    async fn load_preferences(
        &self,
        user_id: i64,
    ) -> Result<Option<UserPreferences>, StorageError> {
        Ok(self.preferences.read().await.get(&user_id).cloned())
    }

    async fn store_preferences(
        &self,
        user_id: i64,
        prefs: &UserPreferences,
    ) -> Result<(), StorageError> {
        self.preferences.write().await.insert(user_id, prefs.clone());
        Ok(())
    }

    async fn all_quotas(&self) -> Result<Vec<UserQuota>, StorageError> {
        Ok(self.quotas.read().await.values().cloned().collect())
    }

    async fn flush(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

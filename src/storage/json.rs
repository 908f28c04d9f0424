//! File-backed JSON storage backend.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;

use super::{QuotaStore, StorageError};
use crate::prefs::UserPreferences;
use crate::quota::UserQuota;

/// On-disk layout of the store file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    quotas: HashMap<i64, UserQuota>,

    #[serde(default)]
    preferences: HashMap<i64, UserPreferences>,
}

/// Store persisting all records to a single JSON file.
///
/// The full state is loaded at open and rewritten on every mutation. Writes
/// go through a temp file and an atomic rename, so a crash mid-write never
/// leaves a torn store file behind.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    data: RwLock<StoreFile>,
}

impl JsonStore {
    /// Opens the store at `path`, loading existing records.
    ///
    /// A missing or empty file starts an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let data = match std::fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => StoreFile::default(),
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("Store file {} not found, starting empty", path.display());
                StoreFile::default()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    // Non-blocking so callers' timeout bounds stay effective during writes.
    async fn persist(&self, data: &StoreFile) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(data)?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl QuotaStore for JsonStore {
    async fn load_quota(&self, user_id: i64) -> Result<Option<UserQuota>, StorageError> {
        Ok(self.data.read().await.quotas.get(&user_id).cloned())
    }

    async fn store_quota(&self, quota: &UserQuota) -> Result<(), StorageError> {
        let mut data = self.data.write().await;
        data.quotas.insert(quota.user_id, quota.clone());
        self.persist(&data).await
    }

    async fn load_preferences(
        &self,
        user_id: i64,
    ) -> Result<Option<UserPreferences>, StorageError> {
        Ok(self.data.read().await.preferences.get(&user_id).cloned())
    }

    async fn store_preferences(
        &self,
        user_id: i64,
        prefs: &UserPreferences,
    ) -> Result<(), StorageError> {
        let mut data = self.data.write().await;
        data.preferences.insert(user_id, prefs.clone());
        self.persist(&data).await
    }

    async fn all_quotas(&self) -> Result<Vec<UserQuota>, StorageError> {
        Ok(self.data.read().await.quotas.values().cloned().collect())
    }

    async fn flush(&self) -> Result<(), StorageError> {
        let data = self.data.read().await;
        self.persist(&data).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn temp_store_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("weather_bot_core_{}_{}.json", name, std::process::id()))
    }

    #[tokio::test]
    async fn test_missing_file_starts_empty() {
        let path = temp_store_path("missing");
        let _ = std::fs::remove_file(&path);

        let store = JsonStore::open(&path).unwrap();
        assert!(store.load_quota(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_records_survive_reopen() {
        let path = temp_store_path("reopen");
        let _ = std::fs::remove_file(&path);
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 8, 30, 0).unwrap();

        {
            let store = JsonStore::open(&path).unwrap();
            let mut quota = UserQuota::new(99, now);
            quota.record_request(now);
            store.store_quota(&quota).await.unwrap();
            store
                .store_preferences(99, &UserPreferences::default())
                .await
                .unwrap();
        }

        let store = JsonStore::open(&path).unwrap();
        let quota = store.load_quota(99).await.unwrap().unwrap();
        assert_eq!(quota.request_count, 1);
        assert_eq!(quota.window_start, now);
        assert!(store.load_preferences(99).await.unwrap().is_some());

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_flush_rewrites_the_store_file() {
        let path = temp_store_path("flush");
        let _ = std::fs::remove_file(&path);
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 8, 30, 0).unwrap();

        let store = JsonStore::open(&path).unwrap();
        store.store_quota(&UserQuota::new(7, now)).await.unwrap();

        // Flush must rewrite the full state even if the file went missing.
        std::fs::remove_file(&path).unwrap();
        store.flush().await.unwrap();

        let reopened = JsonStore::open(&path).unwrap();
        assert!(reopened.load_quota(7).await.unwrap().is_some());

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_rejected() {
        let path = temp_store_path("corrupt");
        std::fs::write(&path, "not json at all").unwrap();

        assert!(matches!(
            JsonStore::open(&path),
            Err(StorageError::Serialization(_))
        ));

        let _ = std::fs::remove_file(&path);
    }
}

//! Preference reads and validated writes.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::{PreferenceField, PrecipitationUnit, TemperatureUnit, UserPreferences, WindSpeedUnit};
use crate::config::{ConfigError, CoreConfig};
use crate::storage::{KeyLocks, QuotaStore, StorageError};

/// Preference operation errors.
#[derive(Debug, thiserror::Error)]
pub enum PreferenceError {
    /// The settings command named a field that does not exist.
    #[error("unknown preference field: {field}")]
    UnknownField { field: String },

    /// The value is outside the field's enum domain. Nothing was mutated.
    #[error("invalid value {value:?} for {field} (allowed: {allowed})")]
    InvalidValue {
        field: &'static str,
        value: String,
        allowed: &'static str,
    },

    /// The storage backend failed; stored state is unchanged.
    #[error("preference storage unavailable: {0}")]
    Storage(#[from] StorageError),
}

/// Stores and retrieves per-user display unit preferences.
#[derive(Debug)]
pub struct PreferenceStore<S> {
    store: Arc<S>,
    storage_timeout: Duration,
    locks: KeyLocks,
}

impl<S: QuotaStore> PreferenceStore<S> {
    /// Creates a preference store over `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(store: Arc<S>, config: &CoreConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            store,
            storage_timeout: config.storage_timeout,
            locks: KeyLocks::new(),
        })
    }

    /// Returns the user's preferences, falling back to defaults when absent.
    ///
    /// Reads never write: the default is not persisted until the user
    /// explicitly sets something.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails or times out.
    pub async fn get_preferences(&self, user_id: i64) -> Result<UserPreferences, PreferenceError> {
        let prefs = self
            .bounded(self.store.load_preferences(user_id))
            .await?
            .unwrap_or_default();
        Ok(prefs)
    }

    /// Sets one preference field from untrusted chat input.
    ///
    /// Field and value are validated before storage is touched; a bad field
    /// or value leaves stored state unchanged. Returns the updated record.
    ///
    /// # Errors
    ///
    /// Returns [`PreferenceError::UnknownField`] or
    /// [`PreferenceError::InvalidValue`] for bad input, and
    /// [`PreferenceError::Storage`] if the backend fails.
    pub async fn set_preference(
        &self,
        user_id: i64,
        field: &str,
        value: &str,
    ) -> Result<UserPreferences, PreferenceError> {
        let Some(field) = PreferenceField::parse(field) else {
            warn!("User {} referenced unknown preference field {:?}", user_id, field);
            return Err(PreferenceError::UnknownField {
                field: field.to_owned(),
            });
        };

        let _guard = self.locks.acquire(user_id).await;

        let mut prefs = self
            .bounded(self.store.load_preferences(user_id))
            .await?
            .unwrap_or_default();

        apply(&mut prefs, field, value)?;

        self.bounded(self.store.store_preferences(user_id, &prefs))
            .await?;

        debug!(
            "User {} set {} = {}",
            user_id,
            field.as_str(),
            value.trim().to_lowercase()
        );
        Ok(prefs)
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

/// Applies a validated value to the targeted field.
fn apply(
    prefs: &mut UserPreferences,
    field: PreferenceField,
    value: &str,
) -> Result<(), PreferenceError> {
    let invalid = || PreferenceError::InvalidValue {
        field: field.as_str(),
        value: value.to_owned(),
        allowed: field.allowed_values(),
    };

    match field {
        PreferenceField::TemperatureUnit => {
            prefs.temperature_unit = TemperatureUnit::parse(value).ok_or_else(invalid)?;
        }
        PreferenceField::WindSpeedUnit => {
            prefs.wind_speed_unit = WindSpeedUnit::parse(value).ok_or_else(invalid)?;
        }
        PreferenceField::PrecipitationUnit => {
            prefs.precipitation_unit = PrecipitationUnit::parse(value).ok_or_else(invalid)?;
        }
    }
    Ok(())
}

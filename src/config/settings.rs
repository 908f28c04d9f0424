//! Core configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{DEFAULT_DAILY_REQUEST_LIMIT, DEFAULT_STORAGE_TIMEOUT_SECS, DEFAULT_WINDOW_HOURS};

/// Configuration consumed by the quota tracker and preference store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Maximum number of weather requests per user per window.
    #[serde(default = "default_request_limit")]
    pub daily_request_limit: u32,

    /// Length of the rolling quota window.
    #[serde(default = "default_window")]
    pub window_duration: Duration,

    /// Location of the storage backend file.
    #[serde(default = "default_storage_path")]
    pub storage_path: PathBuf,

    /// Bound on a single storage operation before it is treated as failed.
    #[serde(default = "default_storage_timeout")]
    pub storage_timeout: Duration,
}

fn default_request_limit() -> u32 {
    DEFAULT_DAILY_REQUEST_LIMIT
}

fn default_window() -> Duration {
    Duration::from_secs(DEFAULT_WINDOW_HOURS * 3600)
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("weather_bot.json")
}

fn default_storage_timeout() -> Duration {
    Duration::from_secs(DEFAULT_STORAGE_TIMEOUT_SECS)
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            daily_request_limit: default_request_limit(),
            window_duration: default_window(),
            storage_path: default_storage_path(),
            storage_timeout: default_storage_timeout(),
        }
    }
}

impl CoreConfig {
    /// Creates configuration from environment variables with defaults.
    ///
    /// Recognized variables: `RATE_LIMIT_REQUESTS`, `RATE_LIMIT_WINDOW_HOURS`,
    /// `STORAGE_PATH`, `STORAGE_TIMEOUT_SECS`.
    #[must_use]
    pub fn from_env_with_defaults() -> Self {
        Self {
            daily_request_limit: std::env::var("RATE_LIMIT_REQUESTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_request_limit),
            window_duration: std::env::var("RATE_LIMIT_WINDOW_HOURS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .map_or_else(default_window, |h| Duration::from_secs(h * 3600)),
            storage_path: std::env::var("STORAGE_PATH")
                .map_or_else(|_| default_storage_path(), PathBuf::from),
            storage_timeout: std::env::var("STORAGE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .map_or_else(default_storage_timeout, Duration::from_secs),
        }
    }

    /// Validates the configuration at startup.
    ///
    /// # Errors
    ///
    /// Returns an error if any field is outside its valid domain.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.daily_request_limit == 0 {
            return Err(ConfigError::ZeroRequestLimit);
        }
        if self.window_duration.is_zero() {
            return Err(ConfigError::ZeroWindow);
        }
        if chrono::TimeDelta::from_std(self.window_duration).is_err() {
            return Err(ConfigError::WindowTooLarge);
        }
        if self.storage_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    /// Returns the window duration as a chrono delta for timestamp math.
    ///
    /// # Errors
    ///
    /// Returns an error if the window does not fit a chrono delta; callers
    /// that validated the config first never see this.
    pub fn window_delta(&self) -> Result<chrono::TimeDelta, ConfigError> {
        chrono::TimeDelta::from_std(self.window_duration).map_err(|_| ConfigError::WindowTooLarge)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("daily_request_limit must be at least 1")]
    ZeroRequestLimit,

    #[error("window_duration must be non-zero")]
    ZeroWindow,

    #[error("window_duration is too large to represent")]
    WindowTooLarge,

    #[error("storage_timeout must be non-zero")]
    ZeroTimeout,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CoreConfig::default();
        assert_eq!(config.daily_request_limit, 20);
        assert_eq!(config.window_duration, Duration::from_secs(24 * 3600));
        assert_eq!(config.storage_path, PathBuf::from("weather_bot.json"));
        assert_eq!(config.storage_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(CoreConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_limit_rejected() {
        let config = CoreConfig {
            daily_request_limit: 0,
            ..CoreConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroRequestLimit)
        ));
    }

    #[test]
    fn test_zero_window_rejected() {
        let config = CoreConfig {
            window_duration: Duration::ZERO,
            ..CoreConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroWindow)));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = CoreConfig {
            storage_timeout: Duration::ZERO,
            ..CoreConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroTimeout)));
    }

    #[test]
    fn test_window_delta_matches_window() {
        let config = CoreConfig::default();
        let delta = config.window_delta().unwrap();
        assert_eq!(delta, chrono::TimeDelta::hours(24));
    }
}

//! Configuration module for the weather bot core.
//!
//! Handles loading and validation of the metering configuration:
//! request limits, window duration, and storage backend settings.

mod settings;

pub use settings::{ConfigError, CoreConfig};

/// Default number of weather requests a user may issue per window.
pub const DEFAULT_DAILY_REQUEST_LIMIT: u32 = 20;

/// Default quota window length in hours.
pub const DEFAULT_WINDOW_HOURS: u64 = 24;

/// Default bound on a single storage operation, in seconds.
pub const DEFAULT_STORAGE_TIMEOUT_SECS: u64 = 5;

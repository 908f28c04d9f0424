//! Per-user display unit preferences.
//!
//! Values originate from untrusted chat input, so everything is validated
//! against the enum domains before any state is touched.

mod store;
mod units;

pub use store::{PreferenceError, PreferenceStore};
pub use units::{
    PrecipitationUnit, PreferenceField, TemperatureUnit, UserPreferences, WindSpeedUnit,
};

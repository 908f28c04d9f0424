//! Display unit enums and the preference record.

use serde::{Deserialize, Serialize};

/// Temperature display unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    /// Allowed values, for user-facing validation messages.
    pub const ALLOWED: &'static str = "celsius, fahrenheit";

    /// Parses a user-supplied value, `None` if unrecognized.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "celsius" => Some(Self::Celsius),
            "fahrenheit" => Some(Self::Fahrenheit),
            _ => None,
        }
    }

    /// The wire name of this unit.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Celsius => "celsius",
            Self::Fahrenheit => "fahrenheit",
        }
    }
}

/// Wind speed display unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindSpeedUnit {
    #[default]
    Kmh,
    Mph,
    Ms,
    Knots,
}

impl WindSpeedUnit {
    /// Allowed values, for user-facing validation messages.
    pub const ALLOWED: &'static str = "kmh, mph, ms, knots";

    /// Parses a user-supplied value, `None` if unrecognized.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "kmh" => Some(Self::Kmh),
            "mph" => Some(Self::Mph),
            "ms" => Some(Self::Ms),
            "knots" => Some(Self::Knots),
            _ => None,
        }
    }

    /// The wire name of this unit.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Kmh => "kmh",
            Self::Mph => "mph",
            Self::Ms => "ms",
            Self::Knots => "knots",
        }
    }
}

/// Precipitation display unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrecipitationUnit {
    #[default]
    Mm,
    Inch,
}

impl PrecipitationUnit {
    /// Allowed values, for user-facing validation messages.
    pub const ALLOWED: &'static str = "mm, inch";

    /// Parses a user-supplied value, `None` if unrecognized.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "mm" => Some(Self::Mm),
            "inch" => Some(Self::Inch),
            _ => None,
        }
    }

    /// The wire name of this unit.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mm => "mm",
            Self::Inch => "inch",
        }
    }
}

/// Which preference a settings command targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceField {
    TemperatureUnit,
    WindSpeedUnit,
    PrecipitationUnit,
}

impl PreferenceField {
    /// Parses a field name from a settings command.
    ///
    /// Accepts the canonical name plus short aliases.
    #[must_use]
    pub fn parse(field: &str) -> Option<Self> {
        match field.trim().to_lowercase().as_str() {
            "temperature_unit" | "temperature" | "temp" => Some(Self::TemperatureUnit),
            "wind_speed_unit" | "wind" => Some(Self::WindSpeedUnit),
            "precipitation_unit" | "precipitation" => Some(Self::PrecipitationUnit),
            _ => None,
        }
    }

    /// The canonical field name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TemperatureUnit => "temperature_unit",
            Self::WindSpeedUnit => "wind_speed_unit",
            Self::PrecipitationUnit => "precipitation_unit",
        }
    }

    /// Allowed values for this field, for validation messages.
    #[must_use]
    pub const fn allowed_values(self) -> &'static str {
        match self {
            Self::TemperatureUnit => TemperatureUnit::ALLOWED,
            Self::WindSpeedUnit => WindSpeedUnit::ALLOWED,
            Self::PrecipitationUnit => PrecipitationUnit::ALLOWED,
        }
    }
}

/// Display unit choices for one user.
///
/// Defaults to {celsius, kmh, mm}; mutated only by explicit settings
/// commands, never deleted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPreferences {
    #[serde(default)]
    pub temperature_unit: TemperatureUnit,

    #[serde(default)]
    pub wind_speed_unit: WindSpeedUnit,

    #[serde(default)]
    pub precipitation_unit: PrecipitationUnit,
}

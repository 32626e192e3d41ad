//! Shared environment record read by every subsystem.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Discrete weather classification governing target values for the
/// continuous variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum WeatherState {
    /// Clear skies, minimal cloud cover.
    #[default]
    Clear,
    /// Overcast without precipitation.
    Cloudy,
    /// Active rainfall.
    Raining,
    /// Heavy rainfall with lightning.
    Thunderstorm,
    /// Active snowfall (sub-zero temperatures).
    Snowing,
}

impl WeatherState {
    /// Stable uppercase display name for logs and frame records.
    pub fn display_name(self) -> &'static str {
        match self {
            WeatherState::Clear => "CLEAR",
            WeatherState::Cloudy => "CLOUDY",
            WeatherState::Raining => "RAINING",
            WeatherState::Thunderstorm => "THUNDERSTORM",
            WeatherState::Snowing => "SNOWING",
        }
    }

    /// Whether this state produces rain or snow particles.
    pub fn is_precipitating(self) -> bool {
        matches!(
            self,
            WeatherState::Raining | WeatherState::Thunderstorm | WeatherState::Snowing
        )
    }
}

/// Continuous weather variables plus the day/night clock.
///
/// Owned and mutated by [`crate::WeatherSystem`]; every other subsystem
/// receives an immutable view per frame. External overrides are accepted
/// as-is; formulas that need a [0, 1] domain clamp at the point of use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    /// Current weather classification.
    pub state: WeatherState,
    /// Air temperature in Celsius, nominally -20..40.
    pub temperature: f32,
    /// Barometric pressure in hPa, nominally 980..1050.
    pub pressure: f32,
    /// Relative humidity, 0..1.
    pub humidity: f32,
    /// Fraction of sky covered by clouds, 0..1.
    pub cloud_cover: f32,
    /// Wind direction and speed.
    pub wind: Vec2,
    /// Day fraction: 0.0 = midnight, 0.5 = noon, wraps at 1.0.
    pub time_of_day: f32,
    /// Advance rate of `time_of_day` per unit time.
    pub time_scale: f32,
    /// Transient sky flash from lightning, 0..1, decays toward 0.
    pub lightning_flash: f32,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            state: WeatherState::Clear,
            temperature: 20.0,
            pressure: 1013.0,
            humidity: 0.5,
            cloud_cover: 0.2,
            wind: Vec2::ZERO,
            // Start at noon with a slow day/night cycle.
            time_of_day: 0.5,
            time_scale: 0.01,
            lightning_flash: 0.0,
        }
    }
}

impl Environment {
    /// True outside the daylight window [0.25, 0.75].
    pub fn is_night(&self) -> bool {
        self.time_of_day < 0.25 || self.time_of_day > 0.75
    }
}

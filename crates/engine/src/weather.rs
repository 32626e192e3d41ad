//! Weather state machine: owns the environment, advances the clock, and
//! performs periodic probabilistic transitions between weather states.

use crate::environment::{Environment, WeatherState};
use rand::{rngs::StdRng, Rng};
use stormscape_core::{normalize, Rgba};
use tracing::info;

/// Seconds of simulated time between transition attempts.
const TRANSITION_INTERVAL: f32 = 5.0;
/// Linear decay rate of the lightning flash, per unit time.
const LIGHTNING_DECAY: f32 = 5.0;

/// Owns the [`Environment`] and drives all discrete weather changes.
///
/// Subsystems only ever see `&Environment` through [`WeatherSystem::env`];
/// the mutable handle stays here.
#[derive(Debug)]
pub struct WeatherSystem {
    env: Environment,
    transition_timer: f32,
    rng: StdRng,
}

impl WeatherSystem {
    /// Create a machine at the engine-start defaults.
    pub fn new(rng: StdRng) -> Self {
        Self {
            env: Environment::default(),
            transition_timer: 0.0,
            rng,
        }
    }

    /// Read view of the environment for subsystems and queries.
    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Advance the clock, decay the flash, and attempt a transition when
    /// the interval timer elapses.
    pub fn advance(&mut self, dt: f32) {
        self.env.time_of_day = (self.env.time_of_day + dt * self.env.time_scale).rem_euclid(1.0);

        if self.env.lightning_flash > 0.0 {
            self.env.lightning_flash = (self.env.lightning_flash - dt * LIGHTNING_DECAY).max(0.0);
        }

        self.transition_timer += dt;
        if self.transition_timer >= TRANSITION_INTERVAL {
            self.transition_timer = 0.0;
            self.attempt_transition();
        }
    }

    /// Probability of precipitation derived from barometric pressure.
    ///
    /// 980 hPa maps to 1.0 and 1050 hPa to 0.0 exactly; out-of-range
    /// overrides clamp so the value stays a usable probability.
    pub fn chance_of_rain(&self) -> f32 {
        (1.0 - normalize(self.env.pressure, 980.0, 1050.0)).clamp(0.0, 1.0)
    }

    fn attempt_transition(&mut self) {
        let chance_of_rain = self.chance_of_rain();
        let roll: f32 = self.rng.gen();

        match self.env.state {
            WeatherState::Clear => {
                if roll < chance_of_rain * 0.3 {
                    self.set_state(WeatherState::Cloudy);
                }
            }
            WeatherState::Cloudy => {
                if roll < chance_of_rain * 0.5 {
                    if self.env.temperature <= 0.0 {
                        self.set_state(WeatherState::Snowing);
                    } else {
                        self.set_state(WeatherState::Raining);
                    }
                } else if roll > 0.8 {
                    self.set_state(WeatherState::Clear);
                }
            }
            WeatherState::Raining => {
                if roll < chance_of_rain * 0.2 {
                    self.set_state(WeatherState::Thunderstorm);
                } else if roll > 0.7 {
                    self.set_state(WeatherState::Cloudy);
                }
            }
            WeatherState::Thunderstorm => {
                // Occasional sky flash independent of the transition roll.
                if self.rng.gen::<f32>() < 0.3 {
                    self.trigger_lightning();
                }
                if roll > 0.6 {
                    self.set_state(WeatherState::Raining);
                }
            }
            WeatherState::Snowing => {
                if self.env.temperature > 2.0 {
                    self.set_state(WeatherState::Raining);
                } else if roll > 0.7 {
                    self.set_state(WeatherState::Cloudy);
                }
            }
        }
    }

    /// Switch to `new_state`, applying its entry side effects.
    ///
    /// Re-entering the current state is a no-op, so side effects fire once
    /// per actual change.
    pub fn set_state(&mut self, new_state: WeatherState) {
        if new_state == self.env.state {
            return;
        }
        info!(
            from = self.env.state.display_name(),
            to = new_state.display_name(),
            "weather changed"
        );
        self.env.state = new_state;

        match new_state {
            WeatherState::Clear => {
                self.env.cloud_cover = 0.1;
            }
            WeatherState::Cloudy => {
                self.env.cloud_cover = 0.6;
            }
            WeatherState::Raining => {
                self.env.cloud_cover = 0.8;
                self.env.humidity = 0.9;
            }
            WeatherState::Thunderstorm => {
                self.env.cloud_cover = 0.95;
                self.env.humidity = 1.0;
                self.env.wind.x = self.rng.gen_range(-20.0..20.0);
            }
            WeatherState::Snowing => {
                self.env.cloud_cover = 0.7;
                self.env.temperature = self.rng.gen_range(-10.0..0.0);
            }
        }
    }

    /// Set the sky flash to full intensity.
    pub fn trigger_lightning(&mut self) {
        self.env.lightning_flash = 1.0;
    }

    /// Override the air temperature (accepted as-is).
    pub fn set_temperature(&mut self, celsius: f32) {
        self.env.temperature = celsius;
    }

    /// Override the barometric pressure (accepted as-is).
    pub fn set_pressure(&mut self, hpa: f32) {
        if !(980.0..=1050.0).contains(&hpa) {
            tracing::warn!(hpa, "pressure override outside nominal 980..1050 range");
        }
        self.env.pressure = hpa;
    }

    /// Override the relative humidity (accepted as-is).
    pub fn set_humidity(&mut self, humidity: f32) {
        if !(0.0..=1.0).contains(&humidity) {
            tracing::warn!(humidity, "humidity override outside [0, 1]");
        }
        self.env.humidity = humidity;
    }

    /// Override the cloud cover fraction (accepted as-is).
    pub fn set_cloud_cover(&mut self, cover: f32) {
        if !(0.0..=1.0).contains(&cover) {
            tracing::warn!(cover, "cloud cover override outside [0, 1]");
        }
        self.env.cloud_cover = cover;
    }

    /// Override the day clock; renormalized into [0, 1) on the next advance.
    pub fn set_time_of_day(&mut self, time: f32) {
        self.env.time_of_day = time;
    }

    /// Sky color for the current clock and weather state.
    ///
    /// Six-segment piecewise-linear interpolation across the day, composed
    /// with a per-state post-filter. Pure query, callable every frame.
    pub fn sky_color(&self) -> Rgba {
        let night = Rgba::rgb(0.05, 0.05, 0.15);
        let dawn = Rgba::rgb(1.0, 0.5, 0.3);
        let day = Rgba::rgb(0.3, 0.6, 1.0);
        let dusk = Rgba::rgb(1.0, 0.4, 0.2);

        let t = self.env.time_of_day;
        let base = if t < 0.25 {
            night
        } else if t < 0.35 {
            night.lerp(dawn, (t - 0.25) / 0.1)
        } else if t < 0.4 {
            dawn.lerp(day, (t - 0.35) / 0.05)
        } else if t < 0.6 {
            day
        } else if t < 0.65 {
            day.lerp(dusk, (t - 0.6) / 0.05)
        } else if t < 0.75 {
            dusk.lerp(night, (t - 0.65) / 0.1)
        } else {
            night
        };

        match self.env.state {
            WeatherState::Clear => base,
            WeatherState::Cloudy => base.scale_rgb(0.8),
            WeatherState::Raining => base.scale_rgb(0.5).desaturated(),
            WeatherState::Thunderstorm => base.scale_rgb(0.3).desaturated(),
            WeatherState::Snowing => base.lerp(Rgba::rgb(0.8, 0.8, 0.85), 0.4),
        }
    }
}

//! Ground fog: a single low-pass-filtered density scalar.

use crate::environment::{Environment, WeatherState};
use glam::Vec2;
use stormscape_core::{Canvas, Rgba};

/// Density change per unit time while approaching the target.
const TRANSITION_RATE: f32 = 0.2;
/// Horizontal haze bands drawn bottom to top.
const BAND_COUNT: usize = 5;

/// Low-pass filter over a humidity/state/clock-derived target density.
#[derive(Debug)]
pub struct FogSystem {
    density: f32,
    enabled: bool,
}

impl FogSystem {
    /// Start with no fog.
    pub fn new() -> Self {
        Self {
            density: 0.0,
            enabled: true,
        }
    }

    /// Enable or disable fog update and rendering.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Current filtered density, 0..1.
    pub fn density(&self) -> f32 {
        self.density
    }

    /// Move the density toward this frame's target without overshooting.
    pub fn advance(&mut self, dt: f32, env: &Environment) {
        if !self.enabled {
            return;
        }
        let target = Self::target_density(env);
        if self.density < target {
            self.density = (self.density + dt * TRANSITION_RATE).min(target);
        } else if self.density > target {
            self.density = (self.density - dt * TRANSITION_RATE).max(target);
        }
    }

    /// Target density from humidity, weather state, and the day clock.
    ///
    /// Clear and Cloudy dampen the humidity term multiplicatively; the
    /// precipitation states add flat boosts on top of it instead. Dawn and
    /// dusk windows add more.
    pub fn target_density(env: &Environment) -> f32 {
        let mut density = env.humidity.clamp(0.0, 1.0) * 0.4;

        match env.state {
            WeatherState::Clear => density *= 0.3,
            WeatherState::Cloudy => density *= 0.8,
            WeatherState::Raining => density += 0.3,
            WeatherState::Thunderstorm => density += 0.2,
            WeatherState::Snowing => density += 0.4,
        }

        let t = env.time_of_day;
        if (t > 0.2 && t < 0.35) || (t > 0.65 && t < 0.8) {
            density += 0.2;
        }

        density.min(1.0)
    }

    /// Draw bottom-up haze bands with decreasing density and alpha.
    pub fn render(&self, canvas: &mut dyn Canvas, screen_w: f32, screen_h: f32) {
        if !self.enabled || self.density < 0.01 {
            return;
        }
        let band_height = screen_h / BAND_COUNT as f32;
        for i in 0..BAND_COUNT {
            let y = screen_h - (i + 1) as f32 * band_height;
            let band_density = self.density * (1.0 - i as f32 / BAND_COUNT as f32);
            canvas.rectangle(
                Vec2::new(0.0, y),
                Vec2::new(screen_w, band_height),
                Rgba::new(0.8, 0.8, 0.85, band_density * 0.4),
            );
        }
    }
}

impl Default for FogSystem {
    fn default() -> Self {
        Self::new()
    }
}

//! Sun, moon, and star field driven by the day clock.

use crate::environment::{Environment, WeatherState};
use glam::Vec2;
use rand::{rngs::StdRng, Rng};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use stormscape_core::{Canvas, Rgba};

/// Sun/moon disc radius in pixels.
const BODY_RADIUS: f32 = 40.0;

/// One fixed background star.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Star {
    /// Fixed screen position, confined to the upper sky band.
    pub position: Vec2,
    /// Base brightness, 0.3..1.0.
    pub brightness: f32,
    /// Twinkle phase in radians, wraps at 2π.
    pub twinkle_phase: f32,
    /// Twinkle advance rate in radians per unit time.
    pub twinkle_speed: f32,
    /// Draw radius in pixels.
    pub size: f32,
}

/// Derives sun/moon placement and star visibility from the environment.
///
/// The star field is generated eagerly at construction so rendering stays a
/// pure read; only the twinkle phases mutate per frame.
#[derive(Debug)]
pub struct CelestialSystem {
    stars: Vec<Star>,
    enabled: bool,
}

impl CelestialSystem {
    /// Generate `star_count` stars across the upper 60% of the screen.
    pub fn new(star_count: usize, screen_w: f32, screen_h: f32, rng: &mut StdRng) -> Self {
        let stars = (0..star_count)
            .map(|_| Star {
                position: Vec2::new(
                    rng.gen_range(0.0..screen_w),
                    rng.gen_range(0.0..screen_h * 0.6),
                ),
                brightness: rng.gen_range(0.3..1.0),
                twinkle_phase: rng.gen_range(0.0..2.0 * PI),
                twinkle_speed: rng.gen_range(1.0..3.0),
                size: rng.gen_range(1.0..2.5),
            })
            .collect();
        Self {
            stars,
            enabled: true,
        }
    }

    /// Enable or disable all celestial rendering.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Read access to the star field.
    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    /// Advance every star's twinkle phase, wrapping at 2π.
    pub fn advance(&mut self, dt: f32) {
        for star in &mut self.stars {
            star.twinkle_phase = (star.twinkle_phase + dt * star.twinkle_speed).rem_euclid(2.0 * PI);
        }
    }

    /// Sun position on its left-to-right half-sine arc over [0.25, 0.75].
    pub fn sun_position(time_of_day: f32, screen_w: f32, screen_h: f32) -> Vec2 {
        let progress = (time_of_day - 0.25) / 0.5;
        let angle = progress * PI;
        let x = screen_w * 0.1 + progress * screen_w * 0.8;
        // Y grows downward, so the arc peak subtracts.
        let y = screen_h * 0.45 - angle.sin() * (screen_h * 0.25);
        Vec2::new(x, y)
    }

    /// Moon position on its right-to-left arc over the wrapped night window.
    pub fn moon_position(time_of_day: f32, screen_w: f32, screen_h: f32) -> Vec2 {
        let progress = if time_of_day > 0.75 {
            (time_of_day - 0.75) / 0.5
        } else {
            (time_of_day + 0.25) / 0.5
        };
        let angle = progress * PI;
        let x = screen_w * 0.9 - progress * screen_w * 0.8;
        let y = screen_h * 0.45 - angle.sin() * (screen_h * 0.25);
        Vec2::new(x, y)
    }

    /// Sun visibility: fade bands at the window edges times a weather penalty.
    pub fn sun_visibility(env: &Environment) -> f32 {
        let t = env.time_of_day;
        if !(0.25..=0.75).contains(&t) {
            return 0.0;
        }
        let mut alpha = 1.0;
        if t < 0.35 {
            alpha = (t - 0.25) / 0.1;
        } else if t > 0.65 {
            alpha = (0.75 - t) / 0.1;
        }
        match env.state {
            WeatherState::Raining | WeatherState::Thunderstorm => alpha * 0.3,
            WeatherState::Cloudy => alpha * 0.6,
            _ => alpha,
        }
    }

    /// Moon visibility over the wrapped night window.
    pub fn moon_visibility(env: &Environment) -> f32 {
        let t = env.time_of_day;
        if !env.is_night() {
            return 0.0;
        }
        let mut alpha = 1.0;
        if t > 0.15 && t < 0.25 {
            alpha = (0.25 - t) / 0.1;
        } else if t > 0.75 && t < 0.85 {
            alpha = (t - 0.75) / 0.1;
        }
        match env.state {
            WeatherState::Raining | WeatherState::Thunderstorm => alpha * 0.3,
            WeatherState::Cloudy => alpha * 0.7,
            _ => alpha,
        }
    }

    /// Cosmetic moon phase cycling with the clock; not a lunar calendar.
    pub fn moon_phase(time_of_day: f32) -> f32 {
        (time_of_day * 30.0).fract()
    }

    /// Draw stars, sun, and moon for the current frame, back-to-front.
    pub fn render(&self, canvas: &mut dyn Canvas, env: &Environment, screen_w: f32, screen_h: f32) {
        if !self.enabled {
            return;
        }

        if env.is_night() {
            let visibility = if env.state == WeatherState::Clear {
                1.0
            } else {
                1.0 - env.cloud_cover.clamp(0.0, 1.0) * 0.8
            };
            self.render_stars(canvas, visibility);
        }

        let sun_alpha = Self::sun_visibility(env);
        if sun_alpha > 0.01 {
            let position = Self::sun_position(env.time_of_day, screen_w, screen_h);
            render_sun(canvas, position, BODY_RADIUS, sun_alpha);
        }

        let moon_alpha = Self::moon_visibility(env);
        if moon_alpha > 0.01 {
            let position = Self::moon_position(env.time_of_day, screen_w, screen_h);
            let phase = Self::moon_phase(env.time_of_day);
            render_moon(canvas, position, BODY_RADIUS, phase, moon_alpha);
        }
    }

    fn render_stars(&self, canvas: &mut dyn Canvas, visibility: f32) {
        for star in &self.stars {
            let twinkle = 0.5 + 0.5 * star.twinkle_phase.sin();
            let brightness = star.brightness * twinkle * visibility;
            canvas.circle(star.position, star.size, Rgba::new(1.0, 1.0, 1.0, brightness));
            // Brighter stars get a soft halo.
            if star.brightness > 0.7 {
                canvas.circle(
                    star.position,
                    star.size * 2.0,
                    Rgba::new(0.9, 0.9, 1.0, brightness * 0.3),
                );
            }
        }
    }
}

fn render_sun(canvas: &mut dyn Canvas, position: Vec2, radius: f32, alpha: f32) {
    canvas.circle(position, radius * 2.5, Rgba::new(1.0, 0.9, 0.5, 0.1 * alpha));
    canvas.circle(position, radius * 1.5, Rgba::new(1.0, 0.95, 0.6, 0.3 * alpha));
    canvas.circle(position, radius, Rgba::new(1.0, 0.95, 0.7, alpha));
    canvas.circle(position, radius * 0.7, Rgba::new(1.0, 1.0, 0.95, alpha));
}

fn render_moon(canvas: &mut dyn Canvas, position: Vec2, radius: f32, phase: f32, alpha: f32) {
    canvas.circle(position, radius * 1.4, Rgba::new(0.8, 0.8, 0.9, 0.2 * alpha));
    canvas.circle(position, radius, Rgba::new(0.9, 0.9, 0.95, 0.9 * alpha));
    // Phase slides a darker disc across the body to suggest a crescent.
    let shadow_offset = Vec2::new((phase - 0.5) * radius * 1.2, 0.0);
    canvas.circle(
        position + shadow_offset,
        radius * 0.95,
        Rgba::new(0.08, 0.08, 0.16, 0.6 * alpha),
    );
}

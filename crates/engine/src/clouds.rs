//! Cloud population tracking the environment's cloud cover.

use crate::environment::{Environment, WeatherState};
use glam::Vec2;
use rand::{rngs::StdRng, Rng};
use stormscape_core::{Canvas, Rgba};

/// One overlapping circle of a cloud silhouette, relative to its center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Puff {
    /// Offset from the cloud center.
    pub offset: Vec2,
    /// Circle radius.
    pub radius: f32,
}

/// A drifting cloud. The puff shape is generated once at spawn and never
/// mutated; only position and opacity change afterwards.
#[derive(Debug, Clone)]
pub struct Cloud {
    /// Center position on screen.
    pub position: Vec2,
    /// Own horizontal drift speed.
    pub velocity: Vec2,
    /// Base size the puffs are scaled from.
    pub size: f32,
    /// Current opacity, reset from the weather state every frame.
    pub opacity: f32,
    /// Immutable silhouette.
    pub puffs: Vec<Puff>,
}

/// Maintains the live cloud collection: hard top-up/drain toward the
/// cover-derived target, drift with wind coupling, and horizontal wrap.
#[derive(Debug)]
pub struct CloudSystem {
    clouds: Vec<Cloud>,
    max_clouds: usize,
    rng: StdRng,
}

impl CloudSystem {
    /// Create an empty population with the given ceiling.
    pub fn new(max_clouds: usize, rng: StdRng) -> Self {
        Self {
            clouds: Vec::with_capacity(max_clouds),
            max_clouds,
            rng,
        }
    }

    /// Number of live clouds.
    pub fn count(&self) -> usize {
        self.clouds.len()
    }

    /// Read access to the live population.
    pub fn clouds(&self) -> &[Cloud] {
        &self.clouds
    }

    /// Converge the population to target, then drift every cloud.
    pub fn advance(&mut self, dt: f32, env: &Environment, screen_w: f32, screen_h: f32) {
        let target =
            (env.cloud_cover.clamp(0.0, 1.0) * self.max_clouds as f32).floor() as usize;

        while self.clouds.len() < target {
            let cloud = self.spawn_cloud(screen_w, screen_h);
            self.clouds.push(cloud);
        }
        // Drain from the end; ordering within the population is irrelevant.
        self.clouds.truncate(target);

        let opacity = match env.state {
            WeatherState::Thunderstorm | WeatherState::Raining => 0.9,
            WeatherState::Cloudy => 0.7,
            _ => 0.4,
        };

        for cloud in &mut self.clouds {
            cloud.position.x += (cloud.velocity.x + env.wind.x * 0.5) * dt;

            if cloud.position.x > screen_w + cloud.size {
                cloud.position.x = -cloud.size;
            } else if cloud.position.x < -cloud.size {
                cloud.position.x = screen_w + cloud.size;
            }

            cloud.opacity = opacity;
        }
    }

    fn spawn_cloud(&mut self, screen_w: f32, _screen_h: f32) -> Cloud {
        let size = self.rng.gen_range(40.0..120.0);
        let position = Vec2::new(
            self.rng.gen_range(0.0..screen_w),
            self.rng.gen_range(50.0..250.0),
        );
        let velocity = Vec2::new(self.rng.gen_range(5.0..15.0), 0.0);

        // Fluffy silhouette from 5-9 overlapping circles.
        let puff_count = self.rng.gen_range(5..=9);
        let puffs = (0..puff_count)
            .map(|_| Puff {
                offset: Vec2::new(
                    self.rng.gen_range(-0.5..0.5) * size,
                    self.rng.gen_range(-0.3..0.3) * size,
                ),
                radius: size * self.rng.gen_range(0.4..0.8),
            })
            .collect();

        Cloud {
            position,
            velocity,
            size,
            opacity: 0.5,
            puffs,
        }
    }

    /// Shared per-frame cloud color: per-state base, darkened at night and
    /// warmed toward orange near dawn and dusk.
    pub fn cloud_color(env: &Environment) -> Rgba {
        let mut color = match env.state {
            WeatherState::Clear | WeatherState::Cloudy => Rgba::rgb(0.9, 0.9, 0.95),
            WeatherState::Raining => Rgba::rgb(0.5, 0.5, 0.6),
            WeatherState::Thunderstorm => Rgba::rgb(0.3, 0.3, 0.4),
            WeatherState::Snowing => Rgba::rgb(0.75, 0.75, 0.8),
        };

        let t = env.time_of_day;
        if env.is_night() {
            color.r *= 0.4;
            color.g *= 0.4;
            color.b *= 0.5;
        } else if t < 0.35 || t > 0.65 {
            color.r *= 1.1;
            color.g *= 0.9;
            color.b *= 0.8;
        }
        color
    }

    /// Draw every puff of every cloud with the shared frame color.
    pub fn render(&self, canvas: &mut dyn Canvas, env: &Environment) {
        let base = Self::cloud_color(env);
        for cloud in &self.clouds {
            let color = base.with_alpha(cloud.opacity);
            for puff in &cloud.puffs {
                canvas.circle(cloud.position + puff.offset, puff.radius, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stormscape_core::subsystem_rng;

    const W: f32 = 1280.0;
    const H: f32 = 720.0;

    fn system(max: usize, seed: u64) -> CloudSystem {
        CloudSystem::new(max, subsystem_rng(seed, 4))
    }

    #[test]
    fn population_converges_in_one_pass() {
        let mut clouds = system(20, 1);
        let mut env = Environment {
            cloud_cover: 0.6,
            ..Environment::default()
        };
        clouds.advance(0.016, &env, W, H);
        assert_eq!(clouds.count(), 12);

        env.cloud_cover = 0.1;
        clouds.advance(0.016, &env, W, H);
        assert_eq!(clouds.count(), 2);
    }

    #[test]
    fn population_never_exceeds_ceiling() {
        let mut clouds = system(15, 2);
        // Out-of-range override clamps before the target computation.
        let env = Environment {
            cloud_cover: 3.0,
            ..Environment::default()
        };
        clouds.advance(0.016, &env, W, H);
        assert_eq!(clouds.count(), 15);
    }

    #[test]
    fn puff_shapes_are_immutable_after_spawn() {
        let mut clouds = system(10, 3);
        let env = Environment {
            cloud_cover: 0.5,
            ..Environment::default()
        };
        clouds.advance(0.016, &env, W, H);
        let shapes: Vec<Vec<Puff>> = clouds.clouds().iter().map(|c| c.puffs.clone()).collect();
        for _ in 0..100 {
            clouds.advance(0.1, &env, W, H);
        }
        for (cloud, shape) in clouds.clouds().iter().zip(&shapes) {
            assert_eq!(&cloud.puffs, shape);
            assert!((5..=9).contains(&cloud.puffs.len()));
        }
    }

    #[test]
    fn clouds_wrap_across_the_right_edge() {
        let mut clouds = system(10, 4);
        let env = Environment {
            cloud_cover: 0.5,
            ..Environment::default()
        };
        clouds.advance(0.016, &env, W, H);
        // Drift for a long stretch; every cloud must stay within the wrap
        // band instead of escaping off-screen.
        for _ in 0..10_000 {
            clouds.advance(0.5, &env, W, H);
        }
        for cloud in clouds.clouds() {
            assert!(cloud.position.x >= -cloud.size - 1.0);
            assert!(cloud.position.x <= W + cloud.size + 1.0);
        }
    }

    #[test]
    fn opacity_tracks_weather_state() {
        let mut clouds = system(10, 5);
        let mut env = Environment {
            cloud_cover: 0.5,
            state: WeatherState::Raining,
            ..Environment::default()
        };
        clouds.advance(0.016, &env, W, H);
        assert!(clouds.clouds().iter().all(|c| c.opacity == 0.9));

        env.state = WeatherState::Clear;
        clouds.advance(0.016, &env, W, H);
        assert!(clouds.clouds().iter().all(|c| c.opacity == 0.4));
    }

    #[test]
    fn night_darkens_the_shared_color() {
        let day = Environment {
            time_of_day: 0.5,
            ..Environment::default()
        };
        let night = Environment {
            time_of_day: 0.05,
            ..Environment::default()
        };
        let day_color = CloudSystem::cloud_color(&day);
        let night_color = CloudSystem::cloud_color(&night);
        assert!(night_color.r < day_color.r);
        assert!(night_color.luminance() < day_color.luminance());
    }
}

//! Rain and snow particle population.

use crate::environment::{Environment, WeatherState};
use glam::Vec2;
use rand::{rngs::StdRng, Rng};
use stormscape_core::{Canvas, Rgba};

/// Particles are culled once they fall this far past the screen origin.
const OFFSCREEN_Y: f32 = 1000.0;
/// Base spawn rate in particles per unit time at intensity 1.
const BASE_SPAWN_RATE: f32 = 600.0;

/// Kind of precipitation currently falling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrecipKind {
    /// Fast, wind-sheared streaks.
    Rain,
    /// Slow, drifting flakes.
    Snow,
}

impl PrecipKind {
    /// Precipitation kind implied by a weather state, if any.
    pub fn for_state(state: WeatherState) -> Option<Self> {
        match state {
            WeatherState::Raining | WeatherState::Thunderstorm => Some(PrecipKind::Rain),
            WeatherState::Snowing => Some(PrecipKind::Snow),
            _ => None,
        }
    }
}

/// One falling particle with independent kinematics.
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    /// Screen position.
    pub position: Vec2,
    /// Velocity in pixels per unit time.
    pub velocity: Vec2,
    /// Streak thickness (rain) or flake radius (snow).
    pub size: f32,
    /// Remaining lifetime.
    pub lifetime: f32,
    /// Lifetime at spawn; the alpha ramp divides by this.
    pub max_lifetime: f32,
    /// Draw color; alpha is recomputed from the lifetime ratio every frame.
    pub color: Rgba,
}

/// Spawns, advances, and culls the precipitation population.
#[derive(Debug)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    current: Option<PrecipKind>,
    max_particles: usize,
    intensity: f32,
    /// Fractional spawn budget carried across frames so low rates still
    /// emit correctly on average.
    spawn_carry: f32,
    rng: StdRng,
}

impl ParticleSystem {
    /// Create an empty population with the given ceiling.
    pub fn new(max_particles: usize, rng: StdRng) -> Self {
        Self {
            particles: Vec::with_capacity(max_particles),
            current: None,
            max_particles,
            intensity: 1.0,
            spawn_carry: 0.0,
            rng,
        }
    }

    /// Number of live particles.
    pub fn count(&self) -> usize {
        self.particles.len()
    }

    /// Kind currently active, if any.
    pub fn current_kind(&self) -> Option<PrecipKind> {
        self.current
    }

    /// Global precipitation intensity multiplier.
    pub fn set_intensity(&mut self, intensity: f32) {
        self.intensity = intensity.max(0.0);
    }

    /// Derive the active kind, spawn this frame's budget, and integrate
    /// every live particle.
    pub fn advance(&mut self, dt: f32, env: &Environment, screen_w: f32, _screen_h: f32) {
        let kind = PrecipKind::for_state(env.state);
        if kind != self.current {
            // Switching kind clears the population instantly.
            self.particles.clear();
            self.spawn_carry = 0.0;
            self.current = kind;
        }

        if let Some(kind) = self.current {
            let factor = match env.state {
                WeatherState::Thunderstorm => 2.5,
                WeatherState::Raining => 1.5,
                _ => 1.0,
            };
            let budget = self.intensity * BASE_SPAWN_RATE * dt * factor;
            let mut to_spawn = budget.trunc() as usize;
            self.spawn_carry += budget.fract();
            if self.spawn_carry >= 1.0 {
                to_spawn += 1;
                self.spawn_carry -= 1.0;
            }

            for _ in 0..to_spawn {
                if self.particles.len() >= self.max_particles {
                    // Capacity reached: the rest of the budget is dropped.
                    break;
                }
                let particle = self.spawn_particle(kind, env, screen_w);
                self.particles.push(particle);
            }
        }

        let snow_drift = self.current == Some(PrecipKind::Snow);
        for particle in &mut self.particles {
            particle.position += particle.velocity * dt;
            if snow_drift {
                particle.velocity.x += self.rng.gen_range(-10.0..10.0) * dt;
            }
            particle.lifetime -= dt;
            particle.color.a = (particle.lifetime / particle.max_lifetime) * 0.8;
        }

        self.particles
            .retain(|p| p.lifetime > 0.0 && p.position.y <= OFFSCREEN_Y);
    }

    fn spawn_particle(&mut self, kind: PrecipKind, env: &Environment, screen_w: f32) -> Particle {
        let position = Vec2::new(
            self.rng.gen_range(0.0..screen_w),
            -20.0 - self.rng.gen_range(0.0..50.0),
        );

        match kind {
            PrecipKind::Rain => {
                let max_lifetime = 5.0;
                Particle {
                    position,
                    velocity: Vec2::new(
                        env.wind.x * 3.0 + self.rng.gen_range(-10.0..10.0),
                        self.rng.gen_range(300.0..500.0),
                    ),
                    size: self.rng.gen_range(1.5..2.5),
                    lifetime: max_lifetime,
                    max_lifetime,
                    color: Rgba::new(0.6, 0.6, 0.8, 0.6),
                }
            }
            PrecipKind::Snow => {
                let max_lifetime = 10.0;
                Particle {
                    position,
                    velocity: Vec2::new(
                        env.wind.x * 5.0 + self.rng.gen_range(-20.0..20.0),
                        self.rng.gen_range(30.0..80.0),
                    ),
                    size: self.rng.gen_range(2.0..4.0),
                    lifetime: max_lifetime,
                    max_lifetime,
                    color: Rgba::new(1.0, 1.0, 1.0, 0.8),
                }
            }
        }
    }

    /// Draw rain as velocity-aligned streaks and snow as flakes.
    pub fn render(&self, canvas: &mut dyn Canvas) {
        match self.current {
            Some(PrecipKind::Rain) => {
                for p in &self.particles {
                    let end = p.position + p.velocity * 0.02;
                    canvas.line(p.position, end, p.size, p.color);
                }
            }
            Some(PrecipKind::Snow) => {
                for p in &self.particles {
                    canvas.circle(p.position, p.size, p.color);
                }
            }
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stormscape_core::subsystem_rng;

    const W: f32 = 1280.0;
    const H: f32 = 720.0;

    fn system(max: usize, seed: u64) -> ParticleSystem {
        ParticleSystem::new(max, subsystem_rng(seed, 5))
    }

    fn raining() -> Environment {
        Environment {
            state: WeatherState::Raining,
            ..Environment::default()
        }
    }

    #[test]
    fn clear_weather_spawns_nothing() {
        let mut particles = system(100, 1);
        particles.advance(1.0, &Environment::default(), W, H);
        assert_eq!(particles.count(), 0);
        assert_eq!(particles.current_kind(), None);
    }

    #[test]
    fn population_respects_the_ceiling() {
        let mut particles = system(50, 2);
        let env = raining();
        for _ in 0..20 {
            particles.advance(0.1, &env, W, H);
        }
        assert_eq!(particles.count(), 50);
    }

    #[test]
    fn switching_kind_clears_instantly() {
        let mut particles = system(200, 3);
        particles.advance(0.1, &raining(), W, H);
        assert!(particles.count() > 0);
        assert_eq!(particles.current_kind(), Some(PrecipKind::Rain));

        let snowing = Environment {
            state: WeatherState::Snowing,
            ..Environment::default()
        };
        particles.advance(0.0, &snowing, W, H);
        assert_eq!(particles.current_kind(), Some(PrecipKind::Snow));
        assert_eq!(particles.count(), 0);
    }

    #[test]
    fn fractional_budget_carries_across_frames() {
        let mut particles = system(1000, 4);
        particles.set_intensity(0.001);
        let env = Environment {
            state: WeatherState::Snowing,
            ..Environment::default()
        };
        // 0.001 * 600 * 0.1 = 0.06 per frame: the whole-frame budget is
        // always zero, so only the carry can ever emit. Snow is slow and
        // long-lived, so nothing spawned here dies within the test window.
        for _ in 0..60 {
            particles.advance(0.1, &env, W, H);
        }
        assert_eq!(
            particles.count(),
            3,
            "60 frames at 0.06/frame should emit floor(3.6) particles"
        );
    }

    #[test]
    fn alpha_follows_lifetime_ratio() {
        let mut particles = system(10, 5);
        let env = raining();
        particles.advance(0.01, &env, W, H);
        particles.advance(1.0, &env, W, H);
        for p in particles
            .particles
            .iter()
            .filter(|p| (p.max_lifetime - p.lifetime) > 0.5)
        {
            let expected = (p.lifetime / p.max_lifetime) * 0.8;
            assert!((p.color.a - expected).abs() < 1e-6);
            assert!(p.color.a < 0.8);
        }
    }

    #[test]
    fn expired_particles_are_culled() {
        let mut particles = system(100, 6);
        let env = raining();
        particles.advance(0.1, &env, W, H);
        assert!(particles.count() > 0);

        // Clear skies stops spawning and clears via the kind switch; rain
        // lifetime expiry is covered by running out the clock instead.
        let mut survivors = particles.count();
        for _ in 0..60 {
            particles.advance(0.5, &env, W, H);
            survivors = particles.count();
        }
        // 30 units elapsed; nothing from the first frame (lifetime 5) can
        // survive, so everything live is from recent frames.
        assert!(survivors <= particles.max_particles);
        assert!(particles.particles.iter().all(|p| p.lifetime > 0.0));
        assert!(particles.particles.iter().all(|p| p.position.y <= OFFSCREEN_Y));
    }
}

//! Fractal lightning bolts: synchronous trunk + branch generation, short
//! lifetimes, and a screen-flash intensity derived from the live bolts.

use glam::Vec2;
use rand::{rngs::StdRng, Rng};
use stormscape_core::{Canvas, Rgba};

/// Recursion ceiling for branch generation.
const MAX_DEPTH: u32 = 4;

/// One immutable line segment of a bolt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoltSegment {
    /// Segment start point.
    pub start: Vec2,
    /// Segment end point.
    pub end: Vec2,
    /// Brightness weight, 0..1, lower for deeper branches.
    pub intensity: f32,
}

/// One strike: a flat ordered list of trunk and branch segments plus an
/// independent lifetime.
#[derive(Debug, Clone)]
pub struct Bolt {
    /// All segments, trunk and branches interleaved in generation order.
    pub segments: Vec<BoltSegment>,
    /// Remaining lifetime.
    pub lifetime: f32,
    /// Lifetime at trigger.
    pub max_lifetime: f32,
    /// Cleared once the lifetime runs out; purged at end of frame.
    pub active: bool,
}

/// Builds bolts on trigger and manages their decay.
#[derive(Debug)]
pub struct LightningSystem {
    bolts: Vec<Bolt>,
    max_bolts: usize,
    enabled: bool,
    flash: f32,
    rng: StdRng,
}

impl LightningSystem {
    /// Create an empty generator with the given bolt capacity.
    pub fn new(max_bolts: usize, rng: StdRng) -> Self {
        Self {
            bolts: Vec::with_capacity(max_bolts),
            max_bolts,
            enabled: true,
            flash: 0.0,
            rng,
        }
    }

    /// Enable or disable triggering and rendering.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Number of live bolts.
    pub fn count(&self) -> usize {
        self.bolts.len()
    }

    /// Read access to the live bolts.
    pub fn bolts(&self) -> &[Bolt] {
        &self.bolts
    }

    /// Brightest active bolt's lifetime ratio, 0 when idle.
    pub fn flash_intensity(&self) -> f32 {
        self.flash
    }

    /// Build one full bolt synchronously.
    ///
    /// No-op while disabled or at capacity; the excess request is dropped
    /// silently per the engine's capacity rules.
    pub fn trigger(&mut self, screen_w: f32, screen_h: f32) {
        if !self.enabled || self.bolts.len() >= self.max_bolts {
            return;
        }

        let lifetime = 0.15 + self.rng.gen_range(0.0..0.1);
        let start = Vec2::new(self.rng.gen_range(screen_w * 0.2..screen_w * 0.8), 0.0);
        let end = Vec2::new(
            start.x + self.rng.gen_range(-200.0..200.0),
            self.rng.gen_range(screen_h * 0.5..screen_h * 0.9),
        );

        let mut segments = Vec::new();
        generate_trunk(&mut self.rng, &mut segments, start, end, 0);

        self.bolts.push(Bolt {
            segments,
            lifetime,
            max_lifetime: lifetime,
            active: true,
        });
    }

    /// Decay lifetimes, recompute the flash, and purge spent bolts.
    pub fn advance(&mut self, dt: f32) {
        for bolt in &mut self.bolts {
            if bolt.active {
                bolt.lifetime -= dt;
                if bolt.lifetime <= 0.0 {
                    bolt.active = false;
                }
            }
        }

        self.flash = self
            .bolts
            .iter()
            .filter(|b| b.active)
            .map(|b| b.lifetime / b.max_lifetime)
            .fold(0.0, f32::max);

        self.bolts.retain(|b| b.active);
    }

    /// Draw every segment three times: wide faint glow, medium core, and a
    /// thin bright center, all fading with the bolt's lifetime ratio.
    pub fn render(&self, canvas: &mut dyn Canvas) {
        if !self.enabled {
            return;
        }
        for bolt in &self.bolts {
            if !bolt.active {
                continue;
            }
            let ratio = bolt.lifetime / bolt.max_lifetime;
            for segment in &bolt.segments {
                let alpha = ratio * segment.intensity;
                canvas.line(
                    segment.start,
                    segment.end,
                    6.0,
                    Rgba::new(0.6, 0.8, 1.0, alpha * 0.3),
                );
                canvas.line(
                    segment.start,
                    segment.end,
                    2.5,
                    Rgba::new(0.9, 0.95, 1.0, alpha),
                );
                canvas.line(segment.start, segment.end, 1.0, Rgba::new(1.0, 1.0, 1.0, alpha));
            }
        }
    }
}

/// Build the trunk between `start` and `end`, spawning branches along it.
///
/// Perpendicular jitter shrinks linearly toward the end of the run and the
/// last segment snaps to `end` exactly, so the trunk always converges.
fn generate_trunk(
    rng: &mut StdRng,
    segments: &mut Vec<BoltSegment>,
    start: Vec2,
    end: Vec2,
    depth: u32,
) {
    let span = end - start;
    let total_length = span.length();
    let direction = span.normalize_or_zero();

    let count = rng.gen_range(8..=15);
    let segment_length = total_length / count as f32;
    let intensity = 1.0 - depth as f32 / MAX_DEPTH as f32;

    let mut current = start;
    for i in 0..count {
        let perpendicular = Vec2::new(-direction.y, direction.x);
        let taper = 1.0 - i as f32 / count as f32;
        let offset = rng.gen_range(-20.0..20.0) * taper;

        let mut next = current + direction * segment_length + perpendicular * offset;
        if i == count - 1 {
            next = end;
        }

        segments.push(BoltSegment {
            start: current,
            end: next,
            intensity,
        });

        if depth < MAX_DEPTH && rng.gen::<f32>() < 0.4 {
            let branch_dir = (next - current).normalize_or_zero();
            let angle = rng.gen_range(-0.8..0.8f32);
            let rotated = rotate(branch_dir, angle);
            let length = rng.gen_range(50.0..150.0) * (1.0 - depth as f32 / MAX_DEPTH as f32);
            generate_branch(rng, segments, current, rotated, length, depth + 1);
        }

        current = next;
    }
}

/// Lighter-weight branch routine: fewer segments, smaller jitter, dimmer.
fn generate_branch(
    rng: &mut StdRng,
    segments: &mut Vec<BoltSegment>,
    start: Vec2,
    direction: Vec2,
    length: f32,
    depth: u32,
) {
    let count = rng.gen_range(3..=6);
    let segment_length = length / count as f32;
    let intensity = 0.6 * (1.0 - depth as f32 / MAX_DEPTH as f32);

    let mut current = start;
    for _ in 0..count {
        let perpendicular = Vec2::new(-direction.y, direction.x);
        let offset = rng.gen_range(-10.0..10.0);
        let next = current + direction * segment_length + perpendicular * offset;

        segments.push(BoltSegment {
            start: current,
            end: next,
            intensity,
        });

        if depth < MAX_DEPTH && rng.gen::<f32>() < 0.2 {
            let branch_dir = (next - current).normalize_or_zero();
            let angle = rng.gen_range(-0.6..0.6f32);
            let rotated = rotate(branch_dir, angle);
            let sub_length = rng.gen_range(30.0..80.0) * (1.0 - depth as f32 / MAX_DEPTH as f32);
            generate_branch(rng, segments, current, rotated, sub_length, depth + 1);
        }

        current = next;
    }
}

fn rotate(v: Vec2, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stormscape_core::subsystem_rng;

    const W: f32 = 1280.0;
    const H: f32 = 720.0;

    fn system(max: usize, seed: u64) -> LightningSystem {
        LightningSystem::new(max, subsystem_rng(seed, 6))
    }

    #[test]
    fn trunk_endpoints_are_exact() {
        // Jitter never moves the anchor points, whatever the seed.
        for seed in 0..20 {
            let mut rng = subsystem_rng(seed, 6);
            let start = Vec2::new(600.0, 0.0);
            let end = Vec2::new(450.0, 500.0);
            let mut segments = Vec::new();
            generate_trunk(&mut rng, &mut segments, start, end, 0);

            assert_eq!(segments[0].start, start);
            assert!(
                segments.iter().any(|s| s.end == end),
                "seed {seed}: no segment converges to the trigger end point"
            );
        }
    }

    #[test]
    fn trunk_segments_carry_full_intensity() {
        let mut rng = subsystem_rng(7, 6);
        let mut segments = Vec::new();
        generate_trunk(
            &mut rng,
            &mut segments,
            Vec2::new(100.0, 0.0),
            Vec2::new(100.0, 400.0),
            0,
        );
        assert!(segments.iter().any(|s| s.intensity == 1.0));
        // Branch segments, if present, sit strictly below the trunk.
        assert!(segments.iter().all(|s| s.intensity <= 1.0 && s.intensity >= 0.0));
    }

    #[test]
    fn trigger_at_capacity_is_a_no_op() {
        let mut lightning = system(2, 1);
        lightning.trigger(W, H);
        lightning.trigger(W, H);
        assert_eq!(lightning.count(), 2);
        lightning.trigger(W, H);
        assert_eq!(lightning.count(), 2, "third trigger must be dropped");
    }

    #[test]
    fn disabled_generator_ignores_triggers() {
        let mut lightning = system(5, 2);
        lightning.set_enabled(false);
        lightning.trigger(W, H);
        assert_eq!(lightning.count(), 0);
    }

    #[test]
    fn bolts_decay_and_purge() {
        let mut lightning = system(5, 3);
        lightning.trigger(W, H);
        assert_eq!(lightning.count(), 1);

        lightning.advance(0.05);
        let flash = lightning.flash_intensity();
        assert!(flash > 0.0 && flash < 1.0);

        // Max lifetime is 0.25, so this is past any bolt's end.
        lightning.advance(0.3);
        assert_eq!(lightning.count(), 0);
        assert_eq!(lightning.flash_intensity(), 0.0);
    }

    #[test]
    fn flash_tracks_the_freshest_bolt() {
        let mut lightning = system(5, 4);
        lightning.trigger(W, H);
        lightning.advance(0.1);
        let aged = lightning.flash_intensity();

        lightning.trigger(W, H);
        lightning.advance(0.0);
        assert!(lightning.flash_intensity() >= aged);
    }

    #[test]
    fn bolt_lifetime_is_short() {
        let mut lightning = system(5, 5);
        lightning.trigger(W, H);
        let bolt = &lightning.bolts()[0];
        assert!((0.15..0.25).contains(&bolt.max_lifetime));
        assert!(bolt.segments.len() >= 8);
    }
}

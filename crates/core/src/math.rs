//! Small numeric helpers plus reproducible RNG derivation.

use rand::{rngs::StdRng, SeedableRng};

/// Linear map of `value` from [min, max] to [0, 1].
///
/// Deliberately unclamped: callers that need a [0, 1] domain clamp the
/// result at the point of use.
pub fn normalize(value: f32, min: f32, max: f32) -> f32 {
    (value - min) / (max - min)
}

/// Linear interpolation between `a` and `b` by `t`.
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Derive a reproducible RNG for one subsystem from the master seed.
///
/// Each subsystem passes a distinct `domain` constant so that identical
/// master seeds still decorrelate the per-subsystem streams.
pub fn subsystem_rng(master_seed: u64, domain: u64) -> StdRng {
    let seed = master_seed ^ domain.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    StdRng::seed_from_u64(seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn normalize_maps_range_endpoints() {
        assert_eq!(normalize(980.0, 980.0, 1050.0), 0.0);
        assert_eq!(normalize(1050.0, 980.0, 1050.0), 1.0);
        // Unclamped outside the range.
        assert!(normalize(1120.0, 980.0, 1050.0) > 1.0);
        assert!(normalize(910.0, 980.0, 1050.0) < 0.0);
    }

    #[test]
    fn subsystem_rng_is_deterministic_per_domain() {
        let mut a = subsystem_rng(42, 1);
        let mut b = subsystem_rng(42, 1);
        let mut c = subsystem_rng(42, 2);
        let x: u64 = a.gen();
        assert_eq!(x, b.gen::<u64>());
        assert_ne!(x, c.gen::<u64>());
    }
}

//! Seeded random number generation.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};

/// Creates a deterministic RNG from `seed`.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Creates an RNG from `seed`, or from fresh entropy when `None`.
pub fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => create_rng(seed),
        None => create_rng(rand::random()),
    }
}

/// Draws one sample from the standard normal distribution.
pub fn gaussian<R: Rng>(rng: &mut R) -> f64 {
    StandardNormal.sample(rng)
}

/// Samples `center + N(0,1) * radius`, rejecting draws outside `[0, 1)`.
///
/// A `center` outside `[0, 1)` is clamped first so that rejection always
/// terminates. A zero radius returns the (clamped) center.
pub fn gaussian_in_unit<R: Rng>(center: f64, radius: f64, rng: &mut R) -> f64 {
    let center = clamp_unit(center);
    if radius <= 0.0 {
        return center;
    }
    loop {
        let g = center + gaussian(rng) * radius;
        if (0.0..1.0).contains(&g) {
            return g;
        }
    }
}

/// Clamps `g` into the half-open unit interval `[0, 1)`.
pub fn clamp_unit(g: f64) -> f64 {
    if g.is_nan() || g < 0.0 {
        0.0
    } else if g >= 1.0 {
        1.0 - f64::EPSILON
    } else {
        g
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = create_rng(7);
        let mut b = create_rng(7);
        for _ in 0..10 {
            assert_eq!(a.random::<u64>(), b.random::<u64>());
        }
    }

    #[test]
    fn test_gaussian_in_unit_stays_in_range() {
        let mut rng = create_rng(42);
        for _ in 0..1000 {
            let g = gaussian_in_unit(0.95, 0.5, &mut rng);
            assert!((0.0..1.0).contains(&g), "out of range: {g}");
        }
    }

    #[test]
    fn test_gaussian_in_unit_zero_radius() {
        let mut rng = create_rng(42);
        assert_eq!(gaussian_in_unit(0.3, 0.0, &mut rng), 0.3);
    }

    #[test]
    fn test_clamp_unit() {
        assert_eq!(clamp_unit(-0.2), 0.0);
        assert!(clamp_unit(1.0) < 1.0);
        assert_eq!(clamp_unit(0.5), 0.5);
        assert_eq!(clamp_unit(f64::NAN), 0.0);
    }
}

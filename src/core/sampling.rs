//! Sampling routines: discrete draws, warps from the unit square to
//! spheres, hemispheres, cones and disks, and their densities.
//!
//! ## Seed References
//!
//! A light choice inside a composite consumes a single variate `rj`,
//! yet the chosen child still needs a fresh variate of its own.
//! **SeedReference** threads that variate explicitly: every draw
//! consumes the seed and returns the leftover, rescaled back to
//! [0, 1), so the index choice and the child's own randomness are
//! decorrelated without drawing more numbers.

// std
use std::f64::consts::PI;
// jmist
use crate::core::geometry::{Point2f, SphericalCoordinates};
use crate::core::jmist::{clamp_t, safe_acos, safe_sqrt, Float, INV_4_PI, PI_OVER_2};
use crate::core::rng::{Random, FLOAT_ONE_MINUS_EPSILON};

/// A uniform variate which is consumed by a draw and yields what is
/// left of it.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct SeedReference(pub Float);

impl SeedReference {
    pub fn new(seed: Float) -> Self {
        SeedReference(clamp_t(seed, 0.0, FLOAT_ONE_MINUS_EPSILON))
    }
    pub fn seed(&self) -> Float {
        self.0
    }
    /// Integer uniformly distributed in `[min, max]`.
    pub fn discrete(self, min: i32, max: i32) -> (i32, SeedReference) {
        debug_assert!(min <= max);
        let n: Float = (max - min + 1) as Float;
        let s: Float = self.0 * n;
        let offset: Float = s.floor();
        let k: i32 = std::cmp::min(min + offset as i32, max);
        (k, SeedReference::new(s - offset))
    }
    /// Index drawn with probability proportional to `weights`; `None`
    /// if the weights do not sum to a positive value.
    pub fn categorical(self, weights: &[Float]) -> Option<(usize, SeedReference)> {
        let total: Float = weights.iter().sum();
        if total <= 0.0 || !total.is_finite() {
            return None;
        }
        let mut s: Float = self.0 * total;
        let last = last_positive(weights)?;
        for (i, w) in weights.iter().enumerate().take(last) {
            if *w > 0.0 && s < *w {
                return Some((i, SeedReference::new(s / *w)));
            }
            s -= *w;
        }
        Some((last, SeedReference::new(s / weights[last])))
    }
    pub fn bernoulli(self, probability: Float) -> (bool, SeedReference) {
        if self.0 < probability {
            (true, SeedReference::new(self.0 / probability))
        } else {
            (
                false,
                SeedReference::new((self.0 - probability) / (1.0 - probability)),
            )
        }
    }
    pub fn coin(self) -> (bool, SeedReference) {
        self.bernoulli(0.5)
    }
}

fn last_positive(weights: &[Float]) -> Option<usize> {
    weights.iter().rposition(|w| *w > 0.0)
}

/// Integer uniformly distributed in `[min, max]`, one draw.
pub fn discrete(min: i32, max: i32, rng: &mut dyn Random) -> i32 {
    SeedReference::new(rng.next()).discrete(min, max).0
}

/// Index drawn with probability proportional to `weights`, one draw.
pub fn categorical(weights: &[Float], rng: &mut dyn Random) -> Option<usize> {
    SeedReference::new(rng.next())
        .categorical(weights)
        .map(|(i, _)| i)
}

pub fn bernoulli(probability: Float, rng: &mut dyn Random) -> bool {
    rng.next() < probability
}

pub fn coin(rng: &mut dyn Random) -> bool {
    rng.next() < 0.5
}

pub fn uniform_on_sphere(ru: Float, rv: Float) -> SphericalCoordinates {
    SphericalCoordinates::new(safe_acos(2.0 * ru - 1.0), 2.0 * PI * rv)
}

pub fn uniform_on_upper_hemisphere(ru: Float, rv: Float) -> SphericalCoordinates {
    let mut sc = uniform_on_sphere(ru, rv);
    if sc.polar > PI_OVER_2 {
        sc.polar = PI - sc.polar;
    }
    sc
}

/// Cosine-weighted direction about the `w` axis.
pub fn diffuse(ru: Float, rv: Float) -> SphericalCoordinates {
    SphericalCoordinates::new(safe_acos(safe_sqrt(1.0 - ru)), 2.0 * PI * rv)
}

/// Direction uniformly distributed over the cone of half-angle
/// `acos(cos_theta_max)` about the `w` axis.
pub fn uniform_in_cone(ru: Float, rv: Float, cos_theta_max: Float) -> SphericalCoordinates {
    let cos_theta: Float = (1.0 - ru) + ru * cos_theta_max;
    SphericalCoordinates::new(safe_acos(cos_theta), 2.0 * PI * rv)
}

/// Uniformly distribute samples over a unit disk.
pub fn concentric_sample_disk(u: &Point2f) -> Point2f {
    // map uniform random numbers to $[-1,1]^2$
    let u_offset: Point2f = Point2f {
        x: 2.0 * u.x - 1.0,
        y: 2.0 * u.y - 1.0,
    };
    // handle degeneracy at the origin
    if u_offset.x == 0.0 && u_offset.y == 0.0 {
        return Point2f::default();
    }
    // apply concentric mapping to point
    let (r, theta) = if u_offset.x.abs() > u_offset.y.abs() {
        (u_offset.x, PI / 4.0 * (u_offset.y / u_offset.x))
    } else {
        (u_offset.y, PI_OVER_2 - PI / 4.0 * (u_offset.x / u_offset.y))
    };
    Point2f {
        x: r * theta.cos(),
        y: r * theta.sin(),
    }
}

pub fn uniform_sphere_pdf() -> Float {
    INV_4_PI
}

pub fn uniform_cone_pdf(cos_theta_max: Float) -> Float {
    1.0 / (2.0 * PI * (1.0 - cos_theta_max))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::rng::Rng;
    use proptest::prelude::*;

    #[test]
    fn discrete_covers_range_evenly() {
        let mut rng = Rng::with_sequence(3);
        let mut counts = [0_usize; 4];
        for _ in 0..40_000 {
            let k = discrete(0, 3, &mut rng);
            counts[k as usize] += 1;
        }
        for c in counts.iter() {
            assert!((*c as Float - 10_000.0).abs() < 500.0, "{:?}", counts);
        }
    }

    #[test]
    fn categorical_skips_zero_weights() {
        let weights = [0.0, 2.0, 0.0, 1.0, 0.0];
        assert_eq!(SeedReference::new(0.0).categorical(&weights).unwrap().0, 1);
        assert_eq!(SeedReference::new(0.6).categorical(&weights).unwrap().0, 1);
        assert_eq!(SeedReference::new(0.7).categorical(&weights).unwrap().0, 3);
        assert_eq!(SeedReference::new(0.99).categorical(&weights).unwrap().0, 3);
        assert!(SeedReference::new(0.5).categorical(&[0.0, 0.0]).is_none());
    }

    #[test]
    fn upper_hemisphere_never_below_horizon() {
        let mut rng = Rng::with_sequence(11);
        for _ in 0..1000 {
            let sc = uniform_on_upper_hemisphere(rng.next(), rng.next());
            assert!(sc.polar <= PI_OVER_2);
        }
    }

    #[test]
    fn coin_is_fair_and_consumes_one_variate() {
        let mut rng = Rng::with_sequence(5);
        let mut copy = rng;
        let heads = (0..10_000).filter(|_| coin(&mut rng)).count();
        assert!((heads as Float - 5_000.0).abs() < 250.0);
        for _ in 0..10_000 {
            copy.next();
        }
        assert_eq!(rng.next(), copy.next());
        assert!(SeedReference::new(0.25).coin().0);
        assert!(!SeedReference::new(0.75).coin().0);
    }

    #[test]
    fn concentric_disk_stays_inside_unit_circle() {
        let mut rng = Rng::with_sequence(21);
        for _ in 0..1000 {
            let p = concentric_sample_disk(&Point2f {
                x: rng.next(),
                y: rng.next(),
            });
            assert!(p.x * p.x + p.y * p.y <= 1.0 + 1e-12);
        }
        let center = concentric_sample_disk(&Point2f { x: 0.5, y: 0.5 });
        assert_eq!((center.x, center.y), (0.0, 0.0));
    }

    #[test]
    fn cone_density_integrates_to_one() {
        let cos_theta_max: Float = 0.8;
        let solid_angle = 2.0 * PI * (1.0 - cos_theta_max);
        assert!((uniform_cone_pdf(cos_theta_max) * solid_angle - 1.0).abs() < 1e-12);
        let mut rng = Rng::with_sequence(4);
        for _ in 0..1000 {
            let sc = uniform_in_cone(rng.next(), rng.next(), cos_theta_max);
            assert!(sc.polar.cos() >= cos_theta_max - 1e-12);
        }
    }

    proptest! {
        #[test]
        fn discrete_leftover_stays_canonical(seed in 0.0..1.0f64, n in 1i32..50) {
            let (k, rest) = SeedReference::new(seed).discrete(0, n - 1);
            prop_assert!(k >= 0 && k < n);
            prop_assert!(rest.seed() >= 0.0 && rest.seed() < 1.0);
        }

        #[test]
        fn categorical_leftover_stays_canonical(
            seed in 0.0..1.0f64,
            weights in proptest::collection::vec(0.0..10.0f64, 1..8),
        ) {
            prop_assume!(weights.iter().sum::<f64>() > 0.0);
            let (i, rest) = SeedReference::new(seed).categorical(&weights).unwrap();
            prop_assert!(weights[i] > 0.0);
            prop_assert!(rest.seed() >= 0.0 && rest.seed() < 1.0);
        }

        #[test]
        fn bernoulli_leftover_stays_canonical(seed in 0.0..1.0f64, p in 0.01..0.99f64) {
            let (_, rest) = SeedReference::new(seed).bernoulli(p);
            prop_assert!(rest.seed() >= 0.0 && rest.seed() < 1.0);
        }
    }
}

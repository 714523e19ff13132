//! Type definition of Float, otherwise constants and functions which
//! can be used almost everywhere else in the code.

// std
use std::f64::consts::PI;
use std::ops::{Add, Mul, Sub};
// others
use num;

pub type Float = f64;

pub const SHADOW_EPSILON: Float = 1.0e-6;
pub const INV_PI: Float = 0.318_309_886_183_790_671_54;
pub const INV_4_PI: Float = 0.079_577_471_545_947_667_88;
pub const PI_OVER_2: Float = 1.570_796_326_794_896_619_23;

/// Is used to write sRGB-compatible 8-bit image files.
pub fn gamma_correct(value: Float) -> Float {
    if value <= 0.003_130_8 {
        12.92 * value
    } else {
        1.055 as Float * value.powf((1.0 / 2.4) as Float) - 0.055
    }
}

/// Clamp the given value *val* to lie between the values *low* and *high*.
pub fn clamp_t<T>(val: T, low: T, high: T) -> T
where
    T: PartialOrd,
{
    if val < low {
        low
    } else if val > high {
        high
    } else {
        val
    }
}

/// Convert from angles expressed in degrees to radians.
pub fn radians(deg: Float) -> Float {
    (PI / 180.0) * deg
}

/// Convert from angles expressed in radians to degrees.
pub fn degrees(rad: Float) -> Float {
    (180.0 / PI) * rad
}

/// `acos` with its argument clamped to [-1, 1] so round-off never
/// produces a NaN.
pub fn safe_acos(x: Float) -> Float {
    clamp_t(x, -1.0, 1.0).acos()
}

/// `sqrt` of a value clamped at zero.
pub fn safe_sqrt(x: Float) -> Float {
    x.max(0.0).sqrt()
}

/// Helper function which emulates the behavior of std::upper_bound().
pub fn find_interval<P>(size: i32, pred: P) -> i32
where
    P: Fn(i32) -> bool,
{
    let mut first: i32 = 0;
    let mut len: i32 = size;
    while len > 0 {
        let half = len >> 1;
        let middle = first + half;
        // bisect range based on value of _pred_ at _middle_
        if pred(middle) {
            first = middle + 1;
            len -= half + 1;
        } else {
            len = half;
        }
    }
    clamp_t(first - 1, 0, size - 2)
}

/// Interpolate linearly between two provided values.
pub fn lerp<S, T>(t: S, a: T, b: T) -> T
where
    S: num::One,
    S: Sub<S, Output = S>,
    S: Copy,
    T: Add<T, Output = T>,
    T: Mul<S, Output = T>,
{
    let one: S = num::One::one();
    a * (one - t) + b * t
}

/// Piecewise linear interpolation of the tabulated function
/// `(xs[i], ys[i])` at `x`. Values outside the table are clamped to
/// the first or last entry.
pub fn interpolate(xs: &[Float], ys: &[Float], x: Float) -> Float {
    debug_assert_eq!(xs.len(), ys.len());
    let n = xs.len();
    if n == 0 {
        return 0.0;
    }
    if x <= xs[0] {
        return ys[0];
    }
    if x >= xs[n - 1] {
        return ys[n - 1];
    }
    let i: usize = find_interval(n as i32, |index| xs[index as usize] <= x) as usize;
    let t: Float = (x - xs[i]) / (xs[i + 1] - xs[i]);
    lerp(t, ys[i], ys[i + 1])
}

/// Returns `n` evenly spaced values from `min` to `max` inclusive.
pub fn range(min: Float, max: Float, n: usize) -> Vec<Float> {
    match n {
        0 => Vec::new(),
        1 => vec![min],
        _ => (0..n)
            .map(|i| lerp(i as Float / (n - 1) as Float, min, max))
            .collect(),
    }
}

/// Find solution(s) of the quadratic equation at<sup>2</sup> + bt + c = 0.
pub fn quadratic(a: Float, b: Float, c: Float) -> Option<(Float, Float)> {
    // find quadratic discriminant
    let discrim: Float = b * b - 4.0 * a * c;
    if discrim < 0.0 || a == 0.0 {
        None
    } else {
        let root_discrim: Float = discrim.sqrt();
        // compute quadratic _t_ values
        let q = if b < 0.0 {
            -0.5 * (b - root_discrim)
        } else {
            -0.5 * (b + root_discrim)
        };
        let mut t0: Float = q / a;
        let mut t1: Float = c / q;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1)
        }
        Some((t0, t1))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn interpolate_between_and_outside_samples() {
        let xs = [0.0, 1.0, 3.0];
        let ys = [2.0, 4.0, 0.0];
        assert!(approx_eq!(Float, interpolate(&xs, &ys, 0.5), 3.0, ulps = 4));
        assert!(approx_eq!(Float, interpolate(&xs, &ys, 2.0), 2.0, ulps = 4));
        assert_eq!(interpolate(&xs, &ys, -1.0), 2.0);
        assert_eq!(interpolate(&xs, &ys, 5.0), 0.0);
    }

    #[test]
    fn range_includes_both_ends() {
        let r = range(0.380, 0.750, 38);
        assert_eq!(r.len(), 38);
        assert!(approx_eq!(Float, r[0], 0.380, ulps = 2));
        assert!(approx_eq!(Float, r[37], 0.750, ulps = 2));
        assert!(approx_eq!(Float, r[1], 0.390, epsilon = 1e-12));
    }

    #[test]
    fn quadratic_roots_are_sorted() {
        let (t0, t1) = quadratic(1.0, -1.0, -6.0).unwrap();
        assert!(approx_eq!(Float, t0, -2.0, ulps = 4));
        assert!(approx_eq!(Float, t1, 3.0, ulps = 4));
        assert!(quadratic(1.0, 0.0, 1.0).is_none());
    }
}

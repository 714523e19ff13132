//! Spectral quantities are carried as point samples: a path owns a
//! **WavelengthPacket** (a handful of wavelengths, in nanometers) and
//! every radiometric value along that path is a **Color**, one
//! channel per wavelength of the packet.
//!
//! ## Spectra
//!
//! A continuous spectral distribution implements **Spectrum**; it is
//! evaluated at single wavelengths and sampled at whole packets.
//!
//! - ConstantSpectrum
//! - PiecewiseLinearSpectrum
//! - BlackbodySpectrum
//! - ScaledSpectrum
//!
//! ## XYZ Color
//!
//! The CIE 1931 color matching functions use the multi-lobe Gaussian
//! fit of Wyman, Sloan and Shirley ("Simple Analytic Approximations
//! to the CIE XYZ Color Matching Functions", JCGT 2013).

// std
use std::fmt::Debug;
use std::ops;
use std::ops::{Index, IndexMut};
use std::sync::Arc;
// others
use smallvec::SmallVec;
// jmist
use crate::core::jmist::{interpolate, Float};

pub const CIE_Y_INTEGRAL: Float = 106.856_895;
pub const VISIBLE_MIN_WAVELENGTH: Float = 380.0;
pub const VISIBLE_MAX_WAVELENGTH: Float = 780.0;

pub type Channels = SmallVec<[Float; 4]>;

/// The wavelengths (in nanometers) sampled along one path.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct WavelengthPacket {
    lambda: Channels,
}

impl WavelengthPacket {
    pub fn new(lambda: &[Float]) -> Self {
        WavelengthPacket {
            lambda: SmallVec::from_slice(lambda),
        }
    }
    /// `n` wavelengths from `[min, max)`, one per stratum, jittered
    /// by `u` in [0, 1).
    pub fn stratified(n: usize, min: Float, max: Float, u: Float) -> Self {
        let width: Float = (max - min) / n as Float;
        WavelengthPacket {
            lambda: (0..n).map(|i| min + (i as Float + u) * width).collect(),
        }
    }
    pub fn len(&self) -> usize {
        self.lambda.len()
    }
    pub fn is_empty(&self) -> bool {
        self.lambda.is_empty()
    }
    pub fn iter(&self) -> std::slice::Iter<'_, Float> {
        self.lambda.iter()
    }
}

impl Index<usize> for WavelengthPacket {
    type Output = Float;
    fn index(&self, index: usize) -> &Float {
        &self.lambda[index]
    }
}

/// Radiometric values, one channel per wavelength of a packet.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Color {
    pub c: Channels,
}

impl Color {
    pub fn zero(n: usize) -> Color {
        Color::constant(n, 0.0)
    }
    pub fn constant(n: usize, v: Float) -> Color {
        Color {
            c: SmallVec::from_elem(v, n),
        }
    }
    pub fn from_slice(values: &[Float]) -> Color {
        Color {
            c: SmallVec::from_slice(values),
        }
    }
    pub fn len(&self) -> usize {
        self.c.len()
    }
    pub fn is_empty(&self) -> bool {
        self.c.is_empty()
    }
    pub fn as_slice(&self) -> &[Float] {
        &self.c
    }
    pub fn total(&self) -> Float {
        self.c.iter().sum()
    }
    pub fn is_black(&self) -> bool {
        self.c.iter().all(|v| *v == 0.0)
    }
    pub fn has_nans(&self) -> bool {
        self.c.iter().any(|v| v.is_nan())
    }
    /// Negative channels set to zero.
    pub fn clamp_zero(&self) -> Color {
        Color {
            c: self.c.iter().map(|v| v.max(0.0)).collect(),
        }
    }
    /// Channel-wise quotient where `0 / 0` is zero.
    pub fn divide(&self, rhs: &Color) -> Color {
        debug_assert_eq!(self.len(), rhs.len());
        Color {
            c: self
                .c
                .iter()
                .zip(rhs.c.iter())
                .map(|(a, b)| if *a == 0.0 { 0.0 } else { a / b })
                .collect(),
        }
    }
}

impl_op_ex!(+|a: &Color, b: &Color| -> Color {
    debug_assert_eq!(a.len(), b.len());
    Color {
        c: a.c.iter().zip(b.c.iter()).map(|(x, y)| x + y).collect(),
    }
});

impl_op_ex!(*|a: &Color, b: &Color| -> Color {
    debug_assert_eq!(a.len(), b.len());
    Color {
        c: a.c.iter().zip(b.c.iter()).map(|(x, y)| x * y).collect(),
    }
});

impl_op_ex!(*|a: &Color, b: Float| -> Color {
    Color {
        c: a.c.iter().map(|x| x * b).collect(),
    }
});

impl_op_ex!(/|a: &Color, b: Float| -> Color {
    Color {
        c: a.c.iter().map(|x| x / b).collect(),
    }
});

impl_op_ex!(+=|a: &mut Color, b: &Color| {
    debug_assert_eq!(a.len(), b.len());
    for (x, y) in a.c.iter_mut().zip(b.c.iter()) {
        *x += *y;
    }
});

impl_op_ex!(*=|a: &mut Color, b: &Color| {
    debug_assert_eq!(a.len(), b.len());
    for (x, y) in a.c.iter_mut().zip(b.c.iter()) {
        *x *= *y;
    }
});

impl_op!(*=|a: &mut Color, b: Float| {
    for x in a.c.iter_mut() {
        *x *= b;
    }
});

impl Index<usize> for Color {
    type Output = Float;
    fn index(&self, index: usize) -> &Float {
        &self.c[index]
    }
}

impl IndexMut<usize> for Color {
    fn index_mut(&mut self, index: usize) -> &mut Float {
        &mut self.c[index]
    }
}

/// A continuous spectral distribution over wavelength (nanometers).
pub trait Spectrum: Debug + Send + Sync {
    fn evaluate(&self, wavelength: Float) -> Float;
    fn sample(&self, lambda: &WavelengthPacket) -> Color {
        Color {
            c: lambda.iter().map(|l| self.evaluate(*l)).collect(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ConstantSpectrum {
    pub value: Float,
}

impl ConstantSpectrum {
    pub fn new(value: Float) -> Self {
        ConstantSpectrum { value }
    }
}

impl Spectrum for ConstantSpectrum {
    fn evaluate(&self, _wavelength: Float) -> Float {
        self.value
    }
}

/// Tabulated spectrum; clamped to the first and last entries outside
/// the table.
#[derive(Debug, Clone, PartialEq)]
pub struct PiecewiseLinearSpectrum {
    wavelengths: Vec<Float>,
    values: Vec<Float>,
}

impl PiecewiseLinearSpectrum {
    pub fn new(wavelengths: &[Float], values: &[Float]) -> Self {
        assert_eq!(wavelengths.len(), values.len());
        PiecewiseLinearSpectrum {
            wavelengths: wavelengths.to_vec(),
            values: values.to_vec(),
        }
    }
}

impl Spectrum for PiecewiseLinearSpectrum {
    fn evaluate(&self, wavelength: Float) -> Float {
        interpolate(&self.wavelengths, &self.values, wavelength)
    }
}

/// Planck's law, normalized so the peak of the distribution is one.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BlackbodySpectrum {
    pub temperature: Float,
    norm: Float,
}

impl BlackbodySpectrum {
    pub fn new(temperature: Float) -> Self {
        let lambda_max: Float = 2.897_772_1e-3 / temperature * 1e9;
        let peak: Float = blackbody(lambda_max, temperature);
        BlackbodySpectrum {
            temperature,
            norm: if peak > 0.0 { 1.0 / peak } else { 0.0 },
        }
    }
}

impl Spectrum for BlackbodySpectrum {
    fn evaluate(&self, wavelength: Float) -> Float {
        blackbody(wavelength, self.temperature) * self.norm
    }
}

/// The emitted radiance of a blackbody at `lambda` (nanometers) and
/// `t` (Kelvin).
pub fn blackbody(lambda: Float, t: Float) -> Float {
    if t <= 0.0 {
        return 0.0;
    }
    const C: Float = 299_792_458.0;
    const H: Float = 6.626_069_57e-34;
    const KB: Float = 1.380_648_8e-23;
    let l: Float = lambda * 1e-9;
    let lambda5: Float = (l * l) * (l * l) * l;
    (2.0 * H * C * C) / (lambda5 * (((H * C) / (l * KB * t)).exp() - 1.0))
}

#[derive(Debug, Clone)]
pub struct ScaledSpectrum {
    pub factor: Float,
    pub inner: Arc<dyn Spectrum>,
}

impl ScaledSpectrum {
    pub fn new(factor: Float, inner: Arc<dyn Spectrum>) -> Self {
        ScaledSpectrum { factor, inner }
    }
}

impl Spectrum for ScaledSpectrum {
    fn evaluate(&self, wavelength: Float) -> Float {
        self.factor * self.inner.evaluate(wavelength)
    }
}

fn lobe(x: Float, mu: Float, sigma1: Float, sigma2: Float) -> Float {
    let t: Float = (x - mu) / if x < mu { sigma1 } else { sigma2 };
    (-0.5 * t * t).exp()
}

pub fn cie_x(lambda: Float) -> Float {
    1.056 * lobe(lambda, 599.8, 37.9, 31.0) + 0.362 * lobe(lambda, 442.0, 16.0, 26.7)
        - 0.065 * lobe(lambda, 501.1, 20.4, 26.2)
}

pub fn cie_y(lambda: Float) -> Float {
    0.821 * lobe(lambda, 568.8, 46.9, 40.5) + 0.286 * lobe(lambda, 530.9, 16.3, 31.1)
}

pub fn cie_z(lambda: Float) -> Float {
    1.217 * lobe(lambda, 437.0, 11.8, 36.0) + 0.681 * lobe(lambda, 459.0, 26.0, 13.8)
}

/// Convert XYZ to linear sRGB.
pub fn xyz_to_rgb(xyz: &[Float; 3]) -> [Float; 3] {
    [
        3.240_479 * xyz[0] - 1.537_150 * xyz[1] - 0.498_535 * xyz[2],
        -0.969_256 * xyz[0] + 1.875_991 * xyz[1] + 0.041_556 * xyz[2],
        0.055_648 * xyz[0] - 0.204_043 * xyz[1] + 1.057_311 * xyz[2],
    ]
}

#[cfg(test)]
mod test {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn color_arithmetic_is_channelwise() {
        let a = Color::from_slice(&[1.0, 2.0, 3.0]);
        let b = Color::from_slice(&[0.5, 0.0, 2.0]);
        assert_eq!(&a + &b, Color::from_slice(&[1.5, 2.0, 5.0]));
        assert_eq!(&a * &b, Color::from_slice(&[0.5, 0.0, 6.0]));
        assert_eq!(&a * 2.0, Color::from_slice(&[2.0, 4.0, 6.0]));
        assert_eq!(b.divide(&b), Color::from_slice(&[1.0, 0.0, 1.0]));
        let mut c = a.clone();
        c += &b;
        c *= 2.0;
        assert_eq!(c, Color::from_slice(&[3.0, 4.0, 10.0]));
        assert_eq!(
            Color::from_slice(&[-1.0, 2.0]).clamp_zero(),
            Color::from_slice(&[0.0, 2.0])
        );
    }

    #[test]
    fn stratified_packet_covers_range() {
        let lambda = WavelengthPacket::stratified(4, 380.0, 780.0, 0.5);
        assert_eq!(lambda.len(), 4);
        assert!(approx_eq!(Float, lambda[0], 430.0, ulps = 4));
        assert!(approx_eq!(Float, lambda[3], 730.0, ulps = 4));
    }

    #[test]
    fn cie_y_integrates_to_table_value() {
        let n = 4000;
        let dl = 400.0 / n as Float;
        let integral: Float = (0..n)
            .map(|i| cie_y(380.0 + (i as Float + 0.5) * dl) * dl)
            .sum();
        assert!((integral - CIE_Y_INTEGRAL).abs() / CIE_Y_INTEGRAL < 0.01);
    }

    #[test]
    fn blackbody_peak_is_one() {
        let s = BlackbodySpectrum::new(6500.0);
        let peak = 2.897_772_1e-3 / 6500.0 * 1e9;
        assert!(approx_eq!(Float, s.evaluate(peak), 1.0, epsilon = 1e-9));
        assert!(s.evaluate(400.0) < 1.0);
    }
}

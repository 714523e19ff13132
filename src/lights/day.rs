//! A clear sky with sun.
//!
//! The sky's luminance and chromaticity follow the analytic model of
//! Preetham, Shirley and Smits ("A Practical Analytic Model for
//! Daylight", SIGGRAPH 1999), converted to a spectrum with the CIE
//! daylight basis functions. The sun is the extraterrestrial solar
//! spectrum attenuated by Rayleigh and aerosol scattering and by
//! ozone and water vapour absorption.
//!
//! The tables below are sampled every 10nm from 380nm to 750nm; the
//! formulas take wavelengths in micrometers.

// std
use std::f64::consts::PI;
// others
use lazy_static::lazy_static;
// jmist
use crate::core::geometry::{nrm_dot_vec3f, vec3_dot_vec3f, Basis3, Ray, Vector3f};
use crate::core::interaction::SurfacePoint;
use crate::core::jmist::{interpolate, range, safe_acos, Float};
use crate::core::light::{Illuminable, Light, LightSample, RayShader, VisibilityTester};
use crate::core::rng::Random;
use crate::core::sampling::uniform_on_upper_hemisphere;
use crate::core::spectrum::{Color, Spectrum, WavelengthPacket};

const DL_MIN_WAVELENGTH: Float = 0.380;
const DL_MAX_WAVELENGTH: Float = 0.750;
const DL_SAMPLES: usize = 38;

lazy_static! {
    static ref DL_WAVELENGTHS: Vec<Float> =
        range(DL_MIN_WAVELENGTH, DL_MAX_WAVELENGTH, DL_SAMPLES);
}

#[rustfmt::skip]
const SOLAR_RADIANCE: [Float; DL_SAMPLES] = [
                               16659.0, 16233.7, // 380 - 390
    21127.5, 25888.2, 25829.1, 24232.3, 26760.5, // 400 - 440
    29658.3, 30545.4, 30057.5, 30663.7, 28830.4, // 450 - 490
    28712.1, 27825.0, 27100.6, 27233.6, 26361.3, // 500 - 540
    25503.8, 25060.2, 25311.6, 25355.9, 25134.2, // 550 - 590
    24631.5, 24173.2, 23685.3, 23212.1, 22827.7, // 600 - 640
    22339.8, 21970.2, 21526.7, 21097.9, 20728.3, // 650 - 690
    20240.4, 19870.8, 19427.2, 19072.4, 18628.9, // 700 - 740
    18259.2,                                     // 750
];

#[rustfmt::skip]
const S0: [Float; DL_SAMPLES] = [
                                                            63.4,  65.8, // 380 - 390
     94.8, 104.8, 105.9,  96.8, 113.9, 125.6, 125.5, 121.3, 121.3, 113.5, // 400 - 490
    113.1, 110.8, 106.5, 108.8, 105.3, 104.4, 100.0,  96.0,  95.1,  89.1, // 500 - 590
     90.5,  90.3,  88.4,  84.0,  85.1,  81.9,  82.6,  84.9,  81.3,  71.9, // 600 - 690
     74.3,  76.4,  63.3,  71.7,  77.0,  65.2,                             // 700 - 750
];
const YS0: Float = 7.337_829_773_850_2e6;

#[rustfmt::skip]
const S1: [Float; DL_SAMPLES] = [
                                                            38.5,  35.0, // 380 - 390
     43.4,  46.3,  43.9,  37.1,  36.7,  35.9,  32.6,  27.9,  24.3,  20.1, // 400 - 490
     16.2,  13.2,   8.6,   6.1,   4.2,   1.9,   0.0,  -1.6,  -3.5,  -3.5, // 500 - 590
     -5.8,  -7.2,  -8.6,  -9.5, -10.9, -10.7, -12.0, -14.0, -13.6, -12.0, // 600 - 690
    -13.3, -12.9, -10.6, -11.6, -12.2, -10.2,                             // 700 - 750
];
const YS1: Float = 1.473_986_415_075_0e5;

#[rustfmt::skip]
const S2: [Float; DL_SAMPLES] = [
                                                             3.0,   1.2, // 380 - 390
     -1.1,  -0.5,  -0.7,  -1.2,  -2.6,  -2.9,  -2.8,  -2.6,  -2.6,  -1.8, // 400 - 490
     -1.5,  -1.3,  -1.2,  -1.0,  -0.5,  -0.3,  -0.0,   0.2,   0.5,   2.1, // 500 - 590
      3.2,   4.1,   4.7,   5.1,   6.7,   7.3,   8.6,   9.8,  10.2,   8.3, // 600 - 690
      9.6,   8.5,   7.0,   7.6,   8.0,   6.7,                             // 700 - 750
];
const YS2: Float = 5.116_054_713_410_0e4;

/// ozone absorption
#[rustfmt::skip]
const KO: [Float; DL_SAMPLES] = [
                                                     0.0,  0.0, // 380 - 390
     0.0,  0.0,  0.0,  0.0,  0.0,  0.3,  0.6,  0.9,  1.4,  2.1, // 400 - 490
     3.0,  4.0,  4.8,  6.3,  7.5,  8.5, 10.3, 12.0, 12.0, 11.5, // 500 - 590
    12.5, 12.0, 10.5,  9.0,  7.9,  6.7,  5.7,  4.8,  3.6,  2.8, // 600 - 690
     2.3,  1.8,  1.4,  1.1,  1.0,  0.9,                         // 700 - 750
];

/// water vapour absorption
#[rustfmt::skip]
const KWA: [Float; DL_SAMPLES] = [
                                                                    0.00,   0.00, // 380 - 390
    0.00,   0.00,   0.00,   0.00,   0.00,   0.00,   0.00,   0.00,   0.00,   0.00, // 400 - 490
    0.00,   0.00,   0.00,   0.00,   0.00,   0.00,   0.00,   0.00,   0.00,   0.00, // 500 - 590
    0.00,   0.00,   0.00,   0.00,   0.00,   0.00,   0.00,   0.00,   0.00,   1.60, // 600 - 690
    2.40,   1.25, 100.00,  87.00,   6.10,   0.10,                                 // 700 - 750
];

// Perez distribution coefficients, linear in turbidity
const TY0: [Float; 5] = [-1.4630, 0.4275, 5.3251, -2.5771, 0.3703];
const TY1: [Float; 5] = [0.1787, -0.3554, -0.0227, 0.1206, -0.0670];
const TX0: [Float; 5] = [-0.2592, 0.0008, 0.2125, -0.8989, 0.0452];
const TX1: [Float; 5] = [-0.0193, -0.0665, -0.0004, -0.0641, -0.0033];
const TYC0: [Float; 5] = [-0.2608, 0.0092, 0.2102, -1.6537, 0.0529];
const TYC1: [Float; 5] = [-0.0167, -0.0950, -0.0079, -0.0441, -0.0109];

// zenith chromaticity, quadratic in turbidity and cubic in sun angle
const TXZ: [[Float; 4]; 3] = [
    [0.0017, -0.0037, 0.0021, 0.0000],
    [-0.0290, 0.0638, -0.0320, 0.0039],
    [0.1169, -0.2120, 0.0605, 0.2589],
];
const TYZ: [[Float; 4]; 3] = [
    [0.0028, -0.0061, 0.0032, 0.0000],
    [-0.0421, 0.0897, -0.0415, 0.0052],
    [0.1535, -0.2676, 0.0667, 0.2669],
];

fn zenith_chromaticity(table: &[[Float; 4]; 3], turbidity: Float, theta_s: Float) -> Float {
    let t2: Float = turbidity * turbidity;
    let coefficient =
        |k: usize| -> Float { t2 * table[0][k] + turbidity * table[1][k] + table[2][k] };
    ((coefficient(0) * theta_s + coefficient(1)) * theta_s + coefficient(2)) * theta_s
        + coefficient(3)
}

fn nm_to_um(lambda: Float) -> Float {
    lambda * 1.0e-3
}

#[derive(Debug, Clone)]
pub struct DayLight {
    sun: Vector3f,
    zenith: Vector3f,
    daytime: bool,
    airmass: Float,
    y0: Float,
    x0: Float,
    yc0: Float,
    f_y: [Float; 5],
    f_x: [Float; 5],
    f_yc: [Float; 5],
    tau_o: Vec<Float>,
    tau_wa: Vec<Float>,
    alpha: Float,
    beta: Float,
    shadows: bool,
}

impl DayLight {
    pub fn new(sun: &Vector3f, zenith: &Vector3f, turbidity: Float, shadows: bool) -> Self {
        // ozone layer thickness (cm) and precipitable water vapour (cm)
        let l: Float = 0.0035;
        let w: Float = 0.02;
        let sun: Vector3f = sun.normalize();
        let zenith: Vector3f = zenith.normalize();
        let sdotz: Float = vec3_dot_vec3f(&sun, &zenith);
        let theta_s: Float = safe_acos(sdotz);
        let airmass: Float =
            1.0 / (sdotz + 0.15 * (93.885 - theta_s * (180.0 / PI)).powf(-1.253));
        let mut f_y = [0.0; 5];
        let mut f_x = [0.0; 5];
        let mut f_yc = [0.0; 5];
        for i in 0..5 {
            f_y[i] = TY0[i] + turbidity * TY1[i];
            f_x[i] = TX0[i] + turbidity * TX1[i];
            f_yc[i] = TYC0[i] + turbidity * TYC1[i];
        }
        let chi: Float = (4.0 / 9.0 - turbidity / 120.0) * (PI - 2.0 * theta_s);
        let yz: Float = (4.0453 * turbidity - 4.9710) * chi.tan() - 0.2155 * turbidity + 2.4192;
        let xz: Float = zenith_chromaticity(&TXZ, turbidity, theta_s);
        let ycz: Float = zenith_chromaticity(&TYZ, turbidity, theta_s);
        let tau_o: Vec<Float> = KO.iter().map(|k| (-k * l * airmass).exp()).collect();
        let tau_wa: Vec<Float> = KWA
            .iter()
            .map(|k| {
                let kwm: Float = k * w * airmass;
                (-0.2385 * kwm / (1.0 + 20.07 * kwm).powf(0.45)).exp()
            })
            .collect();
        let mut light = DayLight {
            sun,
            zenith,
            daytime: sdotz > 0.0,
            airmass,
            y0: 1.0,
            x0: 1.0,
            yc0: 1.0,
            f_y,
            f_x,
            f_yc,
            tau_o,
            tau_wa,
            alpha: 1.3,
            beta: 0.04608 * turbidity - 0.04586,
            shadows,
        };
        light.y0 = yz / light.perez(&zenith, &light.f_y);
        light.x0 = xz / light.perez(&zenith, &light.f_x);
        light.yc0 = ycz / light.perez(&zenith, &light.f_yc);
        light
    }
    /// Sun and zenith straight up, turbidity 2, with shadows.
    pub fn default_sky() -> Self {
        let up = Vector3f::new(0.0, 1.0, 0.0);
        DayLight::new(&up, &up, 2.0, true)
    }
    pub fn is_daytime(&self) -> bool {
        self.daytime
    }
    fn perez(&self, v: &Vector3f, f: &[Float; 5]) -> Float {
        let zdotv: Float = vec3_dot_vec3f(&self.zenith, v);
        let sdotv: Float = vec3_dot_vec3f(&self.sun, v);
        let gamma: Float = safe_acos(sdotv);
        (1.0 + f[0] * (f[1] / zdotv).exp()) * (1.0 + f[2] * (f[3] * gamma).exp() + f[4] * sdotv * sdotv)
    }
    /// The radiance spectrum of the sky seen in direction `source`.
    pub fn sky_radiance(&self, source: &Vector3f) -> SkyRadiance {
        let y: Float = (self.y0 * self.perez(source, &self.f_y)).max(0.0);
        let x: Float = self.x0 * self.perez(source, &self.f_x);
        let yc: Float = self.yc0 * self.perez(source, &self.f_yc);
        let denom: Float = 0.0241 + 0.2562 * x - 0.7341 * yc;
        let m1: Float = (-1.3515 - 1.7703 * x + 5.9114 * yc) / denom;
        let m2: Float = (0.0300 - 31.4424 * x + 30.0717 * yc) / denom;
        let ys: Float = YS0 + m1 * YS1 + m2 * YS2;
        SkyRadiance {
            y_factor: y / ys,
            m1,
            m2,
        }
    }
    /// Solar radiance arriving at the ground at `lambda` (nanometers).
    pub fn solar_radiance(&self, lambda: Float) -> Float {
        let wavelength: Float = nm_to_um(lambda);
        let h0: Float = interpolate(&DL_WAVELENGTHS, &SOLAR_RADIANCE, wavelength);
        let tau_r: Float = (-0.008735 * wavelength.powf(-4.08 * self.airmass)).exp();
        let tau_a: Float = (-self.beta * wavelength.powf(-self.alpha * self.airmass)).exp();
        let tau_o: Float = interpolate(&DL_WAVELENGTHS, &self.tau_o, wavelength);
        let tau_wa: Float = interpolate(&DL_WAVELENGTHS, &self.tau_wa, wavelength);
        h0 * tau_r * tau_a * tau_o * tau_wa
    }
    fn solar(&self, lambda: &WavelengthPacket) -> Color {
        Color {
            c: lambda.iter().map(|l| self.solar_radiance(*l)).collect(),
        }
    }
    fn visibility(&self, x: &SurfacePoint, source: &Vector3f) -> VisibilityTester {
        if self.shadows {
            VisibilityTester::Ray {
                ray: Ray::new(x.p, *source),
            }
        } else {
            VisibilityTester::Unshadowed
        }
    }
}

/// The sky radiance along one direction. Computed per query, never
/// stored on the light.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SkyRadiance {
    y_factor: Float,
    m1: Float,
    m2: Float,
}

impl Spectrum for SkyRadiance {
    fn evaluate(&self, lambda: Float) -> Float {
        let wavelength: Float = nm_to_um(lambda);
        let s0: Float = interpolate(&DL_WAVELENGTHS, &S0, wavelength);
        let s1: Float = interpolate(&DL_WAVELENGTHS, &S1, wavelength);
        let s2: Float = interpolate(&DL_WAVELENGTHS, &S2, wavelength);
        self.y_factor * (s0 + self.m1 * s1 + self.m2 * s2)
    }
}

impl RayShader for DayLight {
    fn shade_ray(&self, ray: &Ray, lambda: &WavelengthPacket) -> Color {
        let d: Vector3f = match ray.d.try_normalize() {
            Some(d) => d,
            None => return Color::zero(lambda.len()),
        };
        if vec3_dot_vec3f(&d, &self.zenith) <= 0.0 {
            return Color::zero(lambda.len());
        }
        self.sky_radiance(&d).sample(lambda)
    }
}

impl Light for DayLight {
    /// Draws one sky direction over the upper hemisphere and, while
    /// the sun is up, adds a sample for the sun.
    fn illuminate(
        &self,
        x: &SurfacePoint,
        lambda: &WavelengthPacket,
        rng: &mut dyn Random,
        target: &mut dyn Illuminable,
    ) {
        let (ru, rv) = (rng.next(), rng.next());
        let source: Vector3f =
            uniform_on_upper_hemisphere(ru, rv).to_cartesian(&Basis3::from_w(&self.zenith));
        if nrm_dot_vec3f(&x.n, &source) > 0.0 {
            let sdotn: Float = nrm_dot_vec3f(&x.ns, &source);
            let radiance: Color = self.sky_radiance(&source).sample(lambda);
            target.add_light_sample(LightSample::new(
                source,
                radiance * sdotn,
                self.visibility(x, &source),
            ));
        }
        if self.daytime && nrm_dot_vec3f(&x.n, &self.sun) > 0.0 {
            let sdotn: Float = nrm_dot_vec3f(&x.ns, &self.sun);
            target.add_light_sample(LightSample::new(
                self.sun,
                self.solar(lambda) * sdotn,
                self.visibility(x, &self.sun),
            ));
        }
    }
}

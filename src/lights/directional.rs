// std
use std::sync::Arc;
// jmist
use crate::core::geometry::{vec3_dot_nrmf, Ray, Vector3f};
use crate::core::interaction::SurfacePoint;
use crate::core::light::{Illuminable, Light, LightSample, VisibilityTester};
use crate::core::rng::Random;
use crate::core::spectrum::{Color, Spectrum, WavelengthPacket};

/// Light arriving from a single direction everywhere.
#[derive(Debug, Clone)]
pub struct DirectionalLight {
    /// unit direction towards the light
    pub from: Vector3f,
    pub irradiance: Arc<dyn Spectrum>,
    pub shadows: bool,
}

impl DirectionalLight {
    pub fn new(from: &Vector3f, irradiance: Arc<dyn Spectrum>, shadows: bool) -> Self {
        DirectionalLight {
            from: from.normalize(),
            irradiance,
            shadows,
        }
    }
}

impl Light for DirectionalLight {
    /// The delivered intensity is not clamped: a receiver facing away
    /// from the light gets a non-positive sample, which the caller
    /// discards.
    fn illuminate(
        &self,
        x: &SurfacePoint,
        lambda: &WavelengthPacket,
        _rng: &mut dyn Random,
        target: &mut dyn Illuminable,
    ) {
        let ndotl = vec3_dot_nrmf(&self.from, &x.ns);
        let intensity: Color = self.irradiance.sample(lambda) * ndotl;
        let visibility = if self.shadows {
            VisibilityTester::Ray {
                ray: Ray::new(x.p, self.from),
            }
        } else {
            VisibilityTester::Unshadowed
        };
        target.add_light_sample(LightSample::new(self.from, intensity, visibility));
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::geometry::{Normal3f, Point3f};
    use crate::core::rng::Rng;
    use crate::core::spectrum::ConstantSpectrum;
    use float_cmp::approx_eq;

    #[test]
    fn facing_light_gets_cosine_weighted_irradiance() {
        let light = DirectionalLight::new(
            &Vector3f::new(0.0, 0.0, 2.0),
            Arc::new(ConstantSpectrum::new(3.0)),
            false,
        );
        let n = Normal3f::new(0.0, 1.0, 1.0);
        let x = SurfacePoint::new(Point3f::default(), n);
        let lambda = WavelengthPacket::new(&[450.0, 550.0, 650.0]);
        let mut samples: Vec<LightSample> = Vec::new();
        light.illuminate(&x, &lambda, &mut Rng::new(), &mut samples);
        assert_eq!(samples.len(), 1);
        let expected = 3.0 * (0.5 as f64).sqrt();
        for c in samples[0].intensity.as_slice() {
            assert!(approx_eq!(f64, *c, expected, epsilon = 1e-12));
        }
        assert_eq!(samples[0].visibility, VisibilityTester::Unshadowed);
    }

    #[test]
    fn antiparallel_receiver_is_not_clamped_by_the_light() {
        let light = DirectionalLight::new(
            &Vector3f::new(0.0, 0.0, 1.0),
            Arc::new(ConstantSpectrum::new(2.0)),
            true,
        );
        let x = SurfacePoint::new(Point3f::default(), Normal3f::new(0.0, 0.0, -1.0));
        let lambda = WavelengthPacket::new(&[500.0, 600.0]);
        let mut samples: Vec<LightSample> = Vec::new();
        light.illuminate(&x, &lambda, &mut Rng::new(), &mut samples);
        assert_eq!(samples.len(), 1);
        assert!(samples[0].intensity.as_slice().iter().all(|c| *c <= 0.0));
        assert!(samples[0].intensity.clamp_zero().is_black());
    }
}

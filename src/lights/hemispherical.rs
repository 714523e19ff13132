// std
use std::sync::Arc;
// jmist
use crate::core::geometry::{nrm_dot_vec3f, Basis3, Ray, Vector3f};
use crate::core::interaction::SurfacePoint;
use crate::core::jmist::Float;
use crate::core::light::{Illuminable, Light, LightSample, RayShader, VisibilityTester};
use crate::core::rng::Random;
use crate::core::sampling::uniform_on_upper_hemisphere;
use crate::core::spectrum::WavelengthPacket;

/// Light arriving from the hemisphere about `zenith`, at infinity.
#[derive(Clone)]
pub struct HemisphericalLight {
    pub environment: Arc<dyn RayShader>,
    pub zenith: Vector3f,
    pub shadows: bool,
}

impl HemisphericalLight {
    pub fn new(environment: Arc<dyn RayShader>, zenith: &Vector3f, shadows: bool) -> Self {
        HemisphericalLight {
            environment,
            zenith: zenith.normalize(),
            shadows,
        }
    }
}

impl Light for HemisphericalLight {
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
        let ndotl: Float = nrm_dot_vec3f(&x.ns, &source);
        if ndotl <= 0.0 {
            return;
        }
        let ray = Ray::new(x.p, source);
        let visibility = if self.shadows {
            VisibilityTester::Ray { ray }
        } else {
            VisibilityTester::Unshadowed
        };
        target.add_light_sample(LightSample::new(
            source,
            self.environment.shade_ray(&ray, lambda) * ndotl,
            visibility,
        ));
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::geometry::{vec3_dot_vec3f, Normal3f, Point3f};
    use crate::core::rng::Rng;
    use crate::core::spectrum::ConstantSpectrum;
    use crate::lights::environment::UniformShader;

    #[test]
    fn samples_come_from_above_the_horizon() {
        let zenith = Vector3f::new(0.0, 1.0, 0.0);
        let light = HemisphericalLight::new(
            Arc::new(UniformShader::new(Arc::new(ConstantSpectrum::new(1.0)))),
            &zenith,
            true,
        );
        let x = SurfacePoint::new(Point3f::default(), Normal3f::new(1.0, 1.0, 0.0));
        let lambda = WavelengthPacket::new(&[550.0]);
        let mut rng = Rng::with_sequence(6);
        let mut samples: Vec<LightSample> = Vec::new();
        for _ in 0..200 {
            light.illuminate(&x, &lambda, &mut rng, &mut samples);
        }
        assert!(!samples.is_empty() && samples.len() < 200);
        for s in samples.iter() {
            assert!(vec3_dot_vec3f(&s.direction, &zenith) >= 0.0);
            assert!(s.intensity[0] > 0.0 && s.intensity[0] <= 1.0);
        }
    }
}

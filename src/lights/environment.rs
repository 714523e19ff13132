// std
use std::fmt;
use std::sync::Arc;
// jmist
use crate::core::geometry::{nrm_dot_vec3f, Ray, Vector3f};
use crate::core::interaction::SurfacePoint;
use crate::core::jmist::Float;
use crate::core::light::{Illuminable, Light, LightSample, RayShader, VisibilityTester};
use crate::core::rng::Random;
use crate::core::sampling::uniform_on_sphere;
use crate::core::spectrum::{Color, Spectrum, WavelengthPacket};

/// Shades every ray with the same spectrum.
#[derive(Debug, Clone)]
pub struct UniformShader {
    pub spectrum: Arc<dyn Spectrum>,
}

impl UniformShader {
    pub fn new(spectrum: Arc<dyn Spectrum>) -> Self {
        UniformShader { spectrum }
    }
}

impl RayShader for UniformShader {
    fn shade_ray(&self, _ray: &Ray, lambda: &WavelengthPacket) -> Color {
        self.spectrum.sample(lambda)
    }
}

/// Light arriving from every direction, with the color along each
/// direction given by a **RayShader**.
#[derive(Clone)]
pub struct EnvironmentLight {
    pub shader: Arc<dyn RayShader>,
    pub shadows: bool,
}

impl EnvironmentLight {
    pub fn new(shader: Arc<dyn RayShader>, shadows: bool) -> Self {
        EnvironmentLight { shader, shadows }
    }
}

impl fmt::Debug for EnvironmentLight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvironmentLight")
            .field("shadows", &self.shadows)
            .finish()
    }
}

impl Light for EnvironmentLight {
    /// A direction is drawn over the whole sphere and flipped into the
    /// hemisphere about the shading normal; the factor one half undoes
    /// the doubled density of the flip.
    fn illuminate(
        &self,
        x: &SurfacePoint,
        lambda: &WavelengthPacket,
        rng: &mut dyn Random,
        target: &mut dyn Illuminable,
    ) {
        let (ru, rv) = (rng.next(), rng.next());
        let mut source: Vector3f = uniform_on_sphere(ru, rv).to_cartesian(&x.basis);
        let mut ndotl: Float = nrm_dot_vec3f(&x.ns, &source);
        if ndotl < 0.0 {
            source = -source;
            ndotl = -ndotl;
        }
        let ray = Ray::new(x.p, source);
        let visibility = if self.shadows {
            VisibilityTester::Ray { ray }
        } else {
            VisibilityTester::Unshadowed
        };
        target.add_light_sample(LightSample::new(
            source,
            self.shader.shade_ray(&ray, lambda) * (0.5 * ndotl),
            visibility,
        ));
    }
}

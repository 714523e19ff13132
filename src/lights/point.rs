// std
use std::sync::Arc;
// jmist
use crate::core::geometry::{
    nrm_dot_vec3f, Basis3, HPoint3f, Point3f, Ray, Vector3f,
};
use crate::core::interaction::SurfacePoint;
use crate::core::jmist::{Float, INV_4_PI};
use crate::core::light::{Illuminable, Light, LightError, LightSample, VisibilityTester};
use crate::core::path::{LightNode, PathInfo, PathNode, ScaledLightNode, ScatteredRay};
use crate::core::rng::Random;
use crate::core::sampling::{uniform_on_sphere, uniform_sphere_pdf};
use crate::core::spectrum::{Color, Spectrum, WavelengthPacket};

/// Isotropic point light source that emits the same amount of light
/// in all directions.
#[derive(Debug, Clone)]
pub struct PointLight {
    pub position: Point3f,
    /// total emitted power
    pub power: Arc<dyn Spectrum>,
    pub shadows: bool,
}

impl PointLight {
    pub fn new(position: Point3f, power: Arc<dyn Spectrum>, shadows: bool) -> Self {
        PointLight {
            position,
            power,
            shadows,
        }
    }
}

impl Light for PointLight {
    fn illuminate(
        &self,
        x: &SurfacePoint,
        lambda: &WavelengthPacket,
        _rng: &mut dyn Random,
        target: &mut dyn Illuminable,
    ) {
        let to_light: Vector3f = self.position - x.p;
        let d2: Float = to_light.length_squared();
        if d2 == 0.0 {
            return;
        }
        let l: Vector3f = to_light / d2.sqrt();
        let attenuation: Float = nrm_dot_vec3f(&x.ns, &l).abs() * INV_4_PI / d2;
        let visibility = if self.shadows {
            VisibilityTester::Segment {
                p0: x.p,
                p1: self.position,
            }
        } else {
            VisibilityTester::Unshadowed
        };
        target.add_light_sample(LightSample::new(
            l,
            self.power.sample(lambda) * attenuation,
            visibility,
        ));
    }
    fn sample(
        &self,
        path_info: &PathInfo,
        _ru: Float,
        _rv: Float,
        _rj: Float,
    ) -> Result<Option<Box<dyn LightNode>>, LightError> {
        Ok(Some(Box::new(PointLightNode {
            path_info: path_info.clone(),
            position: self.position,
            power: self.power.sample(&path_info.lambda),
        })))
    }
    fn supports_path_sampling(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone)]
struct PointLightNode {
    path_info: PathInfo,
    position: Point3f,
    power: Color,
}

impl PathNode for PointLightNode {
    fn position(&self) -> HPoint3f {
        HPoint3f::Point(self.position)
    }
    fn cosine(&self, _v: &Vector3f) -> Float {
        1.0
    }
}

impl LightNode for PointLightNode {
    fn path_info(&self) -> &PathInfo {
        &self.path_info
    }
    fn pdf(&self) -> Float {
        1.0
    }
    fn sample(&self, ru: Float, rv: Float, _rj: Float) -> Option<ScatteredRay> {
        let d: Vector3f = uniform_on_sphere(ru, rv).to_cartesian(&Basis3::default());
        Some(ScatteredRay::diffuse(
            Ray::new(self.position, d),
            self.power.clone(),
            uniform_sphere_pdf(),
        ))
    }
    fn scatter(&self, _v: &Vector3f) -> Color {
        &self.power * INV_4_PI
    }
    fn pdf_to(&self, _v: &Vector3f) -> Float {
        uniform_sphere_pdf()
    }
    fn scaled(self: Box<Self>, pdf: Float) -> Box<dyn LightNode> {
        ScaledLightNode::wrap(pdf, self)
    }
}

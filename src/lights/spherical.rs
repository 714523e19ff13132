// std
use std::f64::consts::PI;
use std::sync::Arc;
// jmist
use crate::core::geometry::{
    nrm_dot_vec3f, pnt3_distancef, vec3_dot_vec3f, Basis3, HPoint3f, Normal3f, Point3f, Ray,
    Vector3f,
};
use crate::core::interaction::SurfacePoint;
use crate::core::jmist::{quadratic, safe_sqrt, Float, INV_PI};
use crate::core::light::{Illuminable, Light, LightError, LightSample, VisibilityTester};
use crate::core::path::{LightNode, PathInfo, PathNode, ScaledLightNode, ScatteredRay};
use crate::core::rng::Random;
use crate::core::sampling::{diffuse, uniform_in_cone, uniform_on_sphere};
use crate::core::spectrum::{Color, Spectrum, WavelengthPacket};

/// Relative distance from the surface within which a point counts as
/// lying on the sphere.
const ON_SURFACE_TOLERANCE: Float = 1.0e-6;

/// A sphere emitting uniformly and diffusely from its surface.
#[derive(Debug, Clone)]
pub struct SphericalLight {
    pub center: Point3f,
    pub radius: Float,
    /// total emitted power
    pub power: Arc<dyn Spectrum>,
    pub shadows: bool,
}

impl SphericalLight {
    pub fn new(center: Point3f, radius: Float, power: Arc<dyn Spectrum>, shadows: bool) -> Self {
        SphericalLight {
            center,
            radius,
            power,
            shadows,
        }
    }
    pub fn area(&self) -> Float {
        4.0 * PI * self.radius * self.radius
    }
    /// Emitted radiance, the same everywhere on the surface and in
    /// every outgoing direction.
    pub fn radiance(&self, lambda: &WavelengthPacket) -> Color {
        self.power.sample(lambda) / (PI * self.area())
    }
}

impl Light for SphericalLight {
    /// Samples a direction within the cone subtended by the sphere.
    /// Points inside the sphere receive nothing.
    fn illuminate(
        &self,
        x: &SurfacePoint,
        lambda: &WavelengthPacket,
        rng: &mut dyn Random,
        target: &mut dyn Illuminable,
    ) {
        let ru = rng.next();
        let rv = rng.next();
        let to_center: Vector3f = self.center - x.p;
        let d2: Float = to_center.length_squared();
        let r2: Float = self.radius * self.radius;
        if d2 <= r2 {
            return;
        }
        let cos_theta_max: Float = safe_sqrt(1.0 - r2 / d2);
        let basis: Basis3 = Basis3::from_w(&to_center);
        let l: Vector3f = uniform_in_cone(ru, rv, cos_theta_max).to_cartesian(&basis);
        // intersect the sphere
        let oc: Vector3f = x.p - self.center;
        let b: Float = 2.0 * vec3_dot_vec3f(&l, &oc);
        let c: Float = oc.length_squared() - r2;
        let t: Float = match quadratic(l.length_squared(), b, c) {
            Some((t0, _)) if t0 > 0.0 => t0,
            _ => return,
        };
        let p: Point3f = x.p + l * t;
        let n: Vector3f = (p - self.center) / self.radius;
        if vec3_dot_vec3f(&n, &l) >= 0.0 {
            return;
        }
        let ndotl: Float = nrm_dot_vec3f(&x.ns, &l).abs();
        let weight: Float = 0.5 * ndotl * (1.0 - cos_theta_max) / (PI * r2);
        let visibility = if self.shadows {
            VisibilityTester::Segment { p0: x.p, p1: p }
        } else {
            VisibilityTester::Unshadowed
        };
        target.add_light_sample(LightSample::new(
            l,
            self.power.sample(lambda) * weight,
            visibility,
        ));
    }
    /// Chooses a point uniformly on the surface.
    fn sample(
        &self,
        path_info: &PathInfo,
        ru: Float,
        rv: Float,
        _rj: Float,
    ) -> Result<Option<Box<dyn LightNode>>, LightError> {
        let n: Vector3f = uniform_on_sphere(ru, rv).to_cartesian(&Basis3::default());
        Ok(Some(Box::new(SphericalLightNode {
            path_info: path_info.clone(),
            surface: SurfacePoint::new(self.center + n * self.radius, Normal3f::from(n)),
            radiance: self.radiance(&path_info.lambda),
            pdf: 1.0 / self.area(),
        })))
    }
    fn sample_pdf(&self, x: &SurfacePoint, _path_info: &PathInfo) -> Float {
        let d: Float = pnt3_distancef(&x.p, &self.center);
        if (d - self.radius).abs() <= ON_SURFACE_TOLERANCE * self.radius.max(1.0) {
            1.0 / self.area()
        } else {
            0.0
        }
    }
    fn supports_path_sampling(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone)]
struct SphericalLightNode {
    path_info: PathInfo,
    surface: SurfacePoint,
    radiance: Color,
    pdf: Float,
}

impl PathNode for SphericalLightNode {
    fn position(&self) -> HPoint3f {
        HPoint3f::Point(self.surface.p)
    }
    fn cosine(&self, v: &Vector3f) -> Float {
        match v.try_normalize() {
            Some(v) => nrm_dot_vec3f(&self.surface.n, &v).abs(),
            None => 0.0,
        }
    }
}

impl LightNode for SphericalLightNode {
    fn path_info(&self) -> &PathInfo {
        &self.path_info
    }
    fn pdf(&self) -> Float {
        self.pdf
    }
    /// Cosine weighted about the outward normal.
    fn sample(&self, ru: Float, rv: Float, _rj: Float) -> Option<ScatteredRay> {
        let d: Vector3f = diffuse(ru, rv).to_cartesian(&self.surface.basis);
        let cos_theta: Float = nrm_dot_vec3f(&self.surface.n, &d);
        if cos_theta <= 0.0 {
            return None;
        }
        Some(ScatteredRay::diffuse(
            Ray::new(self.surface.p, d),
            &self.radiance * PI,
            cos_theta * INV_PI,
        ))
    }
    fn scatter(&self, v: &Vector3f) -> Color {
        if nrm_dot_vec3f(&self.surface.n, v) > 0.0 {
            self.radiance.clone()
        } else {
            Color::zero(self.radiance.len())
        }
    }
    fn pdf_to(&self, v: &Vector3f) -> Float {
        match v.try_normalize() {
            Some(v) => nrm_dot_vec3f(&self.surface.n, &v).max(0.0) * INV_PI,
            None => 0.0,
        }
    }
    fn scaled(self: Box<Self>, pdf: Float) -> Box<dyn LightNode> {
        ScaledLightNode::wrap(pdf, self)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::light::LightEmit;
    use crate::core::rng::Rng;
    use crate::core::spectrum::ConstantSpectrum;
    use float_cmp::approx_eq;

    fn light() -> SphericalLight {
        SphericalLight::new(
            Point3f::new(0.0, 0.0, 5.0),
            1.0,
            Arc::new(ConstantSpectrum::new(100.0)),
            true,
        )
    }

    #[test]
    fn points_inside_receive_nothing() {
        let light = light();
        let lambda = WavelengthPacket::new(&[550.0]);
        let mut rng = Rng::with_sequence(1);
        for p in [
            Point3f::new(0.0, 0.0, 5.0),
            Point3f::new(0.3, -0.2, 5.5),
            Point3f::new(0.0, 0.0, 4.0),
        ]
        .iter()
        {
            let x = SurfacePoint::new(*p, Normal3f::new(0.0, 0.0, 1.0));
            let mut samples: Vec<LightSample> = Vec::new();
            light.illuminate(&x, &lambda, &mut rng, &mut samples);
            assert!(samples.is_empty());
        }
    }

    #[test]
    fn irradiance_estimate_matches_analytic_value() {
        // a receiver facing the sphere sees irradiance Φ/(4π d²)
        let light = light();
        let lambda = WavelengthPacket::new(&[550.0]);
        let x = SurfacePoint::new(Point3f::default(), Normal3f::new(0.0, 0.0, 1.0));
        let mut rng = Rng::with_sequence(2);
        let n = 20_000;
        let mut sum: Float = 0.0;
        for _ in 0..n {
            let mut samples: Vec<LightSample> = Vec::new();
            light.illuminate(&x, &lambda, &mut rng, &mut samples);
            assert!(samples.len() <= 1);
            sum += samples.iter().map(|s| s.intensity[0]).sum::<Float>();
        }
        let expected = 100.0 / (4.0 * PI * 25.0);
        assert!((sum / n as Float - expected).abs() < 0.02 * expected);
    }

    #[test]
    fn sampled_points_lie_on_the_sphere() {
        let light = light();
        let info = PathInfo::new(WavelengthPacket::new(&[500.0, 600.0]));
        let mut rng = Rng::with_sequence(3);
        for _ in 0..100 {
            let node = light
                .sample(&info, rng.next(), rng.next(), rng.next())
                .unwrap()
                .unwrap();
            let p = node.position().to_point().unwrap();
            let x = SurfacePoint::new(p, Normal3f::from(p - light.center));
            assert!(approx_eq!(Float, light.sample_pdf(&x, &info), node.pdf(), ulps = 2));
            let sr = node.sample(rng.next(), rng.next(), rng.next()).unwrap();
            assert!(node.pdf_to(&sr.ray.d) > 0.0);
            assert!(approx_eq!(Float, node.pdf_to(&sr.ray.d), sr.pdf, epsilon = 1e-12));
        }
        let off = SurfacePoint::new(Point3f::default(), Normal3f::new(0.0, 0.0, 1.0));
        assert_eq!(light.sample_pdf(&off, &info), 0.0);
    }

    #[test]
    fn emitted_power_is_conserved() {
        // E[color] of emitted rays is the total power
        let light = light();
        let info = PathInfo::new(WavelengthPacket::new(&[550.0]));
        let mut rng = Rng::with_sequence(4);
        let n = 1000;
        let mut sum: Float = 0.0;
        for _ in 0..n {
            if let Some(sr) = light.emit(&info, &mut rng).unwrap() {
                sum += sr.color[0];
            }
        }
        assert!((sum / n as Float - 100.0).abs() < 1.0);
    }
}

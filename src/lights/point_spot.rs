// std
use std::sync::Arc;
// jmist
use crate::core::geometry::{nrm_dot_vec3f, vec3_dot_vec3f, Point3f, Vector3f};
use crate::core::interaction::SurfacePoint;
use crate::core::jmist::{radians, Float, INV_4_PI};
use crate::core::light::{Illuminable, Light, LightSample, VisibilityTester};
use crate::core::rng::Random;
use crate::core::spectrum::{Spectrum, WavelengthPacket};

/// A point light restricted to a cone about `axis`. Towards the rim
/// of the cone the emission fades out linearly in the cosine.
#[derive(Debug, Clone)]
pub struct PointSpotLight {
    pub position: Point3f,
    pub axis: Vector3f,
    min_dot: Float,
    blend_dot: Float,
    pub power: Arc<dyn Spectrum>,
    pub shadows: bool,
}

impl PointSpotLight {
    /// `angle` is the half-angle of the cone in degrees; `blend` is
    /// the fraction of the cone's radius over which the emission
    /// fades out.
    pub fn new(
        position: Point3f,
        axis: &Vector3f,
        angle: Float,
        blend: Float,
        power: Arc<dyn Spectrum>,
        shadows: bool,
    ) -> Self {
        let angle: Float = radians(angle);
        PointSpotLight {
            position,
            axis: axis.normalize(),
            min_dot: angle.cos(),
            blend_dot: (angle.sin() * (1.0 - blend)).asin().cos(),
            power,
            shadows,
        }
    }
    /// Fraction of the emission which leaves in the direction `-l`.
    pub fn falloff(&self, l: &Vector3f) -> Float {
        let vdotl: Float = -vec3_dot_vec3f(&self.axis, l);
        if vdotl <= self.min_dot {
            0.0
        } else if vdotl < self.blend_dot {
            (vdotl - self.min_dot) / (self.blend_dot - self.min_dot)
        } else {
            1.0
        }
    }
}

impl Light for PointSpotLight {
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
        let falloff: Float = self.falloff(&l);
        if falloff <= 0.0 {
            return;
        }
        let attenuation: Float = nrm_dot_vec3f(&x.ns, &l).abs() * INV_4_PI / d2 * falloff;
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
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::geometry::Normal3f;
    use crate::core::rng::Rng;
    use crate::core::spectrum::ConstantSpectrum;
    use float_cmp::approx_eq;

    fn spot() -> PointSpotLight {
        PointSpotLight::new(
            Point3f::new(0.0, 0.0, 0.0),
            &Vector3f::new(0.0, 0.0, -1.0),
            30.0,
            0.2,
            Arc::new(ConstantSpectrum::new(1.0)),
            true,
        )
    }

    fn received(light: &PointSpotLight, p: Point3f) -> Vec<LightSample> {
        let n = Normal3f::from(light.position - p);
        let x = SurfacePoint::new(p, n);
        let lambda = WavelengthPacket::new(&[550.0]);
        let mut samples: Vec<LightSample> = Vec::new();
        light.illuminate(&x, &lambda, &mut Rng::new(), &mut samples);
        samples
    }

    #[test]
    fn on_axis_receives_full_inverse_square() {
        let light = spot();
        for d in [0.5, 1.0, 3.0].iter() {
            let samples = received(&light, Point3f::new(0.0, 0.0, -d));
            assert_eq!(samples.len(), 1);
            let expected = 1.0 / (4.0 * std::f64::consts::PI * d * d);
            assert!(approx_eq!(Float, samples[0].intensity[0], expected, epsilon = 1e-12));
        }
    }

    #[test]
    fn cone_edge_and_beyond_receive_nothing() {
        let light = spot();
        let edge = radians(30.0);
        let on_edge = Point3f::new(edge.sin() * 2.0, 0.0, -edge.cos() * 2.0);
        let total: Float = received(&light, on_edge)
            .iter()
            .map(|s| s.intensity.total())
            .sum();
        assert!(total.abs() < 1e-9);
        assert!(received(&light, Point3f::new(2.0, 0.0, -1.0)).is_empty());
        assert!(received(&light, Point3f::new(0.0, 0.0, 1.0)).is_empty());
    }

    #[test]
    fn blend_region_fades_linearly_in_cosine() {
        let light = spot();
        let mid = 0.5 * (light.min_dot + light.blend_dot);
        let l = Vector3f::new(-(1.0 - mid * mid).sqrt(), 0.0, mid);
        assert!(approx_eq!(Float, light.falloff(&l), 0.5, epsilon = 1e-9));
    }
}

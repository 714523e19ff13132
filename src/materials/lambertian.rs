// std
use std::sync::Arc;
// jmist
use crate::core::geometry::{vec3_dot_vec3f, Basis3, Ray, Vector3f};
use crate::core::interaction::Intersection;
use crate::core::jmist::{Float, INV_PI};
use crate::core::material::Material;
use crate::core::path::ScatteredRay;
use crate::core::rng::Random;
use crate::core::sampling::{bernoulli, diffuse};
use crate::core::spectrum::{Color, Spectrum, WavelengthPacket};

/// Describes a purely diffuse surface.
#[derive(Debug, Clone)]
pub struct Lambertian {
    pub reflectance: Arc<dyn Spectrum>,
}

impl Lambertian {
    pub fn new(reflectance: Arc<dyn Spectrum>) -> Self {
        Lambertian { reflectance }
    }
    /// Frame about the normal on the side the incident ray arrived from.
    fn incident_basis(x: &Intersection) -> Basis3 {
        let basis: Basis3 = x.surface.basis;
        if vec3_dot_vec3f(&basis.w, &x.incident) > 0.0 {
            Basis3 {
                u: basis.u,
                v: -basis.v,
                w: -basis.w,
            }
        } else {
            basis
        }
    }
}

impl Material for Lambertian {
    /// Survives with probability equal to the reflectance of the
    /// selected channel, then scatters cosine weighted.
    fn scatter(
        &self,
        x: &Intersection,
        lambda: &WavelengthPacket,
        channel: usize,
        rng: &mut dyn Random,
    ) -> Option<ScatteredRay> {
        let r: Color = self.reflectance.sample(lambda).clamp_zero();
        let p: Float = r[channel].min(1.0);
        if !bernoulli(p, rng) {
            return None;
        }
        let (ru, rv) = (rng.next(), rng.next());
        let basis: Basis3 = Lambertian::incident_basis(x);
        let d: Vector3f = diffuse(ru, rv).to_cartesian(&basis);
        let cos_theta: Float = vec3_dot_vec3f(&d, &basis.w);
        if cos_theta <= 0.0 {
            return None;
        }
        Some(ScatteredRay::diffuse(
            Ray::new(x.location(), d),
            r / p,
            p * cos_theta * INV_PI,
        ))
    }
    fn scattering(&self, x: &Intersection, v: &Vector3f, lambda: &WavelengthPacket) -> Color {
        if x.same_side_as_incident(v) {
            self.reflectance.sample(lambda).clamp_zero() * INV_PI
        } else {
            Color::zero(lambda.len())
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::geometry::{Normal3f, Point3f};
    use crate::core::interaction::SurfacePoint;
    use crate::core::rng::Rng;
    use crate::core::spectrum::ConstantSpectrum;
    use float_cmp::approx_eq;

    fn hit_from_above(material: &dyn Material) -> Intersection<'_> {
        let ray = Ray::new(Point3f::new(0.0, 0.0, 1.0), Vector3f::new(0.0, 0.0, -1.0));
        let surface = SurfacePoint::new(Point3f::default(), Normal3f::new(0.0, 0.0, 1.0));
        Intersection::new(&ray, 1.0, surface, material)
    }

    #[test]
    fn scatters_back_towards_the_incident_side() {
        let material = Lambertian::new(Arc::new(ConstantSpectrum::new(0.8)));
        let lambda = WavelengthPacket::new(&[450.0, 650.0]);
        let x = hit_from_above(&material);
        let mut rng = Rng::with_sequence(17);
        let mut survived = 0;
        for _ in 0..2000 {
            if let Some(sr) = material.scatter(&x, &lambda, 0, &mut rng) {
                survived += 1;
                assert!(sr.ray.d.z > 0.0);
                assert!(approx_eq!(Float, sr.color[1], 1.0, epsilon = 1e-12));
                assert!(approx_eq!(
                    Float,
                    sr.pdf,
                    0.8 * sr.ray.d.z * INV_PI,
                    epsilon = 1e-12
                ));
            }
        }
        assert!((survived as Float / 2000.0 - 0.8).abs() < 0.05);
    }

    #[test]
    fn flips_for_hits_from_below() {
        let material = Lambertian::new(Arc::new(ConstantSpectrum::new(1.0)));
        let lambda = WavelengthPacket::new(&[550.0]);
        let ray = Ray::new(Point3f::new(0.0, 0.0, -1.0), Vector3f::new(0.0, 0.0, 1.0));
        let surface = SurfacePoint::new(Point3f::default(), Normal3f::new(0.0, 0.0, 1.0));
        let x = Intersection::new(&ray, 1.0, surface, &material);
        let mut rng = Rng::with_sequence(2);
        for _ in 0..100 {
            let sr = material.scatter(&x, &lambda, 0, &mut rng).unwrap();
            assert!(sr.ray.d.z < 0.0);
        }
        let below = material.scattering(&x, &Vector3f::new(0.0, 0.0, -1.0), &lambda);
        let above = material.scattering(&x, &Vector3f::new(0.0, 0.0, 1.0), &lambda);
        assert!(approx_eq!(Float, below[0], INV_PI, ulps = 2));
        assert!(above.is_black());
    }

    #[test]
    fn black_surface_absorbs() {
        let material = Lambertian::new(Arc::new(ConstantSpectrum::new(0.0)));
        let lambda = WavelengthPacket::new(&[550.0]);
        let x = hit_from_above(&material);
        let mut rng = Rng::with_sequence(9);
        assert!(material.scatter(&x, &lambda, 0, &mut rng).is_none());
    }
}

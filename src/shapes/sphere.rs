// jmist
use crate::core::geometry::{vec3_dot_vec3f, Normal3f, Point3f, Ray, Vector3f};
use crate::core::interaction::SurfacePoint;
use crate::core::jmist::{quadratic, Float};
use crate::core::shape::Shape;

/// Spheres are a special case of a general type of surfaces called
/// quadrics. The normal always points outwards.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Sphere {
    pub center: Point3f,
    pub radius: Float,
}

impl Default for Sphere {
    fn default() -> Self {
        Sphere {
            center: Point3f::default(),
            radius: 1.0,
        }
    }
}

impl Sphere {
    pub fn new(center: Point3f, radius: Float) -> Self {
        Sphere { center, radius }
    }
}

impl Shape for Sphere {
    fn intersect(&self, r: &Ray, t_min: Float, t_max: Float) -> Option<(Float, SurfacePoint)> {
        // compute quadratic sphere coefficients
        let oc: Vector3f = r.o - self.center;
        let a: Float = r.d.length_squared();
        let b: Float = 2.0 * vec3_dot_vec3f(&r.d, &oc);
        let c: Float = oc.length_squared() - self.radius * self.radius;
        // solve quadratic equation for _t_ values
        let (t0, t1) = quadratic(a, b, c)?;
        // check quadric shape _t0_ and _t1_ for nearest intersection
        let t_shape_hit: Float = if t0 > t_min && t0 < t_max {
            t0
        } else if t1 > t_min && t1 < t_max {
            t1
        } else {
            return None;
        };
        let p_hit: Point3f = r.position(t_shape_hit);
        let n: Normal3f = Normal3f::from((p_hit - self.center) / self.radius);
        Some((t_shape_hit, SurfacePoint::new(p_hit, n)))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn nearest_hit_from_outside_and_inside() {
        let sphere = Sphere::new(Point3f::new(0.0, 0.0, 5.0), 1.0);
        let ray = Ray::new(Point3f::default(), Vector3f::new(0.0, 0.0, 1.0));
        let (t, x) = sphere.intersect(&ray, 0.0, std::f64::INFINITY).unwrap();
        assert!(approx_eq!(Float, t, 4.0, epsilon = 1e-12));
        assert!(approx_eq!(Float, x.n.z, -1.0, epsilon = 1e-12));
        let inside = Ray::new(Point3f::new(0.0, 0.0, 5.0), Vector3f::new(0.0, 0.0, 1.0));
        let (t, x) = sphere.intersect(&inside, 0.0, std::f64::INFINITY).unwrap();
        assert!(approx_eq!(Float, t, 1.0, epsilon = 1e-12));
        assert!(approx_eq!(Float, x.n.z, 1.0, epsilon = 1e-12));
        assert!(!sphere.intersect_p(&ray, 0.0, 3.5));
    }
}

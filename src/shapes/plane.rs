// jmist
use crate::core::geometry::{nrm_dot_vec3f, Normal3f, Point3f, Ray, Vector3f};
use crate::core::interaction::SurfacePoint;
use crate::core::jmist::Float;
use crate::core::shape::Shape;

/// An unbounded plane through `origin`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Plane {
    pub origin: Point3f,
    pub normal: Normal3f,
}

impl Plane {
    pub fn new(origin: Point3f, normal: Normal3f) -> Self {
        Plane {
            origin,
            normal: normal.normalize(),
        }
    }
}

impl Shape for Plane {
    fn intersect(&self, r: &Ray, t_min: Float, t_max: Float) -> Option<(Float, SurfacePoint)> {
        // reject intersections for rays parallel to the plane
        let denom: Float = nrm_dot_vec3f(&self.normal, &r.d);
        if denom == 0.0 {
            return None;
        }
        let to_origin: Vector3f = self.origin - r.o;
        let t: Float = nrm_dot_vec3f(&self.normal, &to_origin) / denom;
        if t <= t_min || t >= t_max {
            return None;
        }
        Some((t, SurfacePoint::new(r.position(t), self.normal)))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn hits_from_both_sides() {
        let plane = Plane::new(Point3f::default(), Normal3f::new(0.0, 0.0, 2.0));
        let down = Ray::new(Point3f::new(1.0, 2.0, 3.0), Vector3f::new(0.0, 0.0, -1.0));
        let (t, x) = plane.intersect(&down, 0.0, std::f64::INFINITY).unwrap();
        assert!(approx_eq!(Float, t, 3.0, ulps = 2));
        assert!(approx_eq!(Float, x.p.x, 1.0, ulps = 2));
        let up = Ray::new(Point3f::new(0.0, 0.0, -1.0), Vector3f::new(0.0, 0.0, 1.0));
        assert!(plane.intersect_p(&up, 0.0, std::f64::INFINITY));
        let parallel = Ray::new(Point3f::new(0.0, 0.0, 1.0), Vector3f::new(1.0, 0.0, 0.0));
        assert!(plane.intersect(&parallel, 0.0, std::f64::INFINITY).is_none());
    }
}

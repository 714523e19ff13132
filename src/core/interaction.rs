//! The geometry of a particular point on a surface is represented by
//! a **SurfacePoint**. Having this abstraction lets lights and
//! materials work with points on surfaces without needing to consider
//! the particular type of shape the points lie on.
//!
//! An **Intersection** is a surface point found by casting a ray
//! into the scene, together with the material at that point.

// std
use std::fmt;
// jmist
use crate::core::geometry::{nrm_dot_vec3f, Basis3, Normal3f, Point3f, Ray, Vector3f};
use crate::core::jmist::Float;
use crate::core::material::Material;
use crate::core::transform::Transform;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SurfacePoint {
    /// position
    pub p: Point3f,
    /// geometric normal
    pub n: Normal3f,
    /// shading normal
    pub ns: Normal3f,
    /// local shading frame; `basis.w` is the shading normal
    pub basis: Basis3,
}

impl SurfacePoint {
    pub fn new(p: Point3f, n: Normal3f) -> Self {
        let n: Normal3f = n.normalize();
        SurfacePoint {
            p,
            n,
            ns: n,
            basis: Basis3::from_w(&Vector3f::from(n)),
        }
    }
    /// The same point expressed in the space `t` maps to.
    pub fn transformed(&self, t: &Transform) -> SurfacePoint {
        let basis: Basis3 = t.transform_basis(&self.basis);
        SurfacePoint {
            p: t.transform_point(&self.p),
            n: t.transform_normal(&self.n).normalize(),
            ns: Normal3f::from(basis.w),
            basis,
        }
    }
}

/// A ray hit on a scene primitive.
#[derive(Clone)]
pub struct Intersection<'a> {
    pub surface: SurfacePoint,
    /// direction of the ray that found this hit
    pub incident: Vector3f,
    /// ray parameter of the hit
    pub t: Float,
    pub material: &'a dyn Material,
}

impl<'a> Intersection<'a> {
    pub fn new(ray: &Ray, t: Float, surface: SurfacePoint, material: &'a dyn Material) -> Self {
        Intersection {
            surface,
            incident: ray.d,
            t,
            material,
        }
    }
    pub fn location(&self) -> Point3f {
        self.surface.p
    }
    /// `true` if `v` leaves the surface on the side the incident ray
    /// arrived from.
    pub fn same_side_as_incident(&self, v: &Vector3f) -> bool {
        let n = &self.surface.n;
        nrm_dot_vec3f(n, v) * nrm_dot_vec3f(n, &self.incident) < 0.0
    }
}

impl<'a> fmt::Debug for Intersection<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Intersection")
            .field("surface", &self.surface)
            .field("incident", &self.incident)
            .field("t", &self.t)
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn transformed_point_keeps_unit_frame() {
        let x = SurfacePoint::new(Point3f::new(1.0, 0.0, 0.0), Normal3f::new(1.0, 0.0, 0.0));
        let t = Transform::scale(2.0, 1.0, 1.0) * Transform::rotate_z(30.0);
        let y = x.transformed(&t);
        assert!(approx_eq!(Float, y.n.length(), 1.0, epsilon = 1e-12));
        assert!(approx_eq!(Float, y.basis.u.length(), 1.0, epsilon = 1e-12));
        assert!(approx_eq!(Float, y.basis.v.length(), 1.0, epsilon = 1e-12));
        let back = y.transformed(&Transform::inverse(&t));
        assert!((back.p - x.p).length() < 1e-12);
        assert!((Vector3f::from(back.n) - Vector3f::from(x.n)).length() < 1e-12);
    }
}

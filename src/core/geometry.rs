//! Almost all nontrivial graphics programs are built on a foundation
//! of geometric classes. These classes represent mathematical
//! constructs like points, vectors, and rays.
//!
//! ## Points
//!
//! A point is a zero-dimensional location in 3D space. **Point3f**
//! represents such a location with floating point coordinates.
//!
//! ## Vectors
//!
//! A vector is a quantity with a magnitude and a direction.
//! **Vector3f** is used for directions and offsets, **Normal3f** for
//! surface normals. Normals transform differently from vectors (see
//! `Transform::transform_normal`).
//!
//! ## Homogeneous Points
//!
//! Path vertices on lights "at infinity" (a directional light, the
//! sky) have no finite position. **HPoint3f** is either a finite
//! point or a direction, so a path node can carry both kinds of
//! position.
//!
//! ## Orthonormal Bases
//!
//! **Basis3** is a right-handed orthonormal frame `(u, v, w)`, used to
//! map locally sampled directions (about `w`) to world space.
//!
//! ## Rays
//!
//! A ray is a semi-infinite line specified by its origin and
//! direction.

// std
use std::ops;
use std::ops::{Index, Mul};
// others
use strum_macros::EnumIter;
// jmist
use crate::core::jmist::Float;

#[derive(Debug, Copy, Clone, EnumIter)]
pub enum XYZEnum {
    X = 0,
    Y = 1,
    Z = 2,
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Point2f {
    pub x: Float,
    pub y: Float,
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Vector3f {
    pub x: Float,
    pub y: Float,
    pub z: Float,
}

impl Vector3f {
    pub fn new(x: Float, y: Float, z: Float) -> Self {
        Vector3f { x, y, z }
    }
    pub fn has_nans(&self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }
    pub fn abs(&self) -> Vector3f {
        Vector3f {
            x: self.x.abs(),
            y: self.y.abs(),
            z: self.z.abs(),
        }
    }
    pub fn length_squared(&self) -> Float {
        self.x * self.x + self.y * self.y + self.z * self.z
    }
    pub fn length(&self) -> Float {
        self.length_squared().sqrt()
    }
    /// Compute a new vector pointing in the same direction but with unit
    /// length.
    pub fn normalize(&self) -> Vector3f {
        *self / self.length()
    }
    /// Like `normalize`, but `None` for the zero vector.
    pub fn try_normalize(&self) -> Option<Vector3f> {
        let length = self.length();
        if length > 0.0 && length.is_finite() {
            Some(*self / length)
        } else {
            None
        }
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Point3f {
    pub x: Float,
    pub y: Float,
    pub z: Float,
}

impl Point3f {
    pub fn new(x: Float, y: Float, z: Float) -> Self {
        Point3f { x, y, z }
    }
    pub fn has_nans(&self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Normal3f {
    pub x: Float,
    pub y: Float,
    pub z: Float,
}

impl Normal3f {
    pub fn new(x: Float, y: Float, z: Float) -> Self {
        Normal3f { x, y, z }
    }
    pub fn length_squared(&self) -> Float {
        self.x * self.x + self.y * self.y + self.z * self.z
    }
    pub fn length(&self) -> Float {
        self.length_squared().sqrt()
    }
    pub fn normalize(&self) -> Normal3f {
        *self / self.length()
    }
}

impl_op!(-|a: Vector3f| -> Vector3f {
    Vector3f {
        x: -a.x,
        y: -a.y,
        z: -a.z,
    }
});

impl_op!(-|a: Normal3f| -> Normal3f {
    Normal3f {
        x: -a.x,
        y: -a.y,
        z: -a.z,
    }
});

impl_op_ex!(+|a: &Vector3f, b: &Vector3f| -> Vector3f {
    Vector3f {
        x: a.x + b.x,
        y: a.y + b.y,
        z: a.z + b.z,
    }
});

impl_op_ex!(-|a: &Vector3f, b: &Vector3f| -> Vector3f {
    Vector3f {
        x: a.x - b.x,
        y: a.y - b.y,
        z: a.z - b.z,
    }
});

impl_op_ex!(+|a: &Point3f, b: &Vector3f| -> Point3f {
    Point3f {
        x: a.x + b.x,
        y: a.y + b.y,
        z: a.z + b.z,
    }
});

impl_op_ex!(-|a: &Point3f, b: &Vector3f| -> Point3f {
    Point3f {
        x: a.x - b.x,
        y: a.y - b.y,
        z: a.z - b.z,
    }
});

impl_op_ex!(-|a: &Point3f, b: &Point3f| -> Vector3f {
    Vector3f {
        x: a.x - b.x,
        y: a.y - b.y,
        z: a.z - b.z,
    }
});

impl_op_ex!(*|a: &Vector3f, b: Float| -> Vector3f {
    Vector3f {
        x: a.x * b,
        y: a.y * b,
        z: a.z * b,
    }
});

impl_op_ex!(*|a: &Normal3f, b: Float| -> Normal3f {
    Normal3f {
        x: a.x * b,
        y: a.y * b,
        z: a.z * b,
    }
});

impl_op_ex!(/|a: &Vector3f, b: Float| -> Vector3f {
    assert_ne!(b, 0.0 as Float);
    let inv: Float = 1.0 as Float / b;
    Vector3f {
        x: a.x * inv,
        y: a.y * inv,
        z: a.z * inv,
    }
});

impl_op_ex!(/|a: &Normal3f, b: Float| -> Normal3f {
    assert_ne!(b, 0.0 as Float);
    let inv: Float = 1.0 as Float / b;
    Normal3f {
        x: a.x * inv,
        y: a.y * inv,
        z: a.z * inv,
    }
});

impl Mul<Vector3f> for Float {
    type Output = Vector3f;
    fn mul(self, rhs: Vector3f) -> Vector3f {
        rhs * self
    }
}

impl Index<XYZEnum> for Vector3f {
    type Output = Float;
    fn index(&self, index: XYZEnum) -> &Float {
        match index {
            XYZEnum::X => &self.x,
            XYZEnum::Y => &self.y,
            _ => &self.z,
        }
    }
}

impl Index<XYZEnum> for Point3f {
    type Output = Float;
    fn index(&self, index: XYZEnum) -> &Float {
        match index {
            XYZEnum::X => &self.x,
            XYZEnum::Y => &self.y,
            _ => &self.z,
        }
    }
}

impl From<Point3f> for Vector3f {
    fn from(p: Point3f) -> Self {
        Vector3f {
            x: p.x,
            y: p.y,
            z: p.z,
        }
    }
}

impl From<Normal3f> for Vector3f {
    fn from(n: Normal3f) -> Self {
        Vector3f {
            x: n.x,
            y: n.y,
            z: n.z,
        }
    }
}

impl From<Vector3f> for Normal3f {
    fn from(v: Vector3f) -> Self {
        Normal3f {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

impl From<Vector3f> for Point3f {
    fn from(v: Vector3f) -> Self {
        Point3f {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

/// Product of the Euclidean magnitudes of the two vectors and the
/// cosine of the angle between them.
pub fn vec3_dot_vec3f(v1: &Vector3f, v2: &Vector3f) -> Float {
    v1.x * v2.x + v1.y * v2.y + v1.z * v2.z
}

pub fn vec3_dot_nrmf(v1: &Vector3f, n2: &Normal3f) -> Float {
    v1.x * n2.x + v1.y * n2.y + v1.z * n2.z
}

pub fn nrm_dot_vec3f(n1: &Normal3f, v2: &Vector3f) -> Float {
    n1.x * v2.x + n1.y * v2.y + n1.z * v2.z
}

/// Given two vectors in 3D, the cross product is a vector that is
/// perpendicular to both of them.
pub fn vec3_cross_vec3(v1: &Vector3f, v2: &Vector3f) -> Vector3f {
    Vector3f {
        x: (v1.y * v2.z) - (v1.z * v2.y),
        y: (v1.z * v2.x) - (v1.x * v2.z),
        z: (v1.x * v2.y) - (v1.y * v2.x),
    }
}

/// Construct a local coordinate system given only a single 3D vector.
pub fn vec3_coordinate_system(v1: &Vector3f) -> (Vector3f, Vector3f) {
    let v2: Vector3f = if v1.x.abs() > v1.y.abs() {
        Vector3f {
            x: -v1.z,
            y: 0.0 as Float,
            z: v1.x,
        } / (v1.x * v1.x + v1.z * v1.z).sqrt()
    } else {
        Vector3f {
            x: 0.0 as Float,
            y: v1.z,
            z: -v1.y,
        } / (v1.y * v1.y + v1.z * v1.z).sqrt()
    };
    let v3: Vector3f = vec3_cross_vec3(v1, &v2);
    (v2, v3)
}

/// The distance between two points is the length of the vector
/// between them.
pub fn pnt3_distancef(p1: &Point3f, p2: &Point3f) -> Float {
    (*p1 - *p2).length()
}

/// Take three basis vectors representing the x, y, and z axes and
/// return the appropriate direction vector with respect to the
/// coordinate frame defined by them.
pub fn spherical_direction_vec3(
    sin_theta: Float,
    cos_theta: Float,
    phi: Float,
    x: &Vector3f,
    y: &Vector3f,
    z: &Vector3f,
) -> Vector3f {
    *x * (sin_theta * phi.cos()) + *y * (sin_theta * phi.sin()) + *z * cos_theta
}

/// Spherical coordinates `(polar, azimuthal)`; polar is measured from
/// the `w` axis of whatever basis the direction is expressed in.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct SphericalCoordinates {
    pub polar: Float,
    pub azimuthal: Float,
}

impl SphericalCoordinates {
    pub fn new(polar: Float, azimuthal: Float) -> Self {
        SphericalCoordinates { polar, azimuthal }
    }
    pub fn to_cartesian(&self, basis: &Basis3) -> Vector3f {
        spherical_direction_vec3(
            self.polar.sin(),
            self.polar.cos(),
            self.azimuthal,
            &basis.u,
            &basis.v,
            &basis.w,
        )
    }
}

/// Right-handed orthonormal frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Basis3 {
    pub u: Vector3f,
    pub v: Vector3f,
    pub w: Vector3f,
}

impl Default for Basis3 {
    fn default() -> Self {
        Basis3 {
            u: Vector3f::new(1.0, 0.0, 0.0),
            v: Vector3f::new(0.0, 1.0, 0.0),
            w: Vector3f::new(0.0, 0.0, 1.0),
        }
    }
}

impl Basis3 {
    /// Frame whose third axis is `w`; `u` and `v` are arbitrary.
    pub fn from_w(w: &Vector3f) -> Basis3 {
        let w: Vector3f = w.normalize();
        let (u, v) = vec3_coordinate_system(&w);
        Basis3 { u, v, w }
    }
    /// Frame whose third axis is `w` and whose first axis is as close
    /// to `u` as possible.
    pub fn from_wu(w: &Vector3f, u: &Vector3f) -> Basis3 {
        let w: Vector3f = w.normalize();
        let v: Vector3f = vec3_cross_vec3(&w, u);
        match v.try_normalize() {
            Some(v) => Basis3 {
                u: vec3_cross_vec3(&v, &w),
                v,
                w,
            },
            None => Basis3::from_w(&w),
        }
    }
    pub fn to_standard(&self, local: &Vector3f) -> Vector3f {
        self.u * local.x + self.v * local.y + self.w * local.z
    }
    pub fn to_local(&self, v: &Vector3f) -> Vector3f {
        Vector3f {
            x: vec3_dot_vec3f(v, &self.u),
            y: vec3_dot_vec3f(v, &self.v),
            z: vec3_dot_vec3f(v, &self.w),
        }
    }
}

/// A point which may lie at infinity, in which case only its
/// direction is known.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum HPoint3f {
    Point(Point3f),
    Direction(Vector3f),
}

impl HPoint3f {
    pub fn is_at_infinity(&self) -> bool {
        matches!(self, HPoint3f::Direction(_))
    }
    pub fn to_point(&self) -> Option<Point3f> {
        match self {
            HPoint3f::Point(p) => Some(*p),
            HPoint3f::Direction(_) => None,
        }
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Ray {
    /// origin
    pub o: Point3f,
    /// direction
    pub d: Vector3f,
}

impl Ray {
    pub fn new(o: Point3f, d: Vector3f) -> Self {
        Ray { o, d }
    }
    // Point3f operator()(Float t) const { return o + d * t; }
    pub fn position(&self, t: Float) -> Point3f {
        self.o + self.d * t
    }
    /// Ray from `p` towards `q` (either may lie at infinity); `None`
    /// if both are at infinity or the points coincide.
    pub fn between(p: &HPoint3f, q: &HPoint3f) -> Option<Ray> {
        match (p, q) {
            (HPoint3f::Point(a), HPoint3f::Point(b)) => {
                (*b - *a).try_normalize().map(|d| Ray::new(*a, d))
            }
            (HPoint3f::Point(a), HPoint3f::Direction(v)) => {
                v.try_normalize().map(|d| Ray::new(*a, d))
            }
            (HPoint3f::Direction(v), HPoint3f::Point(b)) => {
                v.try_normalize().map(|d| Ray::new(*b, -d))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    #[test]
    fn basis_from_w_is_orthonormal() {
        let b = Basis3::from_w(&Vector3f::new(0.3, -1.0, 2.0));
        assert!(approx_eq!(Float, b.u.length(), 1.0, epsilon = 1e-12));
        assert!(approx_eq!(Float, b.v.length(), 1.0, epsilon = 1e-12));
        assert!(approx_eq!(Float, vec3_dot_vec3f(&b.u, &b.v), 0.0, epsilon = 1e-12));
        assert!(approx_eq!(Float, vec3_dot_vec3f(&b.u, &b.w), 0.0, epsilon = 1e-12));
        let w = vec3_cross_vec3(&b.u, &b.v);
        assert!(approx_eq!(Float, vec3_dot_vec3f(&w, &b.w), 1.0, epsilon = 1e-12));
    }

    #[test]
    fn hpoint_direction_is_at_infinity() {
        assert!(HPoint3f::Direction(Vector3f::new(0.0, 1.0, 0.0)).is_at_infinity());
        assert!(!HPoint3f::Point(Point3f::default()).is_at_infinity());
        assert!(Ray::between(
            &HPoint3f::Direction(Vector3f::new(0.0, 1.0, 0.0)),
            &HPoint3f::Direction(Vector3f::new(1.0, 0.0, 0.0))
        )
        .is_none());
    }

    proptest! {
        #[test]
        fn basis_round_trip(
            x in -1.0..1.0f64, y in -1.0..1.0f64, z in -1.0..1.0f64,
            lx in -5.0..5.0f64, ly in -5.0..5.0f64, lz in -5.0..5.0f64,
        ) {
            prop_assume!(x * x + y * y + z * z > 1e-3);
            let basis = Basis3::from_w(&Vector3f::new(x, y, z));
            let local = Vector3f::new(lx, ly, lz);
            let back = basis.to_local(&basis.to_standard(&local));
            prop_assert!((back - local).length() < 1e-9);
        }
    }
}

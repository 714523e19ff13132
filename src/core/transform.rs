//! In general, transformations make it possible to work in the most
//! convenient coordinate space.
//!
//! ## 4 x 4 Matrices
//!
//! The **Matrix4x4** structure provides a low-level representation of
//! 4 x 4 matrices. It is an integral part of the **Transform** class.
//!
//! ## Transformations
//!
//! A **Transform** is an invertible affine mapping from points to
//! points and from vectors to vectors. It stores both the matrix and
//! its inverse, so `apply` and `apply_inverse` are exact inverses of
//! each other and neither needs a matrix inversion at render time.
//!
//! ## Transformable Objects
//!
//! Anything that can be placed in a scene by composing affine
//! transformations implements **AffineTransformable3**. Each call
//! composes the new transformation after the ones already applied.

// std
use std::ops::Mul;
// jmist
use crate::core::geometry::{vec3_cross_vec3, Basis3, HPoint3f, Normal3f, Point3f, Ray, Vector3f};
use crate::core::jmist::{radians, Float};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Matrix4x4 {
    pub m: [[Float; 4]; 4],
}

impl Default for Matrix4x4 {
    fn default() -> Self {
        Matrix4x4 {
            m: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }
}

impl Matrix4x4 {
    pub fn new(m: [[Float; 4]; 4]) -> Self {
        Matrix4x4 { m }
    }
    pub fn transpose(m: &Matrix4x4) -> Matrix4x4 {
        let mut r = Matrix4x4::default();
        for i in 0..4 {
            for j in 0..4 {
                r.m[i][j] = m.m[j][i];
            }
        }
        r
    }
    /// Gauss-Jordan elimination with full pivoting; `None` for a
    /// singular matrix.
    pub fn inverse(m: &Matrix4x4) -> Option<Matrix4x4> {
        let mut indxc = [0_usize; 4];
        let mut indxr = [0_usize; 4];
        let mut ipiv = [0_i32; 4];
        let mut minv: Matrix4x4 = *m;
        for i in 0..4 {
            let mut irow = 0;
            let mut icol = 0;
            let mut big: Float = 0.0;
            // choose pivot
            for j in 0..4 {
                if ipiv[j] != 1 {
                    for (k, item) in ipiv.iter().enumerate() {
                        if *item == 0 {
                            let abs: Float = (minv.m[j][k]).abs();
                            if abs >= big {
                                big = abs;
                                irow = j;
                                icol = k;
                            }
                        } else if *item > 1 {
                            return None;
                        }
                    }
                }
            }
            ipiv[icol] += 1;
            // swap rows _irow_ and _icol_ for pivot
            if irow != icol {
                minv.m.swap(irow, icol);
            }
            indxr[i] = irow;
            indxc[i] = icol;
            if minv.m[icol][icol] == 0.0 {
                return None;
            }
            // set $m[icol][icol]$ to one by scaling row _icol_ appropriately
            let pivinv: Float = 1.0 / minv.m[icol][icol];
            minv.m[icol][icol] = 1.0;
            for j in 0..4 {
                minv.m[icol][j] *= pivinv;
            }
            // subtract this row from others to zero out their columns
            for j in 0..4 {
                if j != icol {
                    let save: Float = minv.m[j][icol];
                    minv.m[j][icol] = 0.0;
                    for k in 0..4 {
                        minv.m[j][k] -= minv.m[icol][k] * save;
                    }
                }
            }
        }
        // swap columns to reflect permutation
        for j in (0..4).rev() {
            if indxr[j] != indxc[j] {
                for k in 0..4 {
                    minv.m[k].swap(indxr[j], indxc[j])
                }
            }
        }
        Some(minv)
    }
}

/// The product of two matrices.
pub fn mtx_mul(m1: &Matrix4x4, m2: &Matrix4x4) -> Matrix4x4 {
    let mut r: Matrix4x4 = Matrix4x4::default();
    for i in 0..4 {
        for j in 0..4 {
            r.m[i][j] = m1.m[i][0] * m2.m[0][j]
                + m1.m[i][1] * m2.m[1][j]
                + m1.m[i][2] * m2.m[2][j]
                + m1.m[i][3] * m2.m[3][j];
        }
    }
    r
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Transform {
    pub m: Matrix4x4,
    pub m_inv: Matrix4x4,
}

impl Transform {
    /// Affine transformation from its matrix; `None` if it is not
    /// invertible.
    pub fn new(m: Matrix4x4) -> Option<Transform> {
        Matrix4x4::inverse(&m).map(|m_inv| Transform { m, m_inv })
    }
    pub fn inverse(t: &Transform) -> Transform {
        Transform {
            m: t.m_inv,
            m_inv: t.m,
        }
    }
    pub fn translate(delta: &Vector3f) -> Transform {
        Transform {
            m: Matrix4x4::new([
                [1.0, 0.0, 0.0, delta.x],
                [0.0, 1.0, 0.0, delta.y],
                [0.0, 0.0, 1.0, delta.z],
                [0.0, 0.0, 0.0, 1.0],
            ]),
            m_inv: Matrix4x4::new([
                [1.0, 0.0, 0.0, -delta.x],
                [0.0, 1.0, 0.0, -delta.y],
                [0.0, 0.0, 1.0, -delta.z],
                [0.0, 0.0, 0.0, 1.0],
            ]),
        }
    }
    pub fn scale(x: Float, y: Float, z: Float) -> Transform {
        Transform {
            m: Matrix4x4::new([
                [x, 0.0, 0.0, 0.0],
                [0.0, y, 0.0, 0.0],
                [0.0, 0.0, z, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ]),
            m_inv: Matrix4x4::new([
                [1.0 / x, 0.0, 0.0, 0.0],
                [0.0, 1.0 / y, 0.0, 0.0],
                [0.0, 0.0, 1.0 / z, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ]),
        }
    }
    pub fn rotate_x(theta: Float) -> Transform {
        let sin_theta: Float = radians(theta).sin();
        let cos_theta: Float = radians(theta).cos();
        let m = Matrix4x4::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, cos_theta, -sin_theta, 0.0],
            [0.0, sin_theta, cos_theta, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        Transform {
            m,
            m_inv: Matrix4x4::transpose(&m),
        }
    }
    pub fn rotate_y(theta: Float) -> Transform {
        let sin_theta: Float = radians(theta).sin();
        let cos_theta: Float = radians(theta).cos();
        let m = Matrix4x4::new([
            [cos_theta, 0.0, sin_theta, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [-sin_theta, 0.0, cos_theta, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        Transform {
            m,
            m_inv: Matrix4x4::transpose(&m),
        }
    }
    pub fn rotate_z(theta: Float) -> Transform {
        let sin_theta: Float = radians(theta).sin();
        let cos_theta: Float = radians(theta).cos();
        let m = Matrix4x4::new([
            [cos_theta, -sin_theta, 0.0, 0.0],
            [sin_theta, cos_theta, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        Transform {
            m,
            m_inv: Matrix4x4::transpose(&m),
        }
    }
    /// Rotation by `theta` degrees about an arbitrary `axis`.
    pub fn rotate(theta: Float, axis: &Vector3f) -> Transform {
        let a: Vector3f = axis.normalize();
        let sin_theta: Float = radians(theta).sin();
        let cos_theta: Float = radians(theta).cos();
        let mut m = Matrix4x4::default();
        // compute rotation of first basis vector
        m.m[0][0] = a.x * a.x + (1.0 - a.x * a.x) * cos_theta;
        m.m[0][1] = a.x * a.y * (1.0 - cos_theta) - a.z * sin_theta;
        m.m[0][2] = a.x * a.z * (1.0 - cos_theta) + a.y * sin_theta;
        // compute rotations of second basis vectors
        m.m[1][0] = a.x * a.y * (1.0 - cos_theta) + a.z * sin_theta;
        m.m[1][1] = a.y * a.y + (1.0 - a.y * a.y) * cos_theta;
        m.m[1][2] = a.y * a.z * (1.0 - cos_theta) - a.x * sin_theta;
        // compute rotations of third basis vectors
        m.m[2][0] = a.x * a.z * (1.0 - cos_theta) - a.y * sin_theta;
        m.m[2][1] = a.y * a.z * (1.0 - cos_theta) + a.x * sin_theta;
        m.m[2][2] = a.z * a.z + (1.0 - a.z * a.z) * cos_theta;
        Transform {
            m,
            m_inv: Matrix4x4::transpose(&m),
        }
    }
    /// Camera-to-world transformation for an eye at `pos` looking at
    /// `look`; `None` if `up` is parallel to the viewing direction.
    pub fn look_at(pos: &Point3f, look: &Point3f, up: &Vector3f) -> Option<Transform> {
        let dir: Vector3f = (*look - *pos).try_normalize()?;
        let left: Vector3f = vec3_cross_vec3(&up.normalize(), &dir).try_normalize()?;
        let new_up: Vector3f = vec3_cross_vec3(&dir, &left);
        let camera_to_world = Matrix4x4::new([
            [left.x, new_up.x, dir.x, pos.x],
            [left.y, new_up.y, dir.y, pos.y],
            [left.z, new_up.z, dir.z, pos.z],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        Transform::new(camera_to_world)
    }
    pub fn transform_point(&self, p: &Point3f) -> Point3f {
        mtx_apply_point(&self.m, p)
    }
    pub fn transform_vector(&self, v: &Vector3f) -> Vector3f {
        mtx_apply_vector(&self.m, v)
    }
    pub fn transform_normal(&self, n: &Normal3f) -> Normal3f {
        let x: Float = n.x;
        let y: Float = n.y;
        let z: Float = n.z;
        Normal3f {
            x: self.m_inv.m[0][0] * x + self.m_inv.m[1][0] * y + self.m_inv.m[2][0] * z,
            y: self.m_inv.m[0][1] * x + self.m_inv.m[1][1] * y + self.m_inv.m[2][1] * z,
            z: self.m_inv.m[0][2] * x + self.m_inv.m[1][2] * y + self.m_inv.m[2][2] * z,
        }
    }
    pub fn transform_hpoint(&self, p: &HPoint3f) -> HPoint3f {
        match p {
            HPoint3f::Point(p) => HPoint3f::Point(self.transform_point(p)),
            HPoint3f::Direction(v) => HPoint3f::Direction(self.transform_vector(v)),
        }
    }
    /// The transformed ray keeps an unnormalized direction, so ray
    /// parameters are preserved across spaces.
    pub fn transform_ray(&self, r: &Ray) -> Ray {
        Ray {
            o: self.transform_point(&r.o),
            d: self.transform_vector(&r.d),
        }
    }
    pub fn transform_basis(&self, b: &Basis3) -> Basis3 {
        let w: Vector3f = Vector3f::from(self.transform_normal(&Normal3f::from(b.w)));
        let u: Vector3f = self.transform_vector(&b.u);
        Basis3::from_wu(&w, &u)
    }
    pub fn inverse_transform_point(&self, p: &Point3f) -> Point3f {
        mtx_apply_point(&self.m_inv, p)
    }
    pub fn inverse_transform_vector(&self, v: &Vector3f) -> Vector3f {
        mtx_apply_vector(&self.m_inv, v)
    }
}

fn mtx_apply_point(m: &Matrix4x4, p: &Point3f) -> Point3f {
    let x: Float = p.x;
    let y: Float = p.y;
    let z: Float = p.z;
    let xp: Float = m.m[0][0] * x + m.m[0][1] * y + m.m[0][2] * z + m.m[0][3];
    let yp: Float = m.m[1][0] * x + m.m[1][1] * y + m.m[1][2] * z + m.m[1][3];
    let zp: Float = m.m[2][0] * x + m.m[2][1] * y + m.m[2][2] * z + m.m[2][3];
    let wp: Float = m.m[3][0] * x + m.m[3][1] * y + m.m[3][2] * z + m.m[3][3];
    if wp == 1.0 as Float {
        Point3f {
            x: xp,
            y: yp,
            z: zp,
        }
    } else {
        let inv: Float = 1.0 as Float / wp;
        Point3f {
            x: inv * xp,
            y: inv * yp,
            z: inv * zp,
        }
    }
}

fn mtx_apply_vector(m: &Matrix4x4, v: &Vector3f) -> Vector3f {
    let x: Float = v.x;
    let y: Float = v.y;
    let z: Float = v.z;
    Vector3f {
        x: m.m[0][0] * x + m.m[0][1] * y + m.m[0][2] * z,
        y: m.m[1][0] * x + m.m[1][1] * y + m.m[1][2] * z,
        z: m.m[2][0] * x + m.m[2][1] * y + m.m[2][2] * z,
    }
}

impl Mul for Transform {
    type Output = Transform;
    fn mul(self, rhs: Transform) -> Transform {
        Transform {
            m: mtx_mul(&self.m, &rhs.m),
            m_inv: mtx_mul(&rhs.m_inv, &self.m_inv),
        }
    }
}

/// Objects that can be placed by affine transformations. Rotation
/// angles are in degrees.
pub trait AffineTransformable3 {
    /// Applies `t` after any transformation already applied.
    fn transform(&mut self, t: &Transform);
    fn translate(&mut self, delta: &Vector3f) {
        self.transform(&Transform::translate(delta));
    }
    fn scale(&mut self, c: Float) {
        self.transform(&Transform::scale(c, c, c));
    }
    fn stretch(&mut self, cx: Float, cy: Float, cz: Float) {
        self.transform(&Transform::scale(cx, cy, cz));
    }
    fn rotate(&mut self, theta: Float, axis: &Vector3f) {
        self.transform(&Transform::rotate(theta, axis));
    }
    fn rotate_x(&mut self, theta: Float) {
        self.transform(&Transform::rotate_x(theta));
    }
    fn rotate_y(&mut self, theta: Float) {
        self.transform(&Transform::rotate_y(theta));
    }
    fn rotate_z(&mut self, theta: Float) {
        self.transform(&Transform::rotate_z(theta));
    }
}

impl AffineTransformable3 for Transform {
    fn transform(&mut self, t: &Transform) {
        *self = *t * *self;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;

    fn sheared() -> Transform {
        Transform::new(Matrix4x4::new([
            [2.0, 0.5, 0.0, 1.0],
            [0.0, 1.0, -0.3, -2.0],
            [0.1, 0.0, 3.0, 0.5],
            [0.0, 0.0, 0.0, 1.0],
        ]))
        .unwrap()
    }

    #[test]
    fn inverse_of_product_is_product_of_inverses() {
        let t = sheared();
        let product = mtx_mul(&t.m, &t.m_inv);
        for i in 0..4 {
            for j in 0..4 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((product.m[i][j] - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn singular_matrix_has_no_transform() {
        let mut m = Matrix4x4::default();
        m.m[2][2] = 0.0;
        assert!(Transform::new(m).is_none());
    }

    #[test]
    fn transformable_composes_after_existing() {
        let mut t = Transform::default();
        t.scale(2.0);
        t.translate(&Vector3f::new(1.0, 0.0, 0.0));
        let p = t.transform_point(&Point3f::new(1.0, 1.0, 1.0));
        assert_eq!(p, Point3f::new(3.0, 2.0, 2.0));
    }

    proptest! {
        #[test]
        fn point_round_trip(
            x in -100.0..100.0f64, y in -100.0..100.0f64, z in -100.0..100.0f64,
            theta in -180.0..180.0f64,
        ) {
            let mut t = sheared();
            t.rotate(theta, &Vector3f::new(1.0, 2.0, 3.0));
            let p = Point3f::new(x, y, z);
            let q = t.inverse_transform_point(&t.transform_point(&p));
            prop_assert!((q - p).length() < 1e-9 * (1.0 + Vector3f::from(p).length()));
            let v = Vector3f::new(x, y, z);
            let w = t.inverse_transform_vector(&t.transform_vector(&v));
            prop_assert!((w - v).length() < 1e-9 * (1.0 + v.length()));
        }
    }
}

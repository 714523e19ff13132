//! A pinhole camera maps points on the film, in `[0, 1)^2` with `y`
//! pointing down, to rays leaving the eye.

// jmist
use crate::core::error::RenderError;
use crate::core::geometry::{vec3_cross_vec3, Basis3, Point2f, Point3f, Ray, Vector3f};
use crate::core::jmist::{radians, Float};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PinholeCamera {
    pub eye: Point3f,
    /// `u` right, `v` up, `w` forward
    basis: Basis3,
    tan_half_fov: Float,
    aspect: Float,
}

impl PinholeCamera {
    /// `fov` is the vertical field of view in degrees; `aspect` is
    /// width over height.
    pub fn new(
        eye: Point3f,
        look_at: Point3f,
        up: Vector3f,
        fov: Float,
        aspect: Float,
    ) -> Result<Self, RenderError> {
        if !(fov > 0.0 && fov < 180.0) || !(aspect > 0.0) {
            return Err(RenderError::InvalidParameter(format!(
                "camera fov {} aspect {}",
                fov, aspect
            )));
        }
        let forward = (look_at - eye).try_normalize().ok_or_else(|| {
            RenderError::InvalidParameter("camera eye and look-at coincide".to_string())
        })?;
        let right = vec3_cross_vec3(&forward, &up)
            .try_normalize()
            .ok_or_else(|| {
                RenderError::InvalidParameter("camera up is parallel to view".to_string())
            })?;
        let upv: Vector3f = vec3_cross_vec3(&right, &forward);
        Ok(PinholeCamera {
            eye,
            basis: Basis3 {
                u: right,
                v: upv,
                w: forward,
            },
            tan_half_fov: (radians(fov) * 0.5).tan(),
            aspect,
        })
    }
    pub fn generate_ray(&self, p_film: &Point2f) -> Ray {
        let x: Float = (2.0 * p_film.x - 1.0) * self.tan_half_fov * self.aspect;
        let y: Float = (1.0 - 2.0 * p_film.y) * self.tan_half_fov;
        let d: Vector3f = self.basis.to_standard(&Vector3f::new(x, y, 1.0));
        Ray::new(self.eye, d.normalize())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn center_ray_looks_at_target() {
        let camera = PinholeCamera::new(
            Point3f::new(0.0, 1.0, 5.0),
            Point3f::new(0.0, 1.0, 0.0),
            Vector3f::new(0.0, 1.0, 0.0),
            40.0,
            1.5,
        )
        .unwrap();
        let ray = camera.generate_ray(&Point2f { x: 0.5, y: 0.5 });
        assert!(approx_eq!(Float, ray.d.z, -1.0, epsilon = 1e-12));
        let top = camera.generate_ray(&Point2f { x: 0.5, y: 0.0 });
        assert!(top.d.y > 0.0);
        let right = camera.generate_ray(&Point2f { x: 1.0, y: 0.5 });
        assert!(right.d.x > 0.0);
    }

    #[test]
    fn degenerate_camera_is_rejected() {
        let p = Point3f::new(0.0, 0.0, 0.0);
        let up = Vector3f::new(0.0, 1.0, 0.0);
        assert!(PinholeCamera::new(p, p, up, 40.0, 1.0).is_err());
        assert!(PinholeCamera::new(p, Point3f::new(0.0, 2.0, 0.0), up, 40.0, 1.0).is_err());
        assert!(PinholeCamera::new(p, Point3f::new(0.0, 0.0, 1.0), up, 0.0, 1.0).is_err());
    }
}

//! All geometric primitives implement a common interface, and the
//! rest of the renderer can use this interface without needing any
//! details about the underlying shape.

// jmist
use crate::core::geometry::Ray;
use crate::core::interaction::SurfacePoint;
use crate::core::jmist::Float;

pub trait Shape: Send + Sync {
    /// Nearest hit with `t` in `(t_min, t_max)`.
    fn intersect(&self, r: &Ray, t_min: Float, t_max: Float) -> Option<(Float, SurfacePoint)>;
    fn intersect_p(&self, r: &Ray, t_min: Float, t_max: Float) -> bool {
        self.intersect(r, t_min, t_max).is_some()
    }
}

//! # Scene
//!
//! A **Scene** bundles the geometry rays are cast against with the
//! light graph that illuminates it. Both are read-only once the scene
//! is built, so a single scene is shared by every render thread.

// std
use std::sync::Arc;
// jmist
use crate::core::geometry::{Ray, Vector3f};
use crate::core::interaction::Intersection;
use crate::core::jmist::{Float, SHADOW_EPSILON};
use crate::core::light::Light;
use crate::shapes::list::PrimitiveList;

/// Answers shadow queries.
pub trait VisibilityFunction: Sync {
    /// `true` if nothing blocks `ray` for `t` in `(t_min, t_max)`.
    fn visibility(&self, ray: &Ray, t_min: Float, t_max: Float) -> bool;
}

/// Answers nearest-hit queries.
pub trait Geometry: VisibilityFunction {
    fn intersect(&self, ray: &Ray, t_min: Float, t_max: Float) -> Option<Intersection<'_>>;
}

pub struct Scene {
    pub geometry: PrimitiveList,
    pub light: Arc<dyn Light>,
}

impl Scene {
    pub fn new(geometry: PrimitiveList, light: Arc<dyn Light>) -> Self {
        Scene { geometry, light }
    }
    pub fn intersect(&self, ray: &Ray) -> Option<Intersection<'_>> {
        debug_assert_ne!(ray.d, Vector3f::default());
        self.geometry
            .intersect(ray, SHADOW_EPSILON, std::f64::INFINITY)
    }
}

impl VisibilityFunction for Scene {
    fn visibility(&self, ray: &Ray, t_min: Float, t_max: Float) -> bool {
        self.geometry.visibility(ray, t_min, t_max)
    }
}

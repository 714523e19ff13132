//! A brute-force aggregate: every ray is tested against every
//! primitive. Adequate for the handful of shapes the demo scenes use.

// std
use std::sync::Arc;
// jmist
use crate::core::geometry::Ray;
use crate::core::interaction::{Intersection, SurfacePoint};
use crate::core::jmist::Float;
use crate::core::material::Material;
use crate::core::scene::{Geometry, VisibilityFunction};
use crate::core::shape::Shape;

/// A shape together with the material covering it.
#[derive(Clone)]
pub struct Primitive {
    pub shape: Arc<dyn Shape>,
    pub material: Arc<dyn Material>,
}

impl Primitive {
    pub fn new(shape: Arc<dyn Shape>, material: Arc<dyn Material>) -> Self {
        Primitive { shape, material }
    }
}

#[derive(Clone, Default)]
pub struct PrimitiveList {
    primitives: Vec<Primitive>,
}

impl PrimitiveList {
    pub fn new() -> Self {
        PrimitiveList::default()
    }
    pub fn add(&mut self, primitive: Primitive) -> &mut Self {
        self.primitives.push(primitive);
        self
    }
    pub fn len(&self) -> usize {
        self.primitives.len()
    }
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }
}

impl VisibilityFunction for PrimitiveList {
    fn visibility(&self, ray: &Ray, t_min: Float, t_max: Float) -> bool {
        !self
            .primitives
            .iter()
            .any(|p| p.shape.intersect_p(ray, t_min, t_max))
    }
}

impl Geometry for PrimitiveList {
    fn intersect(&self, ray: &Ray, t_min: Float, t_max: Float) -> Option<Intersection<'_>> {
        let mut t_max: Float = t_max;
        let mut nearest: Option<(Float, SurfacePoint, &dyn Material)> = None;
        for p in self.primitives.iter() {
            if let Some((t, surface)) = p.shape.intersect(ray, t_min, t_max) {
                // shrink the interval so only closer hits are considered
                t_max = t;
                nearest = Some((t, surface, &*p.material));
            }
        }
        nearest.map(|(t, surface, material)| Intersection::new(ray, t, surface, material))
    }
}

//! Vertices of bidirectional paths and the scattering events that
//! connect them.
//!
//! A **LightNode** is the first vertex of a light subpath: a point on
//! (or a direction towards) a light source, the density with which it
//! was chosen, and the ability to emit a ray from there. Lights that
//! choose between children wrap the chosen child's node in a
//! **ScaledLightNode** carrying the probability of that choice.

// std
use std::fmt::Debug;
// jmist
use crate::core::geometry::{vec3_dot_vec3f, HPoint3f, Ray, Vector3f};
use crate::core::jmist::Float;
use crate::core::spectrum::{Color, WavelengthPacket};
use crate::core::transform::Transform;

/// Everything the nodes of one path share.
#[derive(Debug, Clone, PartialEq)]
pub struct PathInfo {
    pub lambda: WavelengthPacket,
    pub max_depth: usize,
}

impl PathInfo {
    pub fn new(lambda: WavelengthPacket) -> Self {
        PathInfo {
            lambda,
            max_depth: 16,
        }
    }
    pub fn with_max_depth(lambda: WavelengthPacket, max_depth: usize) -> Self {
        PathInfo { lambda, max_depth }
    }
    pub fn channels(&self) -> usize {
        self.lambda.len()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ScatterType {
    Diffuse,
    Glossy,
    Specular,
}

/// A sampled scattering (or emission) event: the continuation ray,
/// its weight per channel and the density it was drawn with.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatteredRay {
    pub ray: Ray,
    pub color: Color,
    pub scatter_type: ScatterType,
    pub pdf: Float,
    pub transmitted: bool,
    /// channel this event was restricted to, for dispersive scattering
    pub dispersion: Option<usize>,
}

impl ScatteredRay {
    pub fn new(ray: Ray, color: Color, scatter_type: ScatterType, pdf: Float) -> Self {
        ScatteredRay {
            ray,
            color,
            scatter_type,
            pdf,
            transmitted: false,
            dispersion: None,
        }
    }
    pub fn diffuse(ray: Ray, color: Color, pdf: Float) -> Self {
        ScatteredRay::new(ray, color, ScatterType::Diffuse, pdf)
    }
    pub fn specular(ray: Ray, color: Color, pdf: Float) -> Self {
        ScatteredRay::new(ray, color, ScatterType::Specular, pdf)
    }
    pub fn is_specular(&self) -> bool {
        self.scatter_type == ScatterType::Specular
    }
    pub fn transform(&self, t: &Transform) -> ScatteredRay {
        let ray: Ray = t.transform_ray(&self.ray);
        ScatteredRay {
            ray: Ray::new(ray.o, ray.d.normalize()),
            ..self.clone()
        }
    }
}

/// A vertex of a path.
pub trait PathNode {
    fn position(&self) -> HPoint3f;
    /// Absolute cosine between `v` and the shading normal.
    fn cosine(&self, v: &Vector3f) -> Float;
    fn is_at_infinity(&self) -> bool {
        self.position().is_at_infinity()
    }
}

/// The terminal vertex of a light subpath.
pub trait LightNode: PathNode + Debug + Send {
    fn path_info(&self) -> &PathInfo;
    fn is_specular(&self) -> bool {
        false
    }
    /// Density with which this node was chosen.
    fn pdf(&self) -> Float;
    fn reverse_pdf(&self) -> Float {
        1.0
    }
    /// Monte Carlo weight of the subpath ending at this node.
    fn cumulative_weight(&self) -> Color {
        Color::constant(self.path_info().channels(), 1.0 / self.pdf())
    }
    /// Samples the ray emitted from this node.
    fn sample(&self, ru: Float, rv: Float, rj: Float) -> Option<ScatteredRay>;
    /// Radiance emitted from this node in direction `v`.
    fn scatter(&self, v: &Vector3f) -> Color;
    /// Density of `sample` choosing direction `v`.
    fn pdf_to(&self, v: &Vector3f) -> Float;
    /// Wraps this node to account for having been chosen with
    /// probability `pdf`.
    fn scaled(self: Box<Self>, pdf: Float) -> Box<dyn LightNode>;
}

#[derive(Debug)]
pub struct ScaledLightNode {
    pdf: Float,
    inner: Box<dyn LightNode>,
}

impl ScaledLightNode {
    /// Nested scaled nodes collapse into one carrying the product of
    /// their probabilities.
    pub fn create(pdf: Float, node: Box<dyn LightNode>) -> Box<dyn LightNode> {
        node.scaled(pdf)
    }
    pub fn wrap(pdf: Float, inner: Box<dyn LightNode>) -> Box<dyn LightNode> {
        Box::new(ScaledLightNode { pdf, inner })
    }
}

impl PathNode for ScaledLightNode {
    fn position(&self) -> HPoint3f {
        self.inner.position()
    }
    fn cosine(&self, v: &Vector3f) -> Float {
        self.inner.cosine(v)
    }
}

impl LightNode for ScaledLightNode {
    fn path_info(&self) -> &PathInfo {
        self.inner.path_info()
    }
    fn is_specular(&self) -> bool {
        self.inner.is_specular()
    }
    fn pdf(&self) -> Float {
        self.inner.pdf() * self.pdf
    }
    fn cumulative_weight(&self) -> Color {
        &self.inner.cumulative_weight() / self.pdf
    }
    fn sample(&self, ru: Float, rv: Float, rj: Float) -> Option<ScatteredRay> {
        self.inner.sample(ru, rv, rj)
    }
    fn scatter(&self, v: &Vector3f) -> Color {
        self.inner.scatter(v)
    }
    fn pdf_to(&self, v: &Vector3f) -> Float {
        self.inner.pdf_to(v)
    }
    fn scaled(self: Box<Self>, pdf: Float) -> Box<dyn LightNode> {
        ScaledLightNode::wrap(pdf * self.pdf, self.inner)
    }
}

/// Direction from `from` to `to`; `None` if both lie at infinity or
/// they coincide.
pub fn direction(from: &dyn PathNode, to: &dyn PathNode) -> Option<Vector3f> {
    Ray::between(&from.position(), &to.position()).map(|r| r.d)
}

/// The geometric coupling between two path vertices: the product of
/// the (clamped) cosines over the squared distance, or just the finite
/// vertex's cosine when the other lies at infinity.
pub fn geometric_factor(a: &dyn PathNode, b: &dyn PathNode) -> Float {
    match (a.position(), b.position()) {
        (HPoint3f::Direction(_), HPoint3f::Direction(_)) => 0.0,
        (HPoint3f::Point(_), HPoint3f::Direction(v)) => a.cosine(&v).max(0.0),
        (HPoint3f::Direction(v), HPoint3f::Point(_)) => b.cosine(&v).max(0.0),
        (HPoint3f::Point(p), HPoint3f::Point(q)) => {
            let v: Vector3f = q - p;
            let d2: Float = vec3_dot_vec3f(&v, &v);
            if d2 > 0.0 {
                a.cosine(&v).max(0.0) * b.cosine(&-v).max(0.0) / d2
            } else {
                0.0
            }
        }
    }
}

//! Places a light with an affine transformation.
//!
//! Queries are answered by mapping into the inner light's space,
//! asking the inner light and mapping the answer back. Radiometric
//! values are left alone; positions, directions and area densities
//! are not.

// std
use std::sync::Arc;
// jmist
use crate::core::geometry::{HPoint3f, Vector3f};
use crate::core::interaction::SurfacePoint;
use crate::core::jmist::Float;
use crate::core::light::{Illuminable, Light, LightError, LightSample};
use crate::core::path::{LightNode, PathInfo, PathNode, ScaledLightNode, ScatteredRay};
use crate::core::rng::Random;
use crate::core::spectrum::{Color, WavelengthPacket};
use crate::core::transform::{AffineTransformable3, Transform};

#[derive(Clone)]
pub struct TransformableLight {
    inner: Arc<dyn Light>,
    /// from the inner light's space to world space
    t: Transform,
}

impl TransformableLight {
    pub fn new(inner: Arc<dyn Light>) -> Self {
        TransformableLight {
            inner,
            t: Transform::default(),
        }
    }
    pub fn transformation(&self) -> &Transform {
        &self.t
    }
}

impl AffineTransformable3 for TransformableLight {
    fn transform(&mut self, t: &Transform) {
        self.t.transform(t);
    }
}

/// Maps samples delivered in the inner light's space to world space.
struct TransformedTarget<'a> {
    t: &'a Transform,
    inner: &'a mut dyn Illuminable,
}

impl<'a> Illuminable for TransformedTarget<'a> {
    fn add_light_sample(&mut self, sample: LightSample) {
        self.inner.add_light_sample(LightSample {
            direction: self.t.transform_vector(&sample.direction).normalize(),
            intensity: sample.intensity,
            visibility: sample.visibility.transformed(self.t),
        });
    }
}

impl Light for TransformableLight {
    fn illuminate(
        &self,
        x: &SurfacePoint,
        lambda: &WavelengthPacket,
        rng: &mut dyn Random,
        target: &mut dyn Illuminable,
    ) {
        let local: SurfacePoint = x.transformed(&Transform::inverse(&self.t));
        let mut transformed = TransformedTarget {
            t: &self.t,
            inner: target,
        };
        self.inner.illuminate(&local, lambda, rng, &mut transformed);
    }
    fn sample(
        &self,
        path_info: &PathInfo,
        ru: Float,
        rv: Float,
        rj: Float,
    ) -> Result<Option<Box<dyn LightNode>>, LightError> {
        let node = self.inner.sample(path_info, ru, rv, rj)?;
        Ok(node.map(|inner| {
            Box::new(TransformedLightNode { t: self.t, inner }) as Box<dyn LightNode>
        }))
    }
    /// The inner density is per unit area in the inner light's space;
    /// it is divided by the area scale of the transformation over the
    /// tangent plane at `x`.
    fn sample_pdf(&self, x: &SurfacePoint, path_info: &PathInfo) -> Float {
        let local: SurfacePoint = x.transformed(&Transform::inverse(&self.t));
        let su: Float = self.t.transform_vector(&local.basis.u).length();
        let sv: Float = self.t.transform_vector(&local.basis.v).length();
        let scale: Float = su * sv;
        if scale <= 0.0 {
            return 0.0;
        }
        self.inner.sample_pdf(&local, path_info) / scale
    }
    fn supports_path_sampling(&self) -> bool {
        self.inner.supports_path_sampling()
    }
}

#[derive(Debug)]
struct TransformedLightNode {
    t: Transform,
    inner: Box<dyn LightNode>,
}

impl PathNode for TransformedLightNode {
    fn position(&self) -> HPoint3f {
        self.t.transform_hpoint(&self.inner.position())
    }
    fn cosine(&self, v: &Vector3f) -> Float {
        self.inner.cosine(&self.t.inverse_transform_vector(v))
    }
}

impl LightNode for TransformedLightNode {
    fn path_info(&self) -> &PathInfo {
        self.inner.path_info()
    }
    fn is_specular(&self) -> bool {
        self.inner.is_specular()
    }
    fn cumulative_weight(&self) -> Color {
        self.inner.cumulative_weight()
    }
    fn pdf(&self) -> Float {
        self.inner.pdf() // TODO: divide by the area scale of the transform
    }
    fn sample(&self, ru: Float, rv: Float, rj: Float) -> Option<ScatteredRay> {
        self.inner.sample(ru, rv, rj).map(|sr| sr.transform(&self.t))
    }
    fn scatter(&self, v: &Vector3f) -> Color {
        self.inner.scatter(&self.t.inverse_transform_vector(v))
    }
    fn pdf_to(&self, v: &Vector3f) -> Float {
        self.inner.pdf_to(&self.t.inverse_transform_vector(v))
    }
    fn scaled(self: Box<Self>, pdf: Float) -> Box<dyn LightNode> {
        ScaledLightNode::wrap(pdf, self)
    }
}

//! In order for objects in a scene to be visible, there must be a
//! source of illumination so that some light is reflected from them
//! to the camera sensor.
//!
//! A **Light** answers two kinds of queries:
//!
//! - `illuminate` delivers (at most) one **LightSample** of incident
//!   light at a surface point, used for next-event estimation.
//! - `sample` chooses an emission point on the light, the start of a
//!   light subpath. Not every light supports this; `sample_pdf`
//!   reports the density of that choice.
//!
//! `emit` composes both halves of path sampling and is provided for
//! every light through **LightEmit**, so it cannot be overridden.

// std
use std::sync::Arc;
// others
use thiserror::Error;
// jmist
use crate::core::geometry::{pnt3_distancef, Point3f, Ray, Vector3f};
use crate::core::interaction::SurfacePoint;
use crate::core::jmist::{Float, SHADOW_EPSILON};
use crate::core::path::{LightNode, PathInfo, ScatteredRay};
use crate::core::rng::Random;
use crate::core::scene::VisibilityFunction;
use crate::core::spectrum::{Color, WavelengthPacket};
use crate::core::transform::Transform;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LightError {
    #[error("{0} does not support light path sampling")]
    Unsupported(&'static str),
}

/// A deferred shadow test, evaluated against the scene only if the
/// sample turns out to matter.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum VisibilityTester {
    Unshadowed,
    /// the segment between two points must be unblocked
    Segment { p0: Point3f, p1: Point3f },
    /// the ray must escape to infinity
    Ray { ray: Ray },
}

impl VisibilityTester {
    pub fn unoccluded(&self, vf: &dyn VisibilityFunction) -> bool {
        match self {
            VisibilityTester::Unshadowed => true,
            VisibilityTester::Segment { p0, p1 } => {
                let dist: Float = pnt3_distancef(p0, p1);
                if dist <= SHADOW_EPSILON {
                    return true;
                }
                let ray: Ray = Ray::new(*p0, (*p1 - *p0) / dist);
                vf.visibility(&ray, SHADOW_EPSILON, dist * (1.0 - SHADOW_EPSILON))
            }
            VisibilityTester::Ray { ray } => {
                vf.visibility(ray, SHADOW_EPSILON, std::f64::INFINITY)
            }
        }
    }
    pub fn transformed(&self, t: &Transform) -> VisibilityTester {
        match self {
            VisibilityTester::Unshadowed => VisibilityTester::Unshadowed,
            VisibilityTester::Segment { p0, p1 } => VisibilityTester::Segment {
                p0: t.transform_point(p0),
                p1: t.transform_point(p1),
            },
            VisibilityTester::Ray { ray } => {
                let r: Ray = t.transform_ray(ray);
                VisibilityTester::Ray {
                    ray: Ray::new(r.o, r.d.normalize()),
                }
            }
        }
    }
}

/// Light arriving at a surface point from one source.
#[derive(Debug, Clone, PartialEq)]
pub struct LightSample {
    /// unit direction from the surface point towards the light
    pub direction: Vector3f,
    /// contribution per channel, including the cosine at the receiver
    pub intensity: Color,
    pub visibility: VisibilityTester,
}

impl LightSample {
    pub fn new(direction: Vector3f, intensity: Color, visibility: VisibilityTester) -> Self {
        LightSample {
            direction,
            intensity,
            visibility,
        }
    }
}

/// Receives the samples delivered by `Light::illuminate`.
pub trait Illuminable {
    fn add_light_sample(&mut self, sample: LightSample);
}

impl Illuminable for Vec<LightSample> {
    fn add_light_sample(&mut self, sample: LightSample) {
        self.push(sample);
    }
}

pub trait Light: Send + Sync {
    /// Delivers zero or one sample of the light arriving at `x` to
    /// `target`.
    fn illuminate(
        &self,
        x: &SurfacePoint,
        lambda: &WavelengthPacket,
        rng: &mut dyn Random,
        target: &mut dyn Illuminable,
    );
    /// Chooses a point on this light to start a light subpath from.
    fn sample(
        &self,
        _path_info: &PathInfo,
        _ru: Float,
        _rv: Float,
        _rj: Float,
    ) -> Result<Option<Box<dyn LightNode>>, LightError> {
        Err(LightError::Unsupported(std::any::type_name::<Self>()))
    }
    /// Density with which `sample` picks the point `x`.
    fn sample_pdf(&self, _x: &SurfacePoint, _path_info: &PathInfo) -> Float {
        0.0
    }
    fn supports_path_sampling(&self) -> bool {
        false
    }
}

impl dyn Light {
    /// A light which contributes nothing.
    pub fn null() -> Arc<dyn Light> {
        Arc::new(NullLight)
    }
}

#[derive(Debug, Default, Copy, Clone)]
pub struct NullLight;

impl Light for NullLight {
    fn illuminate(
        &self,
        _x: &SurfacePoint,
        _lambda: &WavelengthPacket,
        _rng: &mut dyn Random,
        _target: &mut dyn Illuminable,
    ) {
    }
    fn sample(
        &self,
        _path_info: &PathInfo,
        _ru: Float,
        _rv: Float,
        _rj: Float,
    ) -> Result<Option<Box<dyn LightNode>>, LightError> {
        Ok(None)
    }
    fn supports_path_sampling(&self) -> bool {
        true
    }
}

pub trait LightEmit {
    /// Samples a ray leaving the light. Always draws six variates:
    /// three to choose the emission point, then three for the
    /// direction.
    fn emit(
        &self,
        path_info: &PathInfo,
        rng: &mut dyn Random,
    ) -> Result<Option<ScatteredRay>, LightError>;
}

impl<L: Light + ?Sized> LightEmit for L {
    fn emit(
        &self,
        path_info: &PathInfo,
        rng: &mut dyn Random,
    ) -> Result<Option<ScatteredRay>, LightError> {
        let (ru, rv, rj) = (rng.next(), rng.next(), rng.next());
        let (su, sv, sj) = (rng.next(), rng.next(), rng.next());
        let node = match self.sample(path_info, ru, rv, rj)? {
            Some(node) => node,
            None => return Ok(None),
        };
        Ok(node.sample(su, sv, sj).map(|sr| ScatteredRay {
            color: &node.cumulative_weight() * &sr.color,
            pdf: node.pdf() * sr.pdf,
            ..sr
        }))
    }
}

/// Supplies the color seen along rays which escape the scene.
pub trait RayShader: Send + Sync {
    fn shade_ray(&self, ray: &Ray, lambda: &WavelengthPacket) -> Color;
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::geometry::Normal3f;
    use crate::core::rng::Rng;

    struct CountingRandom {
        inner: Rng,
        draws: usize,
    }

    impl Random for CountingRandom {
        fn next(&mut self) -> Float {
            self.draws += 1;
            self.inner.uniform_float()
        }
        fn reseed(&mut self, seed: u64) {
            self.inner.set_sequence(seed);
        }
        fn box_clone(&self) -> Box<dyn Random> {
            Box::new(self.inner)
        }
    }

    struct Unlit;

    impl Light for Unlit {
        fn illuminate(
            &self,
            _x: &SurfacePoint,
            _lambda: &WavelengthPacket,
            _rng: &mut dyn Random,
            _target: &mut dyn Illuminable,
        ) {
        }
    }

    #[test]
    fn default_sample_is_unsupported() {
        let info = PathInfo::new(WavelengthPacket::new(&[550.0]));
        let light = Unlit;
        assert!(!light.supports_path_sampling());
        match light.sample(&info, 0.5, 0.5, 0.5) {
            Err(LightError::Unsupported(name)) => assert!(name.contains("Unlit")),
            _ => panic!("expected Unsupported"),
        }
        let x = SurfacePoint::new(Point3f::default(), Normal3f::new(0.0, 0.0, 1.0));
        assert_eq!(light.sample_pdf(&x, &info), 0.0);
    }

    #[test]
    fn emit_draws_six_even_without_a_node() {
        let info = PathInfo::new(WavelengthPacket::new(&[550.0]));
        let mut rng = CountingRandom {
            inner: Rng::with_sequence(5),
            draws: 0,
        };
        let light = <dyn Light>::null();
        assert!(light.emit(&info, &mut rng).unwrap().is_none());
        assert_eq!(rng.draws, 6);
        let mut rng = CountingRandom {
            inner: Rng::with_sequence(5),
            draws: 0,
        };
        assert!(Unlit.emit(&info, &mut rng).is_err());
        assert_eq!(rng.draws, 6);
    }

    #[test]
    fn unshadowed_is_always_visible() {
        struct Blocked;
        impl VisibilityFunction for Blocked {
            fn visibility(&self, _ray: &Ray, _t_min: Float, _t_max: Float) -> bool {
                false
            }
        }
        assert!(VisibilityTester::Unshadowed.unoccluded(&Blocked));
        let seg = VisibilityTester::Segment {
            p0: Point3f::new(0.0, 0.0, 0.0),
            p1: Point3f::new(0.0, 0.0, 1.0),
        };
        assert!(!seg.unoccluded(&Blocked));
    }
}

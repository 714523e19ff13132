//! Lights made of other lights.
//!
//! Both composites choose a child for path sampling the same way: one
//! child, uniformly at random, from the variate `rj`. What is left of
//! `rj` after the choice is handed on to the child, so the choice and
//! the child's own randomness stay independent. The density reported
//! by `sample_pdf` is the average of the children's densities, which
//! is exactly the density of that two-stage choice.

// std
use std::sync::Arc;
// jmist
use crate::core::interaction::SurfacePoint;
use crate::core::jmist::Float;
use crate::core::light::{Illuminable, Light, LightError, LightSample};
use crate::core::path::{LightNode, PathInfo, ScaledLightNode};
use crate::core::rng::Random;
use crate::core::sampling::{discrete, SeedReference};
use crate::core::spectrum::WavelengthPacket;

pub trait CompositeLight: Light {
    fn add_child(&mut self, child: Arc<dyn Light>) -> &mut Self;
    fn children(&self) -> &[Arc<dyn Light>];
}

/// Forwards light samples to `inner`, scaled by `factor`.
pub struct ScaledTarget<'a> {
    pub factor: Float,
    pub inner: &'a mut dyn Illuminable,
}

impl<'a> Illuminable for ScaledTarget<'a> {
    fn add_light_sample(&mut self, sample: LightSample) {
        self.inner.add_light_sample(LightSample {
            intensity: sample.intensity * self.factor,
            ..sample
        });
    }
}

fn sample_child(
    children: &[Arc<dyn Light>],
    path_info: &PathInfo,
    ru: Float,
    rv: Float,
    rj: Float,
) -> Result<Option<Box<dyn LightNode>>, LightError> {
    if children.is_empty() {
        return Ok(None);
    }
    let n = children.len();
    let (index, seed) = SeedReference::new(rj).discrete(0, n as i32 - 1);
    let node = children[index as usize].sample(path_info, ru, rv, seed.seed())?;
    Ok(node.map(|node| ScaledLightNode::create(1.0 / n as Float, node)))
}

fn average_pdf(children: &[Arc<dyn Light>], x: &SurfacePoint, path_info: &PathInfo) -> Float {
    if children.is_empty() {
        return 0.0;
    }
    let total: Float = children
        .iter()
        .map(|child| child.sample_pdf(x, path_info))
        .sum();
    total / children.len() as Float
}

fn all_support_path_sampling(children: &[Arc<dyn Light>]) -> bool {
    !children.is_empty() && children.iter().all(|child| child.supports_path_sampling())
}

/// Illuminates from one child, picked uniformly at random, scaled by
/// the number of children.
#[derive(Clone, Default)]
pub struct RandomCompositeLight {
    children: Vec<Arc<dyn Light>>,
}

impl RandomCompositeLight {
    pub fn new() -> Self {
        RandomCompositeLight {
            children: Vec::new(),
        }
    }
}

impl CompositeLight for RandomCompositeLight {
    fn add_child(&mut self, child: Arc<dyn Light>) -> &mut Self {
        self.children.push(child);
        self
    }
    fn children(&self) -> &[Arc<dyn Light>] {
        &self.children
    }
}

impl Light for RandomCompositeLight {
    fn illuminate(
        &self,
        x: &SurfacePoint,
        lambda: &WavelengthPacket,
        rng: &mut dyn Random,
        target: &mut dyn Illuminable,
    ) {
        let n = self.children.len();
        if n == 0 {
            return;
        }
        let index = discrete(0, n as i32 - 1, rng) as usize;
        let mut scaled = ScaledTarget {
            factor: n as Float,
            inner: target,
        };
        self.children[index].illuminate(x, lambda, rng, &mut scaled);
    }
    fn sample(
        &self,
        path_info: &PathInfo,
        ru: Float,
        rv: Float,
        rj: Float,
    ) -> Result<Option<Box<dyn LightNode>>, LightError> {
        sample_child(&self.children, path_info, ru, rv, rj)
    }
    fn sample_pdf(&self, x: &SurfacePoint, path_info: &PathInfo) -> Float {
        average_pdf(&self.children, x, path_info)
    }
    fn supports_path_sampling(&self) -> bool {
        all_support_path_sampling(&self.children)
    }
}

/// Illuminates from every child.
#[derive(Clone, Default)]
pub struct SimpleCompositeLight {
    children: Vec<Arc<dyn Light>>,
}

impl SimpleCompositeLight {
    pub fn new() -> Self {
        SimpleCompositeLight {
            children: Vec::new(),
        }
    }
}

impl CompositeLight for SimpleCompositeLight {
    fn add_child(&mut self, child: Arc<dyn Light>) -> &mut Self {
        self.children.push(child);
        self
    }
    fn children(&self) -> &[Arc<dyn Light>] {
        &self.children
    }
}

impl Light for SimpleCompositeLight {
    fn illuminate(
        &self,
        x: &SurfacePoint,
        lambda: &WavelengthPacket,
        rng: &mut dyn Random,
        target: &mut dyn Illuminable,
    ) {
        for child in self.children.iter() {
            child.illuminate(x, lambda, rng, target);
        }
    }
    fn sample(
        &self,
        path_info: &PathInfo,
        ru: Float,
        rv: Float,
        rj: Float,
    ) -> Result<Option<Box<dyn LightNode>>, LightError> {
        sample_child(&self.children, path_info, ru, rv, rj)
    }
    fn sample_pdf(&self, x: &SurfacePoint, path_info: &PathInfo) -> Float {
        average_pdf(&self.children, x, path_info)
    }
    fn supports_path_sampling(&self) -> bool {
        all_support_path_sampling(&self.children)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::geometry::{Normal3f, Point3f, Vector3f};
    use crate::core::light::LightEmit;
    use crate::core::rng::Rng;
    use crate::core::spectrum::ConstantSpectrum;
    use crate::lights::directional::DirectionalLight;
    use crate::lights::point::PointLight;
    use crate::lights::spherical::SphericalLight;
    use std::f64::consts::PI;

    fn up() -> SurfacePoint {
        SurfacePoint::new(Point3f::default(), Normal3f::new(0.0, 0.0, 1.0))
    }

    fn directional(value: Float) -> Arc<dyn Light> {
        Arc::new(DirectionalLight::new(
            &Vector3f::new(0.0, 0.0, 1.0),
            Arc::new(ConstantSpectrum::new(value)),
            false,
        ))
    }

    #[test]
    fn random_choice_is_unbiased() {
        let mut light = RandomCompositeLight::new();
        light
            .add_child(directional(1.0))
            .add_child(directional(2.0))
            .add_child(directional(6.0));
        let lambda = WavelengthPacket::new(&[550.0]);
        let mut rng = Rng::with_sequence(21);
        let n = 30_000;
        let mut sum: Float = 0.0;
        for _ in 0..n {
            let mut samples: Vec<LightSample> = Vec::new();
            light.illuminate(&up(), &lambda, &mut rng, &mut samples);
            assert_eq!(samples.len(), 1);
            sum += samples[0].intensity[0];
        }
        assert!((sum / n as Float - 9.0).abs() < 0.15, "{}", sum / n as Float);
    }

    #[test]
    fn simple_composite_sums_children() {
        let mut light = SimpleCompositeLight::new();
        light.add_child(directional(1.0)).add_child(directional(2.0));
        let lambda = WavelengthPacket::new(&[550.0]);
        let mut samples: Vec<LightSample> = Vec::new();
        light.illuminate(&up(), &lambda, &mut Rng::new(), &mut samples);
        let total: Float = samples.iter().map(|s| s.intensity[0]).sum();
        assert_eq!(samples.len(), 2);
        assert!((total - 3.0).abs() < 1e-12);
        // directional lights cannot start light paths
        assert!(!light.supports_path_sampling());
    }

    #[test]
    fn empty_composite_contributes_nothing() {
        let light = RandomCompositeLight::new();
        let info = PathInfo::new(WavelengthPacket::new(&[550.0]));
        let mut samples: Vec<LightSample> = Vec::new();
        light.illuminate(&up(), &info.lambda, &mut Rng::new(), &mut samples);
        assert!(samples.is_empty());
        assert!(light.sample(&info, 0.3, 0.4, 0.5).unwrap().is_none());
        assert_eq!(light.sample_pdf(&up(), &info), 0.0);
        assert!(!light.supports_path_sampling());
        assert!(light.emit(&info, &mut Rng::new()).unwrap().is_none());
    }

    #[test]
    fn sample_density_matches_sample_pdf() {
        let small = SphericalLight::new(
            Point3f::new(-3.0, 0.0, 0.0),
            0.5,
            Arc::new(ConstantSpectrum::new(1.0)),
            true,
        );
        let large = SphericalLight::new(
            Point3f::new(3.0, 0.0, 0.0),
            2.0,
            Arc::new(ConstantSpectrum::new(1.0)),
            true,
        );
        let centers = [small.center, large.center];
        let area = small.area() + large.area();
        let mut light = RandomCompositeLight::new();
        light.add_child(Arc::new(small)).add_child(Arc::new(large));
        assert!(light.supports_path_sampling());
        let info = PathInfo::new(WavelengthPacket::new(&[550.0]));
        let mut rng = Rng::with_sequence(22);
        let n = 20_000;
        let mut sum: Float = 0.0;
        for _ in 0..n {
            let node = light
                .sample(&info, rng.next(), rng.next(), rng.next())
                .unwrap()
                .unwrap();
            let p = node.position().to_point().unwrap();
            let center = if p.x < 0.0 { centers[0] } else { centers[1] };
            let x = SurfacePoint::new(p, Normal3f::from(p - center));
            let pdf = light.sample_pdf(&x, &info);
            assert!((pdf - node.pdf()).abs() < 1e-12 * pdf.max(1.0));
            sum += 1.0 / pdf;
        }
        // E[1 / pdf] is the total area sampled
        assert!((sum / n as Float - area).abs() < 0.02 * area);
        assert!((area - 4.0 * PI * 4.25).abs() < 1e-9);
    }

    #[test]
    fn nested_composites_scale_once() {
        let point: Arc<dyn Light> = Arc::new(PointLight::new(
            Point3f::default(),
            Arc::new(ConstantSpectrum::new(1.0)),
            false,
        ));
        let mut inner = RandomCompositeLight::new();
        inner.add_child(point.clone()).add_child(point.clone());
        let mut outer = RandomCompositeLight::new();
        outer.add_child(Arc::new(inner)).add_child(point);
        let info = PathInfo::new(WavelengthPacket::new(&[550.0]));
        let node = outer.sample(&info, 0.1, 0.2, 0.3).unwrap().unwrap();
        assert!((node.pdf() - 0.25).abs() < 1e-12);
        assert!((node.cumulative_weight()[0] - 4.0).abs() < 1e-12);
        let node = outer.sample(&info, 0.1, 0.2, 0.7).unwrap().unwrap();
        assert!((node.pdf() - 0.5).abs() < 1e-12);
    }
}

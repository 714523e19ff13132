//! The bidirectional path shader builds one subpath from the light
//! graph and one from the camera, then connects every vertex of the
//! camera subpath with every vertex of the light subpath. Each camera
//! vertex additionally samples the lights directly (next-event
//! estimation). The two strategies are summed without any multiple
//! importance sampling weights.

// std
use std::sync::Arc;
// others
use log::warn;
// jmist
use crate::core::error::RenderError;
use crate::core::geometry::{nrm_dot_vec3f, Point3f, Ray, Vector3f};
use crate::core::interaction::Intersection;
use crate::core::jmist::Float;
use crate::core::light::{Illuminable, LightEmit, LightSample, VisibilityTester};
use crate::core::path::{PathInfo, ScatteredRay};
use crate::core::rng::Random;
use crate::core::sampling::categorical;
use crate::core::scene::Scene;
use crate::core::spectrum::{
    cie_x, cie_y, cie_z, Color, WavelengthPacket, CIE_Y_INTEGRAL, VISIBLE_MAX_WAVELENGTH,
    VISIBLE_MIN_WAVELENGTH,
};

/// Estimates the spectral response along one camera ray for a given
/// set of wavelengths.
pub trait SpectralEstimator {
    fn sample(&self, lambda: &WavelengthPacket, rng: &mut dyn Random)
        -> Result<Color, RenderError>;
}

/// Chooses the wavelengths to estimate and converts the spectral
/// response into tristimulus values.
pub trait Observer: Send + Sync {
    fn acquire(
        &self,
        estimator: &dyn SpectralEstimator,
        rng: &mut dyn Random,
    ) -> Result<[Float; 3], RenderError>;
}

/// CIE 1931 observer over the visible range, using `channels`
/// stratified wavelengths per estimate.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct XyzObserver {
    pub channels: usize,
}

impl XyzObserver {
    pub fn new(channels: usize) -> Self {
        XyzObserver {
            channels: channels.max(1),
        }
    }
}

impl Observer for XyzObserver {
    fn acquire(
        &self,
        estimator: &dyn SpectralEstimator,
        rng: &mut dyn Random,
    ) -> Result<[Float; 3], RenderError> {
        let lambda: WavelengthPacket = WavelengthPacket::stratified(
            self.channels,
            VISIBLE_MIN_WAVELENGTH,
            VISIBLE_MAX_WAVELENGTH,
            rng.next(),
        );
        let response: Color = estimator.sample(&lambda, rng)?;
        let delta: Float =
            (VISIBLE_MAX_WAVELENGTH - VISIBLE_MIN_WAVELENGTH) / self.channels as Float;
        let mut xyz: [Float; 3] = [0.0; 3];
        for (l, r) in lambda.iter().zip(response.as_slice().iter()) {
            xyz[0] += r * cie_x(*l);
            xyz[1] += r * cie_y(*l);
            xyz[2] += r * cie_z(*l);
        }
        for v in xyz.iter_mut() {
            *v *= delta / CIE_Y_INTEGRAL;
        }
        Ok(xyz)
    }
}

/// A surface hit along a subpath and the event that continued (or
/// ended) the walk there.
struct Vertex<'s> {
    x: Intersection<'s>,
    scattered: Option<ScatteredRay>,
}

impl<'s> Vertex<'s> {
    fn location(&self) -> Point3f {
        self.x.location()
    }
    /// Throughput of the scattering event; an absorbing vertex passes
    /// nothing on.
    fn weight(&self, channels: usize) -> Color {
        match &self.scattered {
            Some(sr) => sr.color.clone(),
            None => Color::zero(channels),
        }
    }
}

struct Subpath<'s> {
    initial_weight: Color,
    vertices: Vec<Vertex<'s>>,
}

impl<'s> Subpath<'s> {
    fn empty(channels: usize) -> Self {
        Subpath {
            initial_weight: Color::zero(channels),
            vertices: Vec::new(),
        }
    }
}

pub struct BidirectionalPathShader {
    scene: Arc<Scene>,
    observer: Arc<dyn Observer>,
    max_depth: usize,
    light_paths: bool,
}

impl BidirectionalPathShader {
    pub fn new(scene: Arc<Scene>, observer: Arc<dyn Observer>, max_depth: usize) -> Self {
        let light_paths: bool = scene.light.supports_path_sampling();
        if !light_paths {
            warn!("Light graph does not support path sampling, using next-event estimation only");
        }
        BidirectionalPathShader {
            scene,
            observer,
            max_depth,
            light_paths,
        }
    }
    /// Tristimulus response along `ray`.
    pub fn shade(&self, ray: &Ray, rng: &mut dyn Random) -> Result<[Float; 3], RenderError> {
        let estimator = PathEstimator { shader: self, ray };
        self.observer.acquire(&estimator, rng)
    }
    fn generate_light_subpath(
        &self,
        path_info: &PathInfo,
        rng: &mut dyn Random,
    ) -> Result<Subpath<'_>, RenderError> {
        let channels: usize = path_info.channels();
        if !self.light_paths {
            return Ok(Subpath::empty(channels));
        }
        match self.scene.light.emit(path_info, rng)? {
            Some(sr) => self.random_walk(sr.ray, &path_info.lambda, sr.color, rng),
            None => Ok(Subpath::empty(channels)),
        }
    }
    fn generate_camera_subpath(
        &self,
        ray: &Ray,
        lambda: &WavelengthPacket,
        rng: &mut dyn Random,
    ) -> Result<Subpath<'_>, RenderError> {
        self.random_walk(*ray, lambda, Color::constant(lambda.len(), 1.0), rng)
    }
    /// Follows `ray` through the scene, choosing at every hit the
    /// channel to sample in proportion to the running weight.
    fn random_walk(
        &self,
        ray: Ray,
        lambda: &WavelengthPacket,
        initial_weight: Color,
        rng: &mut dyn Random,
    ) -> Result<Subpath<'_>, RenderError> {
        let mut importance: Color = initial_weight.clone();
        let mut path = Subpath {
            initial_weight,
            vertices: Vec::new(),
        };
        let mut ray: Ray = ray;
        while path.vertices.len() < self.max_depth {
            let x: Intersection = match self.scene.intersect(&ray) {
                Some(x) => x,
                None => break,
            };
            let channel: usize = match categorical(importance.as_slice(), rng) {
                Some(channel) => channel,
                None => break,
            };
            let scattered: Option<ScatteredRay> = x.material.scatter(&x, lambda, channel, rng);
            match scattered {
                Some(sr) => {
                    if sr.dispersion.is_some() {
                        return Err(RenderError::DispersionUnsupported);
                    }
                    importance *= &sr.color;
                    ray = sr.ray;
                    path.vertices.push(Vertex {
                        x,
                        scattered: Some(sr),
                    });
                }
                None => {
                    path.vertices.push(Vertex { x, scattered: None });
                    break;
                }
            }
        }
        Ok(path)
    }
    /// Next-event estimation at one camera vertex.
    fn sample_lights(
        &self,
        eye: &Vertex,
        lambda: &WavelengthPacket,
        importance: &Color,
        rng: &mut dyn Random,
    ) -> Color {
        let mut samples: Vec<LightSample> = Vec::new();
        self.scene
            .light
            .illuminate(&eye.x.surface, lambda, rng, &mut samples as &mut dyn Illuminable);
        let mut l: Color = Color::zero(lambda.len());
        for sample in samples {
            if !sample.visibility.unoccluded(&*self.scene) {
                continue;
            }
            let f: Color = eye.x.material.scattering(&eye.x, &sample.direction, lambda);
            l += sample.intensity.clamp_zero() * &f * importance;
        }
        l
    }
    /// Contribution of joining camera vertex `eye` to light vertex
    /// `light` with a visibility ray.
    fn connect_bdpt(
        &self,
        eye: &Vertex,
        light: &Vertex,
        lambda: &WavelengthPacket,
        radiance: &Color,
        importance: &Color,
    ) -> Option<Color> {
        let visibility = VisibilityTester::Segment {
            p0: eye.location(),
            p1: light.location(),
        };
        if !visibility.unoccluded(&*self.scene) {
            return None;
        }
        let to_light: Vector3f = light.location() - eye.location();
        let d2: Float = to_light.length_squared();
        let forward: Vector3f = to_light.try_normalize()?;
        let backward: Vector3f = -forward;
        let ndotf: Float = nrm_dot_vec3f(&light.x.surface.ns, &forward);
        let ndotb: Float = nrm_dot_vec3f(&eye.x.surface.ns, &backward);
        let f_eye: Color = eye.x.material.scattering(&eye.x, &forward, lambda);
        let f_light: Color = light.x.material.scattering(&light.x, &backward, lambda);
        Some(radiance * &f_eye * &f_light * importance * ((ndotf * ndotb).abs() / d2))
    }
}

/// Estimates the response along a single camera ray.
struct PathEstimator<'a> {
    shader: &'a BidirectionalPathShader,
    ray: &'a Ray,
}

impl<'a> SpectralEstimator for PathEstimator<'a> {
    fn sample(
        &self,
        lambda: &WavelengthPacket,
        rng: &mut dyn Random,
    ) -> Result<Color, RenderError> {
        let shader = self.shader;
        let path_info = PathInfo::with_max_depth(lambda.clone(), shader.max_depth);
        let light_path: Subpath = shader.generate_light_subpath(&path_info, rng)?;
        let eye_path: Subpath = shader.generate_camera_subpath(self.ray, lambda, rng)?;
        let channels: usize = lambda.len();
        let mut importance: Color = eye_path.initial_weight.clone();
        let mut l: Color = Color::zero(channels);
        for eye in eye_path.vertices.iter() {
            l += shader.sample_lights(eye, lambda, &importance, rng);
            let mut radiance: Color = light_path.initial_weight.clone();
            for light in light_path.vertices.iter() {
                if let Some(c) = shader.connect_bdpt(eye, light, lambda, &radiance, &importance) {
                    l += c;
                }
                radiance *= light.weight(channels);
            }
            importance *= eye.weight(channels);
        }
        Ok(l)
    }
}

//! The integrator renders an image by shading camera rays with the
//! **BidirectionalPathShader**.
//!
//! ## Bidirectional Path Tracing (BDPT)
//!
//! Bidirectional path tracing is a generalization of the standard
//! pathtracing algorithm. It constructs paths that start from the
//! camera on one end, from the light on the other end, and connects
//! in the middle with a visibility ray.
//!
//! ## Render Loop
//!
//! The image is split into tiles by a **BlockQueue**. Worker threads
//! claim tiles, render them into **FilmTile**s and send them through
//! a bounded channel to the calling thread, which merges them into
//! the **Film**.

pub mod bdpt;

// std
use std::sync::Arc;
// others
use log::{debug, info, warn};
// jmist
use crate::blockqueue::{BlockQueue, Tile};
use crate::core::camera::PinholeCamera;
use crate::core::error::RenderError;
use crate::core::film::{Film, FilmTile};
use crate::core::geometry::Point2f;
use crate::core::jmist::Float;
use crate::core::rng::{Random, Rng};
use crate::core::scene::Scene;
use crate::integrators::bdpt::{BidirectionalPathShader, XyzObserver};

#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    /// worker threads; 0 uses every core
    pub nthreads: usize,
    /// samples per pixel
    pub samples: usize,
    pub width: u32,
    pub height: u32,
    /// wavelengths traced per sample
    pub wavelengths: usize,
    pub max_depth: usize,
    pub seed: u64,
    pub tile_size: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        RenderSettings {
            nthreads: 0,
            samples: 16,
            width: 320,
            height: 240,
            wavelengths: 4,
            max_depth: 8,
            seed: 0,
            tile_size: 16,
        }
    }
}

impl RenderSettings {
    fn validate(&self) -> Result<(), RenderError> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidParameter(format!(
                "resolution {}x{}",
                self.width, self.height
            )));
        }
        if self.samples == 0 || self.wavelengths == 0 {
            return Err(RenderError::InvalidParameter(format!(
                "{} samples of {} wavelengths",
                self.samples, self.wavelengths
            )));
        }
        Ok(())
    }
}

/// Renders `scene` as seen through `camera` and returns the film.
pub fn render(
    scene: Arc<Scene>,
    camera: &PinholeCamera,
    settings: &RenderSettings,
) -> Result<Film, RenderError> {
    settings.validate()?;
    let shader = BidirectionalPathShader::new(
        scene,
        Arc::new(XyzObserver::new(settings.wavelengths)),
        settings.max_depth,
    );
    let num_cores: usize = if settings.nthreads == 0 {
        num_cpus::get()
    } else {
        settings.nthreads
    };
    info!("Rendering with {:?} thread(s) ...", num_cores);
    let block_queue = BlockQueue::new(
        (settings.width, settings.height),
        (settings.tile_size, settings.tile_size),
    );
    let bq = &block_queue;
    let shader = &shader;
    let sampler: Rng = Rng::with_sequence(settings.seed);
    let film = crossbeam::scope(|scope| -> Result<Film, RenderError> {
        let (tile_tx, tile_rx) = crossbeam_channel::bounded(num_cores);
        // spawn worker threads
        for _ in 0..num_cores {
            let tile_tx = tile_tx.clone();
            let mut tile_sampler: Box<dyn Random> = sampler.box_clone();
            scope.spawn(move |_| {
                while let Some((index, tile)) = bq.next() {
                    tile_sampler.reseed(settings.seed.wrapping_add(index as u64));
                    let result = render_tile(shader, camera, &tile, settings, &mut *tile_sampler);
                    let failed: bool = result.is_err();
                    // the receiver is gone once rendering was aborted
                    if tile_tx.send(result).is_err() || failed {
                        break;
                    }
                }
            });
        }
        drop(tile_tx);
        // collect tiles on this thread
        let mut film = Film::new(settings.width, settings.height);
        for _ in pbr::PbIter::new(0..bq.len()) {
            let film_tile: FilmTile = tile_rx
                .recv()
                .map_err(|_| RenderError::WorkerDisconnected)??;
            // merge image tile into _Film_
            film.merge_film_tile(&film_tile);
        }
        Ok(film)
    })
    .map_err(|_| RenderError::WorkerPanicked)??;
    info!("Rendering finished");
    Ok(film)
}

fn render_tile(
    shader: &BidirectionalPathShader,
    camera: &PinholeCamera,
    tile: &Tile,
    settings: &RenderSettings,
    sampler: &mut dyn Random,
) -> Result<FilmTile, RenderError> {
    debug!("Starting image tile {:?}", tile);
    let mut film_tile = FilmTile::new(*tile);
    let (width, height) = (settings.width as Float, settings.height as Float);
    for (x, y) in tile.pixels() {
        for sample in 0..settings.samples {
            sampler.reset();
            let p_film = Point2f {
                x: (x as Float + sampler.next()) / width,
                y: (y as Float + sampler.next()) / height,
            };
            let ray = camera.generate_ray(&p_film);
            let mut xyz: [Float; 3] = shader.shade(&ray, sampler)?;
            if xyz.iter().any(|v| v.is_nan()) {
                warn!(
                    "Not-a-number radiance value returned for pixel ({:?}, {:?}), sample {:?}. Setting to black.",
                    x, y, sample
                );
                xyz = [0.0; 3];
            } else if xyz[1] < -10.0e-5 {
                warn!(
                    "Negative luminance value, {:?}, returned for pixel ({:?}, {:?}), sample {:?}. Setting to black.",
                    xyz[1], x, y, sample
                );
                xyz = [0.0; 3];
            } else if xyz.iter().any(|v| v.is_infinite()) {
                warn!(
                    "Infinite luminance value returned for pixel ({:?}, {:?}), sample {:?}. Setting to black.",
                    x, y, sample
                );
                xyz = [0.0; 3];
            }
            film_tile.add_sample(x, y, &xyz);
        }
    }
    Ok(film_tile)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::geometry::{Normal3f, Point3f, Vector3f};
    use crate::core::light::Light;
    use crate::core::material::Material;
    use crate::core::spectrum::ConstantSpectrum;
    use crate::lights::composite::{CompositeLight, RandomCompositeLight};
    use crate::lights::spherical::SphericalLight;
    use crate::materials::lambertian::Lambertian;
    use crate::shapes::list::{Primitive, PrimitiveList};
    use crate::shapes::plane::Plane;
    use crate::shapes::sphere::Sphere;

    fn scene() -> Arc<Scene> {
        let grey: Arc<dyn Material> =
            Arc::new(Lambertian::new(Arc::new(ConstantSpectrum::new(0.6))));
        let mut geometry = PrimitiveList::new();
        geometry
            .add(Primitive::new(
                Arc::new(Plane::new(Point3f::default(), Normal3f::new(0.0, 1.0, 0.0))),
                grey.clone(),
            ))
            .add(Primitive::new(
                Arc::new(Sphere::new(Point3f::new(0.0, 1.0, 0.0), 1.0)),
                grey,
            ));
        let mut light = RandomCompositeLight::new();
        light.add_child(Arc::new(SphericalLight::new(
            Point3f::new(2.0, 4.0, -1.0),
            0.5,
            Arc::new(ConstantSpectrum::new(200.0)),
            true,
        )));
        Arc::new(Scene::new(geometry, Arc::new(light) as Arc<dyn Light>))
    }

    fn camera(settings: &RenderSettings) -> PinholeCamera {
        PinholeCamera::new(
            Point3f::new(0.0, 2.0, -6.0),
            Point3f::new(0.0, 1.0, 0.0),
            Vector3f::new(0.0, 1.0, 0.0),
            45.0,
            settings.width as Float / settings.height as Float,
        )
        .unwrap()
    }

    fn settings(nthreads: usize) -> RenderSettings {
        RenderSettings {
            nthreads,
            samples: 2,
            width: 24,
            height: 18,
            wavelengths: 3,
            max_depth: 3,
            seed: 42,
            tile_size: 8,
        }
    }

    #[test]
    fn renders_every_pixel() {
        let settings = settings(3);
        let film = render(scene(), &camera(&settings), &settings).unwrap();
        let mut lit = 0;
        for y in 0..settings.height {
            for x in 0..settings.width {
                let xyz = film.get_pixel(x, y);
                assert!(xyz.iter().all(|v| v.is_finite()));
                if xyz[1] > 0.0 {
                    lit += 1;
                }
            }
        }
        assert!(lit > 0);
    }

    #[test]
    fn result_is_independent_of_thread_count() {
        let one = settings(1);
        let four = settings(4);
        let a = render(scene(), &camera(&one), &one).unwrap();
        let b = render(scene(), &camera(&four), &four).unwrap();
        for y in 0..one.height {
            for x in 0..one.width {
                assert_eq!(a.get_pixel(x, y), b.get_pixel(x, y));
            }
        }
    }

    #[test]
    fn rejects_empty_resolution() {
        let mut settings = settings(1);
        settings.width = 0;
        match render(scene(), &camera(&RenderSettings::default()), &settings) {
            Err(RenderError::InvalidParameter(_)) => {}
            _ => panic!("expected InvalidParameter"),
        }
    }
}

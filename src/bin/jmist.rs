// std
use std::path::PathBuf;
use std::sync::Arc;
// others
use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};
// jmist
use jmist::core::camera::PinholeCamera;
use jmist::core::geometry::{Normal3f, Point3f, Vector3f};
use jmist::core::jmist::Float;
use jmist::core::light::Light;
use jmist::core::material::Material;
use jmist::core::scene::Scene;
use jmist::core::spectrum::{BlackbodySpectrum, ConstantSpectrum, ScaledSpectrum};
use jmist::core::transform::AffineTransformable3;
use jmist::integrators::{render, RenderSettings};
use jmist::lights::composite::{CompositeLight, RandomCompositeLight, SimpleCompositeLight};
use jmist::lights::day::DayLight;
use jmist::lights::point::PointLight;
use jmist::lights::spherical::SphericalLight;
use jmist::lights::transformable::TransformableLight;
use jmist::materials::lambertian::Lambertian;
use jmist::shapes::list::{Primitive, PrimitiveList};
use jmist::shapes::plane::Plane;
use jmist::shapes::sphere::Sphere;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Copy, Clone, PartialEq, Eq, Display, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase")]
enum SceneKind {
    /// diffuse spheres lit by spherical and point lights
    Spheres,
    /// the same spheres under a clear sky
    Daylight,
}

/// Render one of the built-in scenes with the bidirectional path
/// shader.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// use specified number of threads for rendering (0 = all cores)
    #[arg(short = 't', long, default_value_t = 0)]
    nthreads: usize,
    /// samples per pixel
    #[arg(short = 's', long, default_value_t = 16)]
    samples: usize,
    #[arg(long, default_value_t = 320)]
    width: u32,
    #[arg(long, default_value_t = 240)]
    height: u32,
    /// wavelengths traced per sample
    #[arg(long, default_value_t = 4)]
    wavelengths: usize,
    /// maximum number of vertices per subpath
    #[arg(long, default_value_t = 8)]
    max_depth: usize,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// built-in scene to render
    #[arg(long, default_value = "spheres")]
    scene: SceneKind,
    /// PNG file to write
    #[arg(short = 'o', long, default_value = "jmist.png")]
    output: PathBuf,
}

fn geometry() -> PrimitiveList {
    let floor: Arc<dyn Material> = Arc::new(Lambertian::new(Arc::new(ConstantSpectrum::new(0.7))));
    let mut list = PrimitiveList::new();
    list.add(Primitive::new(
        Arc::new(Plane::new(Point3f::default(), Normal3f::new(0.0, 1.0, 0.0))),
        floor,
    ));
    let reflectances: [Float; 3] = [0.8, 0.5, 0.25];
    for (i, r) in reflectances.iter().enumerate() {
        let material: Arc<dyn Material> =
            Arc::new(Lambertian::new(Arc::new(ConstantSpectrum::new(*r))));
        list.add(Primitive::new(
            Arc::new(Sphere::new(Point3f::new(i as Float * 2.5 - 2.5, 1.0, 0.0), 1.0)),
            material,
        ));
    }
    list
}

fn spheres_light() -> Arc<dyn Light> {
    // warm white bulbs; the blackbody peaks at one
    let warm = Arc::new(ScaledSpectrum::new(
        400.0,
        Arc::new(BlackbodySpectrum::new(3200.0)),
    ));
    let bulb: Arc<dyn Light> = Arc::new(SphericalLight::new(Point3f::default(), 0.4, warm, true));
    let mut left = TransformableLight::new(bulb.clone());
    left.translate(&Vector3f::new(-3.0, 4.0, -2.0));
    let mut right = TransformableLight::new(bulb);
    right.scale(1.5);
    right.translate(&Vector3f::new(3.5, 5.0, -1.0));
    let mut lights = RandomCompositeLight::new();
    lights
        .add_child(Arc::new(left))
        .add_child(Arc::new(right))
        .add_child(Arc::new(PointLight::new(
            Point3f::new(0.0, 6.0, 3.0),
            Arc::new(ConstantSpectrum::new(150.0)),
            true,
        )));
    Arc::new(lights)
}

fn daylight_light() -> Arc<dyn Light> {
    let sun = Vector3f::new(1.0, 1.5, -1.0);
    let mut lights = SimpleCompositeLight::new();
    lights.add_child(Arc::new(DayLight::new(
        &sun,
        &Vector3f::new(0.0, 1.0, 0.0),
        2.5,
        true,
    )));
    Arc::new(lights)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    info!("jmist version {}", VERSION);
    info!(
        "available scenes: {}",
        SceneKind::iter()
            .map(|s| s.to_string())
            .collect::<Vec<String>>()
            .join(", ")
    );
    let settings = RenderSettings {
        nthreads: args.nthreads,
        samples: args.samples,
        width: args.width,
        height: args.height,
        wavelengths: args.wavelengths,
        max_depth: args.max_depth,
        seed: args.seed,
        ..RenderSettings::default()
    };
    let light: Arc<dyn Light> = match args.scene {
        SceneKind::Spheres => spheres_light(),
        SceneKind::Daylight => daylight_light(),
    };
    info!("Rendering scene {} ...", args.scene);
    let scene = Arc::new(Scene::new(geometry(), light));
    let camera = PinholeCamera::new(
        Point3f::new(0.0, 3.0, -9.0),
        Point3f::new(0.0, 1.0, 0.0),
        Vector3f::new(0.0, 1.0, 0.0),
        40.0,
        args.width as Float / args.height.max(1) as Float,
    )
    .context("failed to set up camera")?;
    let film = render(scene, &camera, &settings).context("rendering failed")?;
    film.write_image(&args.output)
        .with_context(|| format!("failed to write {:?}", args.output))?;
    Ok(())
}

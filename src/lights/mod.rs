//! In order for objects in a scene to be visible, there must be a
//! source of illumination so that some light is reflected from them
//! to the camera sensor.
//!
//! - DirectionalLight
//! - PointLight
//! - PointSpotLight
//! - SphericalLight
//! - HemisphericalLight
//! - EnvironmentLight
//! - DayLight
//! - SimpleCompositeLight
//! - RandomCompositeLight
//! - TransformableLight
//!
//! ## Lights at Infinity
//!
//! A directional light deposits illumination from the same direction
//! at every point in space. Hemispherical and environment lights
//! surround the whole scene and take their colors from a
//! **RayShader**; **DayLight** models a clear sky with sun.
//!
//! ```rust
//! use jmist::core::geometry::Vector3f;
//! use jmist::core::spectrum::ConstantSpectrum;
//! use jmist::lights::directional::DirectionalLight;
//! use std::sync::Arc;
//!
//! let from = Vector3f::new(0.0, 10.0, 0.0);
//! let light = DirectionalLight::new(&from, Arc::new(ConstantSpectrum::new(3.0)), true);
//! println!("light = {:?}", light);
//! ```
//!
//! ## Lights with Position
//!
//! **PointLight** and **PointSpotLight** are described by the total
//! power they emit. A **SphericalLight** emits uniformly from the
//! surface of a sphere; it is the only positional light which is
//! also an area light and can start light subpaths from anywhere on
//! its surface.
//!
//! ## Combining Lights
//!
//! Composite lights hold any number of children. A
//! **RandomCompositeLight** picks one child per query and compensates
//! for the choice; a **SimpleCompositeLight** queries all of them. A
//! **TransformableLight** places another light with an affine
//! transformation.
//!
//! ```rust
//! use jmist::core::geometry::{Point3f, Vector3f};
//! use jmist::core::light::Light;
//! use jmist::core::spectrum::ConstantSpectrum;
//! use jmist::core::transform::AffineTransformable3;
//! use jmist::lights::composite::{CompositeLight, RandomCompositeLight};
//! use jmist::lights::spherical::SphericalLight;
//! use jmist::lights::transformable::TransformableLight;
//! use std::sync::Arc;
//!
//! let power = Arc::new(ConstantSpectrum::new(100.0));
//! let sphere = Arc::new(SphericalLight::new(Point3f::default(), 0.5, power, true));
//! let mut placed = TransformableLight::new(sphere.clone());
//! placed.translate(&Vector3f::new(0.0, 4.0, 0.0));
//! let mut lights = RandomCompositeLight::new();
//! lights.add_child(sphere);
//! lights.add_child(Arc::new(placed));
//! assert!(lights.supports_path_sampling());
//! ```

pub mod composite;
pub mod day;
pub mod directional;
pub mod environment;
pub mod hemispherical;
pub mod point;
pub mod point_spot;
pub mod spherical;
pub mod transformable;

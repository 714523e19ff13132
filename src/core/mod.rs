//! # Core
//!
//! The shared types of the renderer: numeric helpers, geometry and
//! transformations, random numbers and sampling, spectra, and the
//! traits every light, material and shape implements.
//!
//! - Camera
//! - Film
//! - Geometry
//! - Interaction
//! - Light
//! - Material
//! - Path
//! - Random Number Generator
//! - Sampling
//! - Scene
//! - Shape
//! - Spectrum
//! - Transform
//!
//! ## Spectral Rendering
//!
//! Every path carries a **WavelengthPacket**, a small set of
//! wavelengths (in nanometers) chosen by the observer. Colors along
//! the path have one channel per wavelength, and spectra are sampled
//! at exactly those wavelengths.
//!
//! ```rust
//! use jmist::core::spectrum::{BlackbodySpectrum, Spectrum, WavelengthPacket};
//!
//! let lambda = WavelengthPacket::stratified(4, 380.0, 780.0, 0.5);
//! let c = BlackbodySpectrum::new(5500.0).sample(&lambda);
//! assert_eq!(c.len(), 4);
//! ```

pub mod camera;
pub mod error;
pub mod film;
pub mod geometry;
pub mod interaction;
pub mod jmist;
pub mod light;
pub mod material;
pub mod path;
pub mod rng;
pub mod sampling;
pub mod scene;
pub mod shape;
pub mod spectrum;
pub mod transform;

//! # jmist
//!
//! [Rust][rust] crate for spectral Monte Carlo light transport. It
//! provides a graph of light sources which can both illuminate
//! surface points (next-event estimation) and start light subpaths,
//! and a bidirectional path shader which combines both.
//!
//! The render loop for the bidirectional path shader can be found
//! [here].
//!
//! [rust]: https://www.rust-lang.org
//! [here]: integrators/fn.render.html

#[macro_use]
extern crate impl_ops;

pub mod blockqueue;
pub mod core;
pub mod integrators;
pub mod lights;
pub mod materials;
pub mod shapes;

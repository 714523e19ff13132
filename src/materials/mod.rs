//! # Materials
//!
//! The abstract **Material** trait defines the interface that
//! material implementations must provide.
//!
//! - Lambertian

pub mod lambertian;

//! All geometric primitives implement a common interface, and the
//! rest of the renderer can use this interface without needing any
//! details about the underlying shape.
//!
//! - Plane
//! - Sphere
//!
//! ## Spheres
//!
//! Spheres are a special case of a general type of surfaces called
//! quadrics. They are the simplest type of curved surfaces that is
//! useful to a ray tracer and are a good starting point for general
//! ray intersection routines.
//!
//! ## Primitive Lists
//!
//! A **PrimitiveList** pairs each shape with its material and answers
//! the nearest-hit and shadow queries of a scene.

pub mod list;
pub mod plane;
pub mod sphere;

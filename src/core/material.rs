//! **Material** defines the interface that material implementations
//! must provide.

// jmist
use crate::core::geometry::Vector3f;
use crate::core::interaction::Intersection;
use crate::core::path::ScatteredRay;
use crate::core::rng::Random;
use crate::core::spectrum::{Color, WavelengthPacket};

pub trait Material: Send + Sync {
    /// Importance samples a continuation of the path arriving at `x`.
    /// `channel` is the wavelength the sample is drawn for; `None`
    /// means the path was absorbed.
    fn scatter(
        &self,
        x: &Intersection,
        lambda: &WavelengthPacket,
        channel: usize,
        rng: &mut dyn Random,
    ) -> Option<ScatteredRay>;
    /// The BSDF at `x` for light leaving in direction `v`.
    fn scattering(&self, x: &Intersection, v: &Vector3f, lambda: &WavelengthPacket) -> Color;
}

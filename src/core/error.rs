// others
use thiserror::Error;
// jmist
use crate::core::light::LightError;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("dispersion along a path is not supported")]
    DispersionUnsupported,
    #[error(transparent)]
    Light(#[from] LightError),
    #[error("failed to write image")]
    Image(#[from] image::ImageError),
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("render worker disconnected")]
    WorkerDisconnected,
    #[error("render worker panicked")]
    WorkerPanicked,
}

//! Errors reported before a render starts.
//!
//! Misses, parallel rays and total internal reflection are ordinary results,
//! never errors. Only bad configuration reaches the caller.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("camera view size must be non-zero with at most 2^32 - 1 pixels, got {width}x{height}")]
    InvalidCamera { width: u32, height: u32 },

    #[error("field of view must lie in (0, pi) radians, got {0}")]
    InvalidFieldOfView(f64),

    #[error("invalid render options: {0}")]
    InvalidOptions(String),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("failed to spawn render worker: {0}")]
    Worker(#[from] std::io::Error),

    #[error("failed to load render options: {0}")]
    Config(String),

    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, RenderError>;

use std::io;

/// All error types for the sonic-geode pipeline.
#[derive(thiserror::Error, Debug)]
pub enum SonicGeodeError {
    #[error("Geometry error: {0}")]
    Geometry(String),
    #[error("Catalog error: {0}")]
    Catalog(String),
    #[error("Compositor error: {0}")]
    Compositor(String),
    #[error("Spectrum error: {0}")]
    Spectrum(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Output error: {0}")]
    Output(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SonicGeodeError>;

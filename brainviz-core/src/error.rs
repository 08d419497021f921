//! Error types for brainviz

use thiserror::Error;

/// Main error type for brainviz operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Acquisition error: {0}")]
    Acquisition(String),

    #[error("Localization of source {index} failed: {message}")]
    Localization { index: usize, message: String },

    #[error("GPU error: {0}")]
    Gpu(String),

    #[error("Visualization error: {0}")]
    Visualization(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

impl Error {
    /// Shorthand for a failed localization of a single source
    pub fn localization(index: usize, message: impl Into<String>) -> Self {
        Error::Localization {
            index,
            message: message.into(),
        }
    }
}

/// Result type alias for brainviz operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(feature = "gpu")]
impl From<wgpu::SurfaceError> for Error {
    fn from(e: wgpu::SurfaceError) -> Self {
        Error::Gpu(e.to_string())
    }
}

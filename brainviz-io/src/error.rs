//! Error types for I/O operations

use thiserror::Error;

/// Errors that can occur while reading model and layout files
#[derive(Error, Debug)]
pub enum IoError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid file format: {format}")]
    InvalidFormat { format: String },

    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<IoError> for brainviz_core::Error {
    fn from(e: IoError) -> Self {
        match e {
            IoError::Io(io) => brainviz_core::Error::Io(io),
            IoError::InvalidFormat { format } => brainviz_core::Error::UnsupportedFormat(format),
            other => brainviz_core::Error::InvalidData(other.to_string()),
        }
    }
}

/// Open a file, reporting a missing path as [`IoError::FileNotFound`]
pub(crate) fn open(path: &std::path::Path) -> Result<std::fs::File, IoError> {
    std::fs::File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => IoError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => IoError::Io(e),
    })
}

//! Error types for VideoView
//!
//! This module defines the error types used throughout the crate.
//! We use thiserror for the library error enum and anyhow for
//! application-level error handling in the demo binary.

use thiserror::Error;

/// Main error type for VideoView
#[derive(Error, Debug)]
pub enum VideoViewError {
    /// A backend call was illegal in the backend's current state
    #[error("Backend error: {0}")]
    Backend(String),

    /// A render surface could not be created
    #[error("Surface error: {0}")]
    Surface(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Progress persistence errors
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// File I/O errors
    #[error("File error: {0}")]
    FileIO(#[from] std::io::Error),
}

impl From<crate::backend::BackendError> for VideoViewError {
    fn from(err: crate::backend::BackendError) -> Self {
        VideoViewError::Backend(err.to_string())
    }
}

impl From<serde_json::Error> for VideoViewError {
    fn from(err: serde_json::Error) -> Self {
        VideoViewError::Persistence(format!("JSON error: {}", err))
    }
}

/// Convenience type alias for Results in VideoView
pub type Result<T> = std::result::Result<T, VideoViewError>;

/// Extension trait for converting other errors to VideoViewError
pub trait IntoPlayerError<T> {
    /// Convert this error into a VideoViewError with the given context
    fn persistence_err(self, context: &str) -> Result<T>;
}

impl<T, E: std::fmt::Display> IntoPlayerError<T> for std::result::Result<T, E> {
    fn persistence_err(self, context: &str) -> Result<T> {
        self.map_err(|e| VideoViewError::Persistence(format!("{}: {}", context, e)))
    }
}

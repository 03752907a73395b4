//! Error types for ulofdm core

use thiserror::Error;

/// Core error types
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Buffer size mismatch: expected a multiple of {expected}, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    #[error("Invalid sample rate: {rate}")]
    InvalidSampleRate { rate: f64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for ulofdm core operations
pub type Result<T> = std::result::Result<T, CoreError>;

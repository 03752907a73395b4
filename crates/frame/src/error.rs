//! Error types for ulofdm frame

use thiserror::Error;

/// Frame processing error types
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("Invalid CRC (length {length})")]
    InvalidCrc { length: usize },

    #[error("Payload size {len} outside 1..={max} bytes")]
    PayloadSize { len: usize, max: usize },

    #[error("Frame size mismatch: expected {expected} samples, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("Coded bit stream of {count} bits is not pairwise")]
    RaggedCodedBits { count: usize },

    #[error("Modem error: {0}")]
    Modem(#[from] ulofdm_modem::ModemError),

    #[error("Core error: {0}")]
    Core(#[from] ulofdm_core::CoreError),
}

/// Result type for ulofdm frame operations
pub type Result<T> = std::result::Result<T, FrameError>;

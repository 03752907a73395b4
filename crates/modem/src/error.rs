//! Error types for ulofdm modem

use thiserror::Error;

/// Modem error types
#[derive(Error, Debug)]
pub enum ModemError {
    #[error("Bit count {count} is not a multiple of {bpsc} bits per subcarrier")]
    RaggedBitCount { count: usize, bpsc: usize },

    #[error("Sample count {count} is not a multiple of {multiple}")]
    RaggedSampleCount { count: usize, multiple: usize },

    #[error("Subcarrier map {map:#018x} has no data subcarriers")]
    EmptyScMap { map: u64 },

    #[error("Core error: {0}")]
    Core(#[from] ulofdm_core::CoreError),
}

/// Result type for ulofdm modem operations
pub type Result<T> = std::result::Result<T, ModemError>;

//! Error types for ulofdm link

use thiserror::Error;

/// Link error types
#[derive(Error, Debug)]
pub enum LinkError {
    #[error("Radio stream disconnected")]
    RadioDisconnected,

    #[error("Receive stage '{stage}' is no longer running")]
    StageDisconnected { stage: &'static str },

    #[error("Frame error: {0}")]
    Frame(#[from] ulofdm_frame::FrameError),

    #[error("Modem error: {0}")]
    Modem(#[from] ulofdm_modem::ModemError),

    #[error("Core error: {0}")]
    Core(#[from] ulofdm_core::CoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for ulofdm link operations
pub type Result<T> = std::result::Result<T, LinkError>;

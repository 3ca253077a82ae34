//! Error types for ttsbridge
//!
//! These surface only at the platform seam; the public facade absorbs every
//! failure into its documented degraded return value.

use std::io;
use thiserror::Error;

/// Main error type for ttsbridge
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Speech engine error: {0}")]
    Engine(String),

    #[error("Accessibility service error: {0}")]
    Accessibility(String),

    #[error("Dialog error: {0}")]
    Dialog(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for ttsbridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;

impl From<String> for BridgeError {
    fn from(s: String) -> Self {
        BridgeError::Other(s)
    }
}

impl From<&str> for BridgeError {
    fn from(s: &str) -> Self {
        BridgeError::Other(s.to_string())
    }
}

//! Error types for the onset analysis pipeline

use std::fmt;

/// Errors that can occur while analyzing or combining audio
#[derive(Debug, Clone)]
pub enum AnalysisError {
    /// Invalid configuration or input shape (non-positive frame rate,
    /// FFT size not a power of two, zero channels, mismatched inputs)
    InvalidConfig(String),

    /// Audio decoding error, or an I/O error while writing combined output
    DecodeFailed(String),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            AnalysisError::DecodeFailed(msg) => write!(f, "Decode failed: {}", msg),
        }
    }
}

impl std::error::Error for AnalysisError {}

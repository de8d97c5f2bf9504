//! Error types for the voicestar client

use thiserror::Error;

/// Result type alias for voicestar operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the voicestar client
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Catalog load failure; retryable by reloading
    #[error("failed to load celebrities: {0}")]
    Catalog(String),

    /// Local file rejected before upload
    #[error("{0}")]
    Validation(String),

    /// Submission attempted without a selected celebrity
    #[error("no celebrity selected")]
    NoTargetSelected,

    /// A conversion job is already in flight
    #[error("conversion already in progress")]
    ConversionInProgress,

    /// Remote conversion call failed
    #[error("voice conversion failed: {0}")]
    Conversion(String),

    /// Voice sample preview failed
    #[error("preview unavailable: {0}")]
    Preview(String),

    /// Audio device error
    #[error("audio error: {0}")]
    Audio(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

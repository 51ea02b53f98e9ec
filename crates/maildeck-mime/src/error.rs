//! Error types for MIME rendering.

use std::collections::TryReserveError;

/// Result type alias for MIME operations.
pub type Result<T> = std::result::Result<T, Error>;

/// MIME error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The MIME tree is structurally inconsistent and cannot be rendered.
    #[error("Invalid MIME structure: {0}")]
    Structure(String),

    /// Base64 decode error.
    #[error("Base64 decode error: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    /// An output buffer could not be grown.
    #[error("Resource exhaustion: {0}")]
    ResourceExhausted(#[from] TryReserveError),
}

impl Error {
    /// Returns true if the error was caused by allocation failure.
    #[must_use]
    pub const fn is_resource_exhaustion(&self) -> bool {
        matches!(self, Self::ResourceExhausted(_))
    }
}

//! Error types for the IMAP protocol layer.

use std::collections::TryReserveError;

use thiserror::Error;

/// Errors that can occur while interpreting or answering a client command.
#[derive(Debug, Error)]
pub enum Error {
    /// The client sent input that violates the protocol grammar.
    ///
    /// The command should be answered with `BAD`; the session stays open.
    #[error("Malformed input at position {position}: {message}")]
    Malformed {
        /// Byte offset (tokenizer) or token index (parser) of the problem.
        position: usize,
        /// Description of what went wrong.
        message: String,
    },

    /// A buffer could not be grown.
    ///
    /// Only the current command is aborted.
    #[error("Resource exhaustion: {0}")]
    ResourceExhausted(#[from] TryReserveError),

    /// MIME rendering failed.
    #[error("MIME error: {0}")]
    Mime(#[from] maildeck_mime::Error),

    /// I/O error while writing a response.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Creates a [`Error::Malformed`] error.
    pub(crate) fn malformed(position: usize, message: impl Into<String>) -> Self {
        Self::Malformed {
            position,
            message: message.into(),
        }
    }

    /// Returns true for protocol grammar violations.
    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed { .. })
    }

    /// Returns true if the error was caused by allocation failure.
    #[must_use]
    pub const fn is_resource_exhaustion(&self) -> bool {
        match self {
            Self::ResourceExhausted(_) => true,
            Self::Mime(err) => err.is_resource_exhaustion(),
            _ => false,
        }
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let err = Error::malformed(3, "unexpected ')'");
        assert!(err.is_malformed());
        assert!(!err.is_resource_exhaustion());
        assert_eq!(
            err.to_string(),
            "Malformed input at position 3: unexpected ')'"
        );

        let reserve = Vec::<u8>::new().try_reserve(usize::MAX).unwrap_err();
        let err = Error::from(reserve);
        assert!(err.is_resource_exhaustion());
        assert!(!err.is_malformed());
    }

    #[test]
    fn test_mime_resource_exhaustion() {
        let reserve = Vec::<u8>::new().try_reserve(usize::MAX).unwrap_err();
        let err = Error::from(maildeck_mime::Error::from(reserve));
        assert!(err.is_resource_exhaustion());

        let err = Error::from(maildeck_mime::Error::Structure("bad".into()));
        assert!(!err.is_resource_exhaustion());
    }
}

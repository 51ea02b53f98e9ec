//! Base64 encoding and decoding (RFC 4648 standard alphabet).
//!
//! Encoding pads the final group with `=` or `==`. Decoding expects
//! well-formed four-character groups and rejects embedded whitespace.

use crate::error::Result;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Encodes data as Base64.
#[must_use]
pub fn encode_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decodes Base64 data.
///
/// # Errors
///
/// Returns an error if the input is not a sequence of complete, correctly
/// padded four-character groups over the standard alphabet.
pub fn decode_base64(data: &str) -> Result<Vec<u8>> {
    STANDARD.decode(data).map_err(Into::into)
}

//! # maildeck-mime
//!
//! Read-only MIME rendering for IMAP servers.
//!
//! The message store parses each message once into a [`MimeNode`] tree.
//! This crate turns that tree into the RFC 3501 wire forms a FETCH response
//! needs, without ever modifying the tree or its header text:
//!
//! - [`BodyStructure`]: `BODY` and `BODYSTRUCTURE`
//! - [`Envelope`]: `ENVELOPE`
//! - [`dump_header_fields`] / [`dump_mime_header`]: `BODY[HEADER.FIELDS ...]`,
//!   `BODY[HEADER]`, `BODY[n.MIME]` with partial-fetch windows
//! - [`encoding`]: Base64
//!
//! ## Example
//!
//! ```
//! use maildeck_mime::{BodyStructure, Headers, MimeNode};
//!
//! let node = MimeNode::message(Headers::new().with("Content-Type", "text/plain"), 100, 5);
//! let rendered = BodyStructure::new(&node).to_bytes().unwrap();
//! assert_eq!(rendered, b"(\"TEXT\" \"PLAIN\" NIL NIL NIL NIL 100 5)");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod bodystructure;
mod content_type;
mod envelope;
mod error;
mod header;
mod node;
mod section;

pub mod encoding;
pub mod wire;

pub use bodystructure::{BodyStructure, DEFAULT_MAX_DEPTH};
pub use content_type::{
    ContentType, Parameters, write_media_type, write_parameters, write_type_and_parameters,
};
pub use envelope::{ADDRESS_FIELDS, Envelope};
pub use error::{Error, Result};
pub use header::{HeaderField, Headers};
pub use node::MimeNode;
pub use section::{
    ByteWindow, FieldFilter, HeaderDump, HeaderWindow, dump_header_fields, dump_mime_header,
};

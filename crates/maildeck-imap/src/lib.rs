//! # maildeck-imap
//!
//! Server-side IMAP4 command interpretation for FETCH.
//!
//! ## Features
//!
//! - **Argument tokenizer**: quoting, escapes and `()`/`[]` nesting
//! - **FETCH attribute parser**: macros, `BODY[...]` sections with part
//!   specifiers, field lists and `<start.count>` windows
//! - **Response assembly**: `ENVELOPE`, `BODY`, `BODYSTRUCTURE` and header
//!   sections rendered from a parsed MIME tree by `maildeck-mime`
//! - **Validators** for tags, command text and mailbox names
//! - **State checks** for command prerequisites and argument counts
//!
//! Parsing and rendering are pure functions; the only I/O is
//! [`FetchResponse::write_to`].
//!
//! ## Quick Start
//!
//! ```
//! use maildeck_imap::{FetchItemParser, FetchResponse, Limits, parser::tokenize};
//! use maildeck_mime::{Headers, MimeNode};
//!
//! let limits = Limits::default();
//! let tokens = tokenize("(UID BODY)").unwrap();
//! let request = FetchItemParser::parse(&tokens, &limits).unwrap();
//!
//! let node = MimeNode::message(Headers::new().with("Content-Type", "text/plain"), 100, 5);
//! let items = FetchResponse::new(&request, &node).to_bytes().unwrap();
//!
//! assert_eq!(items, b"BODY (\"TEXT\" \"PLAIN\" NIL NIL NIL NIL 100 5)");
//! assert!(request.needs_message_content());
//! ```
//!
//! ## Modules
//!
//! - [`parser`]: tokenizer and FETCH attribute parser
//! - [`protocol`]: session states and command prerequisites
//! - [`respond`]: FETCH response assembly
//! - [`types`]: parsed request types
//! - [`validate`]: character-class checks

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod config;
mod error;
pub mod parser;
pub mod protocol;
pub mod respond;
pub mod types;
pub mod validate;

pub use config::{Limits, LimitsBuilder};
pub use error::{Error, Result};
pub use parser::{FetchItemParser, Token};
pub use protocol::{Arity, CommandRejection, SessionState, StateRequirement};
pub use respond::FetchResponse;
pub use types::{BodySectionFetch, FetchRequest, SectionKind};

/// IMAP protocol version implemented.
pub const IMAP_VERSION: &str = "IMAP4rev1";

//! Client command argument parsing.
//!
//! - [`lexer`]: splits argument text into tokens
//! - [`fetch`]: builds a [`FetchRequest`](crate::FetchRequest) from tokens
//!
//! # Example
//!
//! ```
//! use maildeck_imap::Limits;
//! use maildeck_imap::parser::{FetchItemParser, lexer};
//!
//! let tokens = lexer::tokenize("(FLAGS BODY.PEEK[1.2.TEXT])").unwrap();
//! let request = FetchItemParser::parse(&tokens, &Limits::default()).unwrap();
//!
//! assert!(request.flags);
//! assert_eq!(request.sections[0].part, [1, 2]);
//! ```

pub mod fetch;
pub mod lexer;

pub use fetch::FetchItemParser;
pub use lexer::{Token, normalize, tokenize};

//! Argument token types.

use std::fmt;

/// Token produced by [`tokenize`](super::tokenize).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Run of characters outside quotes.
    Atom(String),
    /// Quoted string with the quotes removed and escapes resolved.
    Quoted(String),
    /// Opening parenthesis.
    LParen,
    /// Closing parenthesis.
    RParen,
    /// Opening bracket.
    LBracket,
    /// Closing bracket.
    RBracket,
}

impl Token {
    /// Returns the token text: the string content, or the delimiter itself.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Atom(s) | Self::Quoted(s) => s,
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBracket => "[",
            Self::RBracket => "]",
        }
    }

    /// Returns the atom text, if this is an atom.
    #[must_use]
    pub fn as_atom(&self) -> Option<&str> {
        match self {
            Self::Atom(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the text of an atom or quoted string.
    #[must_use]
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Self::Atom(s) | Self::Quoted(s) => Some(s),
            _ => None,
        }
    }

    /// Returns true for `(` and `[`.
    #[must_use]
    pub const fn is_opener(&self) -> bool {
        matches!(self, Self::LParen | Self::LBracket)
    }

    /// Returns true for `)` and `]`.
    #[must_use]
    pub const fn is_closer(&self) -> bool {
        matches!(self, Self::RParen | Self::RBracket)
    }

    /// Returns the token as it would appear on the wire.
    ///
    /// Quoted strings are re-quoted with `"` and `\` escaped, so tokenizing
    /// the result yields this token again.
    #[must_use]
    pub fn to_wire(&self) -> String {
        match self {
            Self::Quoted(s) => {
                let mut out = String::with_capacity(s.len() + 2);
                out.push('"');
                for c in s.chars() {
                    if c == '"' || c == '\\' {
                        out.push('\\');
                    }
                    out.push(c);
                }
                out.push('"');
                out
            }
            _ => self.as_str().to_string(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_str() {
        assert_eq!(Token::Atom("BODY".into()).as_str(), "BODY");
        assert_eq!(Token::Quoted("a b".into()).as_str(), "a b");
        assert_eq!(Token::LBracket.as_str(), "[");
        assert_eq!(Token::RParen.to_string(), ")");
    }

    #[test]
    fn test_to_wire_escapes() {
        assert_eq!(Token::Quoted(r#"say "hi" \o/"#.into()).to_wire(), r#""say \"hi\" \\o/""#);
        assert_eq!(Token::Quoted(String::new()).to_wire(), "\"\"");
        assert_eq!(Token::Atom("FLAGS".into()).to_wire(), "FLAGS");
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Token::Atom("X".into()).as_atom(), Some("X"));
        assert_eq!(Token::Quoted("X".into()).as_atom(), None);
        assert_eq!(Token::Quoted("X".into()).as_string(), Some("X"));
        assert!(Token::LParen.is_opener());
        assert!(Token::RBracket.is_closer());
        assert!(!Token::Atom("(".into()).is_opener());
    }
}

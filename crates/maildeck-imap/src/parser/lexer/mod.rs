//! Command argument tokenizer.
//!
//! Splits the argument text of a client command into atoms, quoted strings
//! and the structural delimiters `(`, `)`, `[` and `]`. Quoted text is never
//! split; `\"` and `\\` inside quotes yield the escaped character, any other
//! backslash is kept. Outside quotes, a `"` right after an unescaped `\` is
//! part of the atom rather than the start of a quoted string. Parentheses and
//! brackets must nest properly: `([)]` is rejected.

mod token;

pub use token::Token;

use crate::{Error, Result};

/// Tokenizes command arguments.
///
/// Empty input yields no tokens. A quote left open at the end of input takes
/// the rest of the input as its content.
///
/// # Errors
///
/// Returns [`Error::Malformed`] for an unmatched closer or an opener still
/// unclosed at the end of input, and [`Error::ResourceExhausted`] if the
/// token list cannot grow.
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut lexer = Lexer::new(input);
    lexer.run()?;
    tracing::trace!(count = lexer.tokens.len(), "Tokenized arguments");
    Ok(lexer.tokens)
}

/// Cleans up a raw argument line before tokenizing.
///
/// Drops up to two trailing CR/LF characters, leading and trailing spaces,
/// and collapses runs of spaces outside quotes to one space. Quoted text is
/// copied unchanged, including the text of a quote left open at the end.
///
/// # Errors
///
/// Returns [`Error::ResourceExhausted`] if the output cannot be allocated.
pub fn normalize(input: &str) -> Result<String> {
    let mut line = input;
    for _ in 0..2 {
        line = line
            .strip_suffix(|c: char| c == '\r' || c == '\n')
            .unwrap_or(line);
    }

    let mut out = String::new();
    out.try_reserve_exact(line.len())?;

    let mut in_quote = false;
    let mut escaped = false;
    let mut pending_space = false;

    for c in line.trim_start_matches(' ').chars() {
        if in_quote {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_quote = false;
            }
            continue;
        }

        if c == ' ' {
            pending_space = true;
            escaped = false;
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        in_quote = c == '"' && !escaped;
        escaped = c == '\\' && !escaped;
        out.push(c);
    }
    Ok(out)
}

/// Tokenizer state.
struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    tokens: Vec<Token>,
    // Open delimiters with their byte offsets.
    open: Vec<(u8, usize)>,
}

impl<'a> Lexer<'a> {
    const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            tokens: Vec::new(),
            open: Vec::new(),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn run(&mut self) -> Result<()> {
        while let Some(byte) = self.peek() {
            match byte {
                b' ' => self.pos += 1,
                b'(' | b'[' => {
                    self.open.push((byte, self.pos));
                    self.pos += 1;
                    self.push(if byte == b'(' {
                        Token::LParen
                    } else {
                        Token::LBracket
                    })?;
                }
                b')' | b']' => {
                    let expected = if byte == b')' { b'(' } else { b'[' };
                    match self.open.pop() {
                        Some((opener, _)) if opener == expected => {}
                        _ => {
                            return Err(Error::malformed(
                                self.pos,
                                format!("unmatched '{}'", char::from(byte)),
                            ));
                        }
                    }
                    self.pos += 1;
                    self.push(if byte == b')' {
                        Token::RParen
                    } else {
                        Token::RBracket
                    })?;
                }
                b'"' => self.read_quoted()?,
                _ => self.read_atom()?,
            }
        }

        if let Some(&(opener, position)) = self.open.last() {
            return Err(Error::malformed(
                self.input.len(),
                format!("'{}' at {position} is never closed", char::from(opener)),
            ));
        }
        Ok(())
    }

    fn push(&mut self, token: Token) -> Result<()> {
        self.tokens.try_reserve(1)?;
        self.tokens.push(token);
        Ok(())
    }

    fn read_atom(&mut self) -> Result<()> {
        let start = self.pos;
        let mut escaped = false;
        while let Some(byte) = self.peek() {
            match byte {
                b'"' if escaped => {}
                b' ' | b'(' | b')' | b'[' | b']' | b'"' => break,
                _ => {}
            }
            escaped = byte == b'\\' && !escaped;
            self.pos += 1;
        }

        let mut atom = String::new();
        push_str(&mut atom, &self.input[start..self.pos])?;
        self.push(Token::Atom(atom))
    }

    fn read_quoted(&mut self) -> Result<()> {
        let bytes = self.input.as_bytes();
        let open = self.pos;
        self.pos += 1;

        let mut value = String::new();
        // Start of the text not yet copied into `value`. Only ASCII bytes
        // are ever skipped, so every cut lands on a char boundary.
        let mut segment = self.pos;

        loop {
            match bytes.get(self.pos) {
                Some(b'"') => {
                    push_str(&mut value, &self.input[segment..self.pos])?;
                    self.pos += 1;
                    break;
                }
                Some(b'\\') if matches!(bytes.get(self.pos + 1), Some(b'"' | b'\\')) => {
                    push_str(&mut value, &self.input[segment..self.pos])?;
                    segment = self.pos + 1;
                    self.pos += 2;
                }
                Some(_) => self.pos += 1,
                None => {
                    push_str(&mut value, &self.input[segment..])?;
                    tracing::trace!(position = open, "Unterminated quoted string");
                    break;
                }
            }
        }

        self.push(Token::Quoted(value))
    }
}

fn push_str(out: &mut String, s: &str) -> Result<()> {
    out.try_reserve(s.len())?;
    out.push_str(s);
    Ok(())
}

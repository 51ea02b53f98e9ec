//! FETCH attribute parser.
//!
//! Builds a [`FetchRequest`] from the tokens of a `fetch-att` argument:
//!
//! ```text
//! FLAGS
//! (FLAGS UID BODY.PEEK[1.2.HEADER.FIELDS (DATE FROM)]<0.512>)
//! ```
//!
//! One attribute may stand alone; two or more need an enclosing `( )`.

use maildeck_mime::ByteWindow;

use super::lexer::Token;
use crate::config::Limits;
use crate::types::{BodySectionFetch, FetchRequest, SectionKind};
use crate::{Error, Result};

/// Parser over the tokens of one FETCH command.
pub struct FetchItemParser<'a> {
    tokens: &'a [Token],
    pos: usize,
    limits: &'a Limits,
}

impl<'a> FetchItemParser<'a> {
    /// Parses `tokens` into a new request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Malformed`] (positioned at the offending token
    /// index) for any grammar violation, and [`Error::ResourceExhausted`] if
    /// the section list cannot grow.
    pub fn parse(tokens: &'a [Token], limits: &'a Limits) -> Result<FetchRequest> {
        let mut request = FetchRequest::new();
        Self::parse_into(tokens, limits, &mut request)?;
        Ok(request)
    }

    /// Parses `tokens` into an existing request.
    ///
    /// Scalar attributes parsed before a failure stay set in `request`;
    /// its section list is cleared on failure.
    ///
    /// # Errors
    ///
    /// See [`parse`](Self::parse).
    pub fn parse_into(
        tokens: &'a [Token],
        limits: &'a Limits,
        request: &mut FetchRequest,
    ) -> Result<()> {
        let mut parser = Self {
            tokens,
            pos: 0,
            limits,
        };

        match parser.parse_request(request) {
            Ok(()) => {
                tracing::debug!(
                    flags = request.flags,
                    uid = request.uid,
                    envelope = request.envelope,
                    body_structure = request.body_structure,
                    body = request.body,
                    body_total = request.body_total || request.body_total_peek,
                    sections = request.sections.len(),
                    "Parsed FETCH attributes"
                );
                for section in &request.sections {
                    tracing::debug!(
                        kind = %section.kind,
                        part = ?section.part,
                        peek = section.peek,
                        window = ?section.window,
                        "FETCH body section"
                    );
                }
                Ok(())
            }
            Err(err) => {
                request.sections.clear();
                tracing::debug!(position = parser.pos, error = %err, "Malformed FETCH attributes");
                Err(err)
            }
        }
    }

    fn parse_request(&mut self, request: &mut FetchRequest) -> Result<()> {
        match self.tokens.first() {
            None => Err(self.error("missing FETCH attributes")),
            Some(Token::LParen) => {
                self.pos = 1;
                if self.peek() == Some(&Token::RParen) {
                    return Err(self.error("empty attribute list"));
                }
                loop {
                    match self.peek() {
                        Some(Token::RParen) => {
                            self.pos += 1;
                            break;
                        }
                        Some(_) => self.parse_item(request)?,
                        None => return Err(self.error("missing ')'")),
                    }
                }
                self.expect_end()
            }
            Some(_) => {
                self.parse_item(request)?;
                if self.pos < self.tokens.len() {
                    return Err(self.error("multiple attributes must be parenthesized"));
                }
                Ok(())
            }
        }
    }

    fn parse_item(&mut self, request: &mut FetchRequest) -> Result<()> {
        let Some(keyword) = self.peek().and_then(Token::as_atom) else {
            return Err(self.error("expected a FETCH attribute"));
        };
        let keyword = keyword.to_ascii_uppercase();
        self.pos += 1;

        match keyword.as_str() {
            "FLAGS" => request.flags = true,
            "INTERNALDATE" => request.internal_date = true,
            "UID" => request.uid = true,
            "RFC822" => request.rfc822 = true,
            "RFC822.HEADER" => request.rfc822_header = true,
            "RFC822.SIZE" => request.rfc822_size = true,
            "RFC822.TEXT" => request.rfc822_text = true,
            "ENVELOPE" => request.envelope = true,
            "BODYSTRUCTURE" => request.body_structure = true,
            "ALL" => request.set_all(),
            "FAST" => request.set_fast(),
            "FULL" => request.set_full(),
            "BODY" => {
                if self.peek() == Some(&Token::LBracket) {
                    self.parse_section(request, false)?;
                } else {
                    request.body = true;
                }
            }
            "BODY.PEEK" => {
                if self.peek() != Some(&Token::LBracket) {
                    return Err(self.error("BODY.PEEK requires a section"));
                }
                self.parse_section(request, true)?;
            }
            _ => {
                self.pos -= 1;
                return Err(self.error(format!("unknown FETCH attribute {keyword}")));
            }
        }
        Ok(())
    }

    /// Parses `[section]<window>`, starting at the `[`.
    fn parse_section(&mut self, request: &mut FetchRequest, peek: bool) -> Result<()> {
        self.pos += 1;

        if self.peek() == Some(&Token::RBracket) {
            self.pos += 1;
            if peek {
                request.body_total_peek = true;
            } else {
                request.body_total = true;
            }
            if let Some(window) = self.parse_window()? {
                request.whole_body_window = Some(window);
            }
            return Ok(());
        }

        let Some(spec) = self.peek().and_then(Token::as_atom) else {
            return Err(self.error("expected a section specifier"));
        };
        let (part, kind) = self.parse_section_spec(spec)?;
        self.pos += 1;

        let mut section = BodySectionFetch::new(part, kind);
        section.peek = peek;

        if kind.has_fields() {
            section.fields = self.parse_field_names()?;
        } else if kind == SectionKind::Mime && section.part.is_empty() {
            self.pos -= 1;
            return Err(self.error("MIME requires a part number"));
        }

        if self.peek() != Some(&Token::RBracket) {
            return Err(self.error("expected ']'"));
        }
        self.pos += 1;

        section.window = self.parse_window()?;

        request.sections.try_reserve(1)?;
        request.sections.push(section);
        Ok(())
    }

    /// Splits `1.2.HEADER` into its part path and kind.
    fn parse_section_spec(&self, spec: &str) -> Result<(Vec<u32>, SectionKind)> {
        let mut part = Vec::new();
        let mut rest = spec;

        while rest.starts_with(|c: char| c.is_ascii_digit()) {
            let digits = rest
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(rest.len());
            let n: u32 = rest[..digits]
                .parse()
                .map_err(|_| self.error("part number out of range"))?;
            if n == 0 {
                return Err(self.error("part numbers start at 1"));
            }
            part.try_reserve(1)?;
            part.push(n);

            rest = match rest[digits..].strip_prefix('.') {
                Some(after) if !after.is_empty() => after,
                _ => return Err(self.error(format!("missing section kind in {spec:?}"))),
            };
        }

        let part_len = spec.len() - rest.len();
        if part_len > self.limits.max_part_spec_len {
            return Err(self.error("part specifier too long"));
        }

        let kind = SectionKind::parse(rest)
            .ok_or_else(|| self.error(format!("unknown section {rest:?}")))?;
        Ok((part, kind))
    }

    /// Parses `(name name ...)`.
    fn parse_field_names(&mut self) -> Result<Vec<String>> {
        if self.peek() != Some(&Token::LParen) {
            return Err(self.error("expected '(' before field names"));
        }
        self.pos += 1;

        let mut names = Vec::new();
        loop {
            match self.peek() {
                Some(Token::RParen) => break,
                Some(token) => {
                    let Some(name) = token.as_string() else {
                        return Err(self.error("expected a field name"));
                    };
                    names.try_reserve(1)?;
                    names.push(name.to_string());
                    self.pos += 1;
                }
                None => return Err(self.error("missing ')' after field names")),
            }
        }

        if names.is_empty() {
            return Err(self.error("empty field name list"));
        }
        self.pos += 1;
        Ok(names)
    }

    /// Parses an optional `<start.count>` suffix.
    fn parse_window(&mut self) -> Result<Option<ByteWindow>> {
        let Some(text) = self
            .peek()
            .and_then(Token::as_atom)
            .filter(|s| s.starts_with('<'))
        else {
            return Ok(None);
        };

        let window = parse_window_text(text).ok_or_else(|| self.error("malformed <start.count>"))?;
        self.pos += 1;
        Ok(Some(window))
    }

    fn expect_end(&self) -> Result<()> {
        if self.pos < self.tokens.len() {
            return Err(self.error("unexpected tokens after ')'"));
        }
        Ok(())
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::malformed(self.pos, message)
    }
}

/// Parses `<start.count>`; both numbers are plain digit runs.
fn parse_window_text(text: &str) -> Option<ByteWindow> {
    let inner = text.strip_prefix('<')?.strip_suffix('>')?;
    let (start, count) = inner.split_once('.')?;

    let is_number = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !is_number(start) || !is_number(count) {
        return None;
    }
    Some(ByteWindow::new(start.parse().ok()?, count.parse().ok()?))
}

//! Parsed FETCH attribute types.

use std::fmt;

use maildeck_mime::ByteWindow;

use crate::parser::lexer::Token;

/// What a body section selects from its part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    /// Body text without the header.
    Text,
    /// The full header.
    Header,
    /// The MIME sub-header of a part.
    Mime,
    /// The listed header fields.
    HeaderFields,
    /// Every header field except the listed ones.
    HeaderFieldsNot,
}

impl SectionKind {
    /// Parses a section keyword, case-insensitively.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let kind = match s.to_ascii_uppercase().as_str() {
            "TEXT" => Self::Text,
            "HEADER" => Self::Header,
            "MIME" => Self::Mime,
            "HEADER.FIELDS" => Self::HeaderFields,
            "HEADER.FIELDS.NOT" => Self::HeaderFieldsNot,
            _ => return None,
        };
        Some(kind)
    }

    /// Returns the keyword for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::Header => "HEADER",
            Self::Mime => "MIME",
            Self::HeaderFields => "HEADER.FIELDS",
            Self::HeaderFieldsNot => "HEADER.FIELDS.NOT",
        }
    }

    /// Returns true for the kinds that carry a field-name list.
    #[must_use]
    pub const fn has_fields(self) -> bool {
        matches!(self, Self::HeaderFields | Self::HeaderFieldsNot)
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `BODY[...]` or `BODY.PEEK[...]` item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodySectionFetch {
    /// 1-based part path; empty for the top-level message.
    pub part: Vec<u32>,
    /// Section kind.
    pub kind: SectionKind,
    /// Field names for `HEADER.FIELDS` and `HEADER.FIELDS.NOT`.
    pub fields: Vec<String>,
    /// Partial-fetch window; `None` for the whole section.
    pub window: Option<ByteWindow>,
    /// `BODY.PEEK`: do not set `\Seen`.
    pub peek: bool,
}

impl BodySectionFetch {
    /// Creates a section without fields or window.
    #[must_use]
    pub const fn new(part: Vec<u32>, kind: SectionKind) -> Self {
        Self {
            part,
            kind,
            fields: Vec::new(),
            window: None,
            peek: false,
        }
    }

    /// Returns the section text as it appears between the brackets, e.g.
    /// `1.2.HEADER.FIELDS (DATE FROM)`.
    #[must_use]
    pub fn section_text(&self) -> String {
        let mut out = String::new();
        for n in &self.part {
            out.push_str(&n.to_string());
            out.push('.');
        }
        out.push_str(self.kind.as_str());

        if self.kind.has_fields() {
            out.push_str(" (");
            for (i, name) in self.fields.iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                push_field_name(&mut out, name);
            }
            out.push(')');
        }
        out
    }
}

/// Appends a field name, quoting it if it would not survive as an atom.
fn push_field_name(out: &mut String, name: &str) {
    let plain = !name.is_empty()
        && !name.bytes().any(|b| {
            matches!(b, b' ' | b'(' | b')' | b'[' | b']' | b'"' | b'\\') || b.is_ascii_control()
        });
    if plain {
        out.push_str(name);
    } else {
        out.push_str(&Token::Quoted(name.to_string()).to_wire());
    }
}

/// Attributes requested by one FETCH command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct FetchRequest {
    /// `FLAGS`.
    pub flags: bool,
    /// `INTERNALDATE`.
    pub internal_date: bool,
    /// `UID`.
    pub uid: bool,
    /// `RFC822`.
    pub rfc822: bool,
    /// `RFC822.HEADER`.
    pub rfc822_header: bool,
    /// `RFC822.SIZE`.
    pub rfc822_size: bool,
    /// `RFC822.TEXT`.
    pub rfc822_text: bool,
    /// `ENVELOPE`.
    pub envelope: bool,
    /// `BODYSTRUCTURE`.
    pub body_structure: bool,
    /// Bare `BODY`: structure without extension data.
    pub body: bool,
    /// `BODY[]`.
    pub body_total: bool,
    /// `BODY.PEEK[]`.
    pub body_total_peek: bool,
    /// Window of `BODY[]<start.count>`.
    pub whole_body_window: Option<ByteWindow>,
    /// Body sections, in request order.
    pub sections: Vec<BodySectionFetch>,
}

impl FetchRequest {
    /// Creates an empty request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the flags of the `FAST` macro.
    pub const fn set_fast(&mut self) {
        self.flags = true;
        self.internal_date = true;
        self.rfc822_size = true;
    }

    /// Sets the flags of the `ALL` macro.
    pub const fn set_all(&mut self) {
        self.set_fast();
        self.envelope = true;
    }

    /// Sets the flags of the `FULL` macro.
    pub const fn set_full(&mut self) {
        self.set_all();
        self.body_structure = true;
    }

    /// Returns true if answering needs data from the message store beyond
    /// the parsed MIME tree: message flags, UID, internal date, size, raw
    /// body text, or the whole message.
    #[must_use]
    pub fn needs_message_content(&self) -> bool {
        self.flags
            || self.uid
            || self.internal_date
            || self.rfc822
            || self.rfc822_text
            || self.rfc822_size
            || self.body_total
            || self.body_total_peek
            || self.sections.iter().any(|s| s.kind == SectionKind::Text)
    }

    /// Returns true if answering sets the `\Seen` flag.
    #[must_use]
    pub fn sets_seen(&self) -> bool {
        self.rfc822
            || self.rfc822_text
            || self.body_total
            || self.sections.iter().any(|s| !s.peek)
    }
}

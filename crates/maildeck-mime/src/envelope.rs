//! ENVELOPE rendering (RFC 3501 `envelope`).

use std::borrow::Cow;

use crate::header::Headers;
use crate::wire::{NIL, write_nstring, write_string};

/// Header fields rendered as address lists, in envelope order.
pub const ADDRESS_FIELDS: [&str; 7] = ["from", "sender", "reply-to", "to", "cc", "bcc", "in-reply-to"];

/// Renders the envelope of a message header.
///
/// Output has the shape
/// `(date subject from sender reply-to to cc bcc in-reply-to message-id)`.
/// Scalar fields are quoted or `NIL`; each address-list field is a
/// parenthesised list of `(name NIL mailbox host)` entries, or `NIL` when
/// the header is absent or empty.
#[derive(Debug, Clone, Copy)]
pub struct Envelope<'a> {
    header: &'a Headers,
}

impl<'a> Envelope<'a> {
    /// Creates an envelope renderer over a message header.
    #[must_use]
    pub const fn new(header: &'a Headers) -> Self {
        Self { header }
    }

    /// Appends the rendered envelope to `buf`.
    pub fn write(&self, buf: &mut Vec<u8>) {
        buf.push(b'(');
        write_nstring(buf, self.header.get_non_empty("date"));
        buf.push(b' ');
        write_nstring(buf, self.header.get_non_empty("subject"));

        for name in ADDRESS_FIELDS {
            buf.push(b' ');
            write_address_list(buf, self.header.get_non_empty(name));
        }

        buf.push(b' ');
        write_nstring(buf, self.header.get_non_empty("message-id"));
        buf.push(b')');
    }

    /// Returns the rendered envelope.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.write(&mut buf);
        buf
    }
}

/// Writes an address-list header value.
fn write_address_list(buf: &mut Vec<u8>, value: Option<&str>) {
    let addresses: Vec<&str> = value
        .map(split_addresses)
        .unwrap_or_default()
        .into_iter()
        .map(str::trim)
        .filter(|address| !address.is_empty())
        .collect();

    if addresses.is_empty() {
        buf.extend_from_slice(NIL);
        return;
    }

    buf.push(b'(');
    for address in addresses {
        write_address(buf, address);
    }
    buf.push(b')');
}

/// Splits an address list on commas that are outside quotes and angle
/// brackets.
fn split_addresses(value: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_quote = false;
    let mut escaped = false;
    let mut angle_depth = 0u32;

    for (i, c) in value.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_quote => escaped = true,
            '"' => in_quote = !in_quote,
            '<' if !in_quote => angle_depth += 1,
            '>' if !in_quote => angle_depth = angle_depth.saturating_sub(1),
            ',' if !in_quote && angle_depth == 0 => {
                parts.push(&value[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&value[start..]);
    parts
}

/// Writes one address as `(name NIL mailbox host)`.
fn write_address(buf: &mut Vec<u8>, address: &str) {
    let (name, spec) = match address.rfind('<') {
        Some(lt) => {
            let name = unquote(address[..lt].trim());
            let spec = &address[lt + 1..];
            let spec = spec.find('>').map_or(spec, |gt| &spec[..gt]);
            ((!name.is_empty()).then(|| unescape(name)), spec.trim())
        }
        None => (None, address),
    };

    buf.push(b'(');
    write_nstring(buf, name.as_deref());
    buf.extend_from_slice(b" NIL ");
    match split_at_sign(spec) {
        Some((mailbox, host)) => {
            write_string(buf, mailbox);
            buf.push(b' ');
            write_string(buf, host);
        }
        None => {
            write_string(buf, spec);
            buf.push(b' ');
            buf.extend_from_slice(NIL);
        }
    }
    buf.push(b')');
}

/// Strips one pair of surrounding double quotes.
fn unquote(s: &str) -> &str {
    s.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(s)
}

/// Resolves backslash escapes in a display name.
fn unescape(s: &str) -> Cow<'_, str> {
    if !s.contains('\\') {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

/// Splits an addr-spec at its first unescaped `@`.
fn split_at_sign(spec: &str) -> Option<(&str, &str)> {
    let bytes = spec.as_bytes();
    let at = (0..bytes.len()).find(|&i| bytes[i] == b'@' && (i == 0 || bytes[i - 1] != b'\\'))?;
    Some((&spec[..at], &spec[at + 1..]))
}

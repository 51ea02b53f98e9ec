//! Media type and parameter list rendering.
//!
//! Header values such as `Content-Type` and `Content-Disposition` have the
//! shape `type/subtype; name=value; name="value"`. [`ContentType`] is a
//! borrowed view over such a value; it never copies or modifies the
//! underlying header text.

use crate::wire::{NIL, write_string};

/// Borrowed view over a `type/subtype; name=value` header value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentType<'a> {
    media: &'a str,
    params: Option<&'a str>,
}

impl<'a> ContentType<'a> {
    /// Creates a view over a raw header value.
    #[must_use]
    pub fn new(value: &'a str) -> Self {
        match value.split_once(';') {
            Some((media, params)) => Self {
                media: media.trim(),
                params: Some(params),
            },
            None => Self {
                media: value.trim(),
                params: None,
            },
        }
    }

    /// Returns the text before the first `;`, trimmed.
    #[must_use]
    pub const fn media(&self) -> &'a str {
        self.media
    }

    /// Returns the main type (text before `/`).
    #[must_use]
    pub fn main_type(&self) -> &'a str {
        self.media
            .split_once('/')
            .map_or(self.media, |(main, _)| main.trim())
    }

    /// Returns the subtype (text after `/`), if a `/` is present.
    #[must_use]
    pub fn sub_type(&self) -> Option<&'a str> {
        self.media.split_once('/').map(|(_, sub)| sub.trim())
    }

    /// Checks if this is a multipart content type.
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        self.main_type().eq_ignore_ascii_case("multipart")
    }

    /// Checks if this is a text content type.
    #[must_use]
    pub fn is_text(&self) -> bool {
        self.main_type().eq_ignore_ascii_case("text")
    }

    /// Checks if this is an encapsulated `message/rfc822`.
    #[must_use]
    pub fn is_message_rfc822(&self) -> bool {
        self.main_type().eq_ignore_ascii_case("message")
            && self
                .sub_type()
                .is_some_and(|sub| sub.eq_ignore_ascii_case("rfc822"))
    }

    /// Returns an iterator over the `name=value` attributes.
    #[must_use]
    pub fn parameters(&self) -> Parameters<'a> {
        Parameters {
            rest: self.params,
            truncated: false,
        }
    }
}

/// Iterator over the attributes of a [`ContentType`].
///
/// Names and values may be wrapped in single or double quotes, which are
/// stripped. Iteration stops at the first malformed attribute (a name
/// without `=value`, or an unterminated quote); [`truncated`] then reports
/// `true`.
///
/// [`truncated`]: Parameters::truncated
#[derive(Debug, Clone)]
pub struct Parameters<'a> {
    rest: Option<&'a str>,
    truncated: bool,
}

impl Parameters<'_> {
    /// Returns true if iteration stopped at a malformed attribute.
    #[must_use]
    pub const fn truncated(&self) -> bool {
        self.truncated
    }
}

impl<'a> Iterator for Parameters<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let s = self.rest?.trim_start();
        if s.is_empty() {
            self.rest = None;
            return None;
        }

        let Some((name, after_name)) = split_name(s) else {
            self.rest = None;
            self.truncated = true;
            return None;
        };
        let Some((value, after_value)) = split_value(after_name.trim_start()) else {
            self.rest = None;
            self.truncated = true;
            return None;
        };

        self.rest = after_value.find(';').map(|i| &after_value[i + 1..]);
        Some((name, value))
    }
}

/// Returns the quote character `s` starts with, if any.
fn leading_quote(s: &str) -> Option<char> {
    s.chars().next().filter(|&c| c == '"' || c == '\'')
}

/// Splits `name=` off the front of `s`, returning the name and the text
/// after `=`.
fn split_name(s: &str) -> Option<(&str, &str)> {
    if let Some(quote) = leading_quote(s) {
        let inner = &s[1..];
        let end = inner.find(quote)?;
        let after = inner[end + 1..].strip_prefix('=')?;
        return Some((&inner[..end], after));
    }

    let end = s.find(['=', ';'])?;
    if !s[end..].starts_with('=') {
        return None;
    }
    Some((s[..end].trim_end(), &s[end + 1..]))
}

/// Splits a value off the front of `s`, returning it and the remainder.
fn split_value(s: &str) -> Option<(&str, &str)> {
    if let Some(quote) = leading_quote(s) {
        let inner = &s[1..];
        let end = inner.find(quote)?;
        return Some((&inner[..end], &inner[end + 1..]));
    }

    let end = s
        .find(|c: char| c.is_ascii_whitespace() || c == ';')
        .unwrap_or(s.len());
    Some((&s[..end], &s[end..]))
}

/// Writes `"TYPE" "SUBTYPE"`, upper-cased.
///
/// A value without `/` is written as its single quoted media string followed
/// by ` NIL`.
pub fn write_media_type(buf: &mut Vec<u8>, content_type: &ContentType<'_>) {
    match content_type.sub_type() {
        Some(sub) => {
            write_string(buf, &content_type.main_type().to_ascii_uppercase());
            buf.push(b' ');
            write_string(buf, &sub.to_ascii_uppercase());
        }
        None => {
            write_string(buf, &content_type.media().to_ascii_uppercase());
            buf.push(b' ');
            buf.extend_from_slice(NIL);
        }
    }
}

/// Writes the attribute list as `("name" "value" ...)`, or `NIL` when there
/// are no well-formed attributes.
pub fn write_parameters(buf: &mut Vec<u8>, content_type: &ContentType<'_>) {
    let mut params = content_type.parameters();
    let mut first = true;

    for (name, value) in params.by_ref() {
        buf.push(if first { b'(' } else { b' ' });
        first = false;
        write_string(buf, name);
        buf.push(b' ');
        write_string(buf, value);
    }

    if first {
        buf.extend_from_slice(NIL);
    } else {
        buf.push(b')');
    }

    if params.truncated() {
        tracing::warn!(
            value = content_type.media(),
            "Truncated malformed MIME parameter list"
        );
    }
}

/// Writes `"type" "subtype" (params)`, the leading fields of a
/// non-multipart body.
pub fn write_type_and_parameters(buf: &mut Vec<u8>, content_type: &ContentType<'_>) {
    write_media_type(buf, content_type);
    buf.push(b' ');
    write_parameters(buf, content_type);
}

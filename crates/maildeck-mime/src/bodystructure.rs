//! BODY / BODYSTRUCTURE rendering (RFC 3501 `body`).
//!
//! The shape of each node depends on its content type:
//!
//! - `multipart/*`: `(child)(child)... "subtype"`, followed under extension
//!   data by the content-type parameters and `NIL` placeholders for
//!   disposition and language.
//! - `message/rfc822` part: the basic fields, then the envelope and the
//!   body structure of the encapsulated message, then its line count.
//! - `text/*`, or no content type at all: the basic fields, then the line
//!   count.
//! - anything else: the basic fields.
//!
//! Basic fields are `type subtype (params) id description encoding size`.
//! Extension data on non-multipart bodies is `md5 (disposition) language`.

use crate::content_type::{ContentType, write_parameters, write_type_and_parameters};
use crate::envelope::Envelope;
use crate::error::{Error, Result};
use crate::header::Headers;
use crate::node::MimeNode;
use crate::wire::{NIL, write_nstring, write_number, write_string};

/// Default nesting limit for rendering.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Renders the MIME structure of a message.
#[derive(Debug, Clone, Copy)]
pub struct BodyStructure<'a> {
    node: &'a MimeNode,
    extension_data: bool,
    max_depth: usize,
}

impl<'a> BodyStructure<'a> {
    /// Creates a renderer for `BODY` (no extension data).
    #[must_use]
    pub const fn new(node: &'a MimeNode) -> Self {
        Self {
            node,
            extension_data: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets whether extension data is rendered (`BODYSTRUCTURE`).
    #[must_use]
    pub const fn extension_data(mut self, extension_data: bool) -> Self {
        self.extension_data = extension_data;
        self
    }

    /// Sets the deepest nesting that will be rendered.
    #[must_use]
    pub const fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Appends the rendered structure to `buf`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Structure`] if a multipart content type has an empty
    /// subtype or the tree nests deeper than the configured limit. Output
    /// written before the failure is left in `buf`.
    pub fn write(&self, buf: &mut Vec<u8>) -> Result<()> {
        self.write_body(buf, self.node, false, 0)
    }

    /// Returns the rendered structure.
    ///
    /// # Errors
    ///
    /// See [`write`](Self::write).
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.write(&mut buf)?;
        Ok(buf)
    }

    fn write_body(
        &self,
        buf: &mut Vec<u8>,
        node: &MimeNode,
        encapsulated: bool,
        depth: usize,
    ) -> Result<()> {
        if depth > self.max_depth {
            tracing::warn!(depth, "MIME nesting too deep to render");
            return Err(Error::Structure(format!(
                "nesting exceeds {} levels",
                self.max_depth
            )));
        }

        // The encapsulated view of a message/rfc822 part ignores its MIME
        // sub-header and describes the inner message.
        let is_part = !encapsulated && node.has_mime_header();
        let header = if encapsulated {
            &node.rfc_header
        } else {
            node.content_header()
        };
        let content_type = header.get_non_empty("content-type").map(ContentType::new);

        buf.push(b'(');
        match content_type {
            Some(ct) if ct.is_multipart() => self.write_multipart(buf, node, &ct, depth)?,
            _ => self.write_single(buf, node, header, content_type.as_ref(), is_part, depth)?,
        }
        buf.push(b')');
        Ok(())
    }

    fn write_multipart(
        &self,
        buf: &mut Vec<u8>,
        node: &MimeNode,
        content_type: &ContentType<'_>,
        depth: usize,
    ) -> Result<()> {
        for child in &node.children {
            self.write_body(buf, child, false, depth + 1)?;
        }

        buf.push(b' ');
        match content_type.sub_type() {
            Some("") => {
                tracing::warn!(
                    value = content_type.media(),
                    "Multipart content type without subtype"
                );
                return Err(Error::Structure(format!(
                    "multipart content type {:?} has an empty subtype",
                    content_type.media()
                )));
            }
            Some(sub) => write_string(buf, &sub.to_ascii_uppercase()),
            None => buf.extend_from_slice(NIL),
        }

        if self.extension_data {
            buf.push(b' ');
            write_parameters(buf, content_type);
            buf.extend_from_slice(b" NIL NIL");
        }
        Ok(())
    }

    fn write_single(
        &self,
        buf: &mut Vec<u8>,
        node: &MimeNode,
        header: &Headers,
        content_type: Option<&ContentType<'_>>,
        is_part: bool,
        depth: usize,
    ) -> Result<()> {
        match content_type {
            Some(ct) => write_type_and_parameters(buf, ct),
            None => buf.extend_from_slice(b"\"TEXT\" \"PLAIN\" NIL"),
        }

        for name in ["content-id", "content-description", "content-transfer-encoding"] {
            buf.push(b' ');
            write_nstring(buf, header.get_non_empty(name));
        }
        buf.push(b' ');
        write_number(buf, node.body_size);

        match content_type {
            Some(ct) if is_part && ct.is_message_rfc822() => {
                buf.push(b' ');
                Envelope::new(&node.rfc_header).write(buf);
                buf.push(b' ');
                self.write_body(buf, node, true, depth + 1)?;
                buf.push(b' ');
                write_number(buf, node.body_lines);
            }
            Some(ct) if !ct.is_text() => {}
            _ => {
                buf.push(b' ');
                write_number(buf, node.body_lines);
            }
        }

        if self.extension_data {
            buf.push(b' ');
            write_nstring(buf, header.get_non_empty("content-md5"));

            buf.push(b' ');
            match header.get_non_empty("content-disposition") {
                Some(disposition) => {
                    let disposition = ContentType::new(disposition);
                    buf.push(b'(');
                    write_string(buf, disposition.media());
                    buf.push(b' ');
                    write_parameters(buf, &disposition);
                    buf.push(b')');
                }
                None => buf.extend_from_slice(NIL),
            }

            buf.push(b' ');
            write_nstring(buf, header.get_non_empty("content-language"));
        }
        Ok(())
    }
}

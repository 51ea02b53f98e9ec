//! FETCH response assembly.
//!
//! Renders the `msg-att` items that are derived from a message's parsed
//! MIME tree. Items that need the raw stored message (see
//! [`FetchRequest::needs_message_content`]) are left to the caller, which
//! appends them to the same response.

use maildeck_mime::{
    BodyStructure, Envelope, FieldFilter, HeaderDump, MimeNode, dump_header_fields,
    dump_mime_header,
};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::config::Limits;
use crate::types::{BodySectionFetch, FetchRequest, SectionKind};
use crate::Result;

/// Structure-derived part of one message's FETCH response.
#[derive(Debug, Clone, Copy)]
pub struct FetchResponse<'a> {
    request: &'a FetchRequest,
    node: &'a MimeNode,
    limits: Limits,
}

impl<'a> FetchResponse<'a> {
    /// Creates a response for `request` against the message tree `node`.
    #[must_use]
    pub const fn new(request: &'a FetchRequest, node: &'a MimeNode) -> Self {
        Self {
            request,
            node,
            limits: Limits::new(),
        }
    }

    /// Sets the limits used while rendering.
    #[must_use]
    pub const fn limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Appends the rendered items to `buf`, separated by spaces.
    ///
    /// Items are written in a fixed order: `ENVELOPE`, `BODY`,
    /// `BODYSTRUCTURE`, `RFC822.HEADER`, then the header sections in
    /// request order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Mime`](crate::Error::Mime) if the tree cannot be
    /// rendered. Items already written stay in `buf`.
    pub fn write(&self, buf: &mut Vec<u8>) -> Result<()> {
        let start = buf.len();
        let separate = |buf: &mut Vec<u8>| {
            if buf.len() > start {
                buf.push(b' ');
            }
        };

        if self.request.envelope {
            separate(buf);
            buf.extend_from_slice(b"ENVELOPE ");
            Envelope::new(&self.node.rfc_header).write(buf);
        }
        if self.request.body {
            separate(buf);
            buf.extend_from_slice(b"BODY ");
            self.structure(false).write(buf)?;
        }
        if self.request.body_structure {
            separate(buf);
            buf.extend_from_slice(b"BODYSTRUCTURE ");
            self.structure(true).write(buf)?;
        }
        if self.request.rfc822_header {
            separate(buf);
            buf.extend_from_slice(b"RFC822.HEADER ");
            dump_header_fields(&self.node.rfc_header, FieldFilter::All, None)?
                .write_literal(buf, false);
        }

        for section in &self.request.sections {
            if section.kind == SectionKind::Text {
                continue;
            }
            separate(buf);
            self.write_section(buf, section)?;
        }
        Ok(())
    }

    /// Returns the rendered items.
    ///
    /// # Errors
    ///
    /// See [`write`](Self::write).
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.write(&mut buf)?;
        Ok(buf)
    }

    /// Renders the items and writes them to `sink`.
    ///
    /// Rendering completes before the first byte is written, so a render
    /// failure leaves the sink untouched.
    ///
    /// # Errors
    ///
    /// Returns rendering errors as for [`write`](Self::write), and
    /// [`Error::Io`](crate::Error::Io) if the sink fails.
    pub async fn write_to<W>(&self, sink: &mut W) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let rendered = self.to_bytes()?;
        sink.write_all(&rendered).await?;
        sink.flush().await?;
        Ok(())
    }

    fn structure(&self, extension_data: bool) -> BodyStructure<'a> {
        BodyStructure::new(self.node)
            .extension_data(extension_data)
            .max_depth(self.limits.max_mime_depth)
    }

    fn write_section(&self, buf: &mut Vec<u8>, section: &BodySectionFetch) -> Result<()> {
        buf.extend_from_slice(b"BODY[");
        buf.extend_from_slice(section.section_text().as_bytes());
        buf.push(b']');

        let dump = match self.node.find_part(&section.part) {
            Some(part) => section_dump(part, section)?,
            None => {
                tracing::debug!(part = ?section.part, "FETCH of a part that does not exist");
                HeaderDump::Nil
            }
        };

        if matches!(dump, HeaderDump::Nil) {
            buf.extend_from_slice(b" NIL");
        } else if section.window.is_some() {
            dump.write_literal(buf, true);
        } else {
            buf.push(b' ');
            dump.write_literal(buf, false);
        }
        Ok(())
    }
}

fn section_dump(part: &MimeNode, section: &BodySectionFetch) -> Result<HeaderDump> {
    let dump = match section.kind {
        SectionKind::Mime => dump_mime_header(part, section.window)?,
        SectionKind::Header => dump_header_fields(&part.rfc_header, FieldFilter::All, section.window)?,
        SectionKind::HeaderFields => dump_header_fields(
            &part.rfc_header,
            FieldFilter::Include(&section.fields),
            section.window,
        )?,
        SectionKind::HeaderFieldsNot => dump_header_fields(
            &part.rfc_header,
            FieldFilter::Exclude(&section.fields),
            section.window,
        )?,
        SectionKind::Text => HeaderDump::Nil,
    };
    Ok(dump)
}

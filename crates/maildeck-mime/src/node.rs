//! Parsed MIME tree supplied by the message store.

use crate::header::Headers;

/// One node of a parsed MIME tree.
///
/// The top-level message carries only an RFC 2822 header. A body part of a
/// multipart carries its own MIME sub-header; when that part is a
/// `message/rfc822`, the encapsulated message's header lives in
/// [`rfc_header`](Self::rfc_header) and its parts in
/// [`children`](Self::children).
///
/// Nodes are built once and only read afterwards, so a tree can be rendered
/// from any number of concurrent requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MimeNode {
    /// Message-level header.
    pub rfc_header: Headers,
    /// Part-level MIME header, present for body parts of a multipart.
    pub mime_header: Option<Headers>,
    /// Body size in bytes.
    pub body_size: u64,
    /// Body size in lines.
    pub body_lines: u64,
    /// Child parts, non-empty only for multipart content.
    pub children: Vec<Self>,
}

impl MimeNode {
    /// Creates a top-level message node.
    #[must_use]
    pub fn message(rfc_header: Headers, body_size: u64, body_lines: u64) -> Self {
        Self {
            rfc_header,
            mime_header: None,
            body_size,
            body_lines,
            children: Vec::new(),
        }
    }

    /// Creates a body part node with its own MIME sub-header.
    #[must_use]
    pub fn part(mime_header: Headers, body_size: u64, body_lines: u64) -> Self {
        Self {
            rfc_header: Headers::new(),
            mime_header: Some(mime_header),
            body_size,
            body_lines,
            children: Vec::new(),
        }
    }

    /// Sets the encapsulated message header, builder style.
    #[must_use]
    pub fn with_rfc_header(mut self, rfc_header: Headers) -> Self {
        self.rfc_header = rfc_header;
        self
    }

    /// Appends a child part, builder style.
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Returns true if this node carries its own MIME sub-header.
    #[must_use]
    pub const fn has_mime_header(&self) -> bool {
        self.mime_header.is_some()
    }

    /// Returns the header that describes this node's content: the MIME
    /// sub-header when present, otherwise the message header.
    #[must_use]
    pub fn content_header(&self) -> &Headers {
        self.mime_header.as_ref().unwrap_or(&self.rfc_header)
    }

    /// Resolves a part-specifier to a sub-node.
    ///
    /// An empty specifier addresses the node itself. Each segment is a
    /// 1-based child index; an index of zero or past the last child yields
    /// `None`.
    #[must_use]
    pub fn find_part(&self, part: &[u32]) -> Option<&Self> {
        let Some((&first, rest)) = part.split_first() else {
            return Some(self);
        };
        let index = usize::try_from(first).ok()?.checked_sub(1)?;
        self.children.get(index)?.find_part(rest)
    }
}

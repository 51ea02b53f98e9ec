//! Header-subset dumps for `BODY[HEADER.FIELDS ...]`, `BODY[n.MIME]` and
//! friends.
//!
//! The selected fields are rendered as `Name: value` lines followed by a
//! blank line, then cut to the requested byte window.

use crate::error::Result;
use crate::header::{HeaderField, Headers};
use crate::node::MimeNode;
use crate::wire::NIL;

/// Partial-fetch byte range (`<start.count>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ByteWindow {
    /// First byte offset.
    pub start: u64,
    /// Number of bytes.
    pub count: u64,
}

impl ByteWindow {
    /// Creates a new byte window.
    #[must_use]
    pub const fn new(start: u64, count: u64) -> Self {
        Self { start, count }
    }

    /// Clamps the window into `[0, size]`, returning `(offset, count)`.
    ///
    /// A start at or past `size` yields a zero-length window at `size`.
    #[must_use]
    pub const fn clamp(self, size: u64) -> (u64, u64) {
        if self.start >= size {
            return (size, 0);
        }
        let available = size - self.start;
        let count = if self.count < available {
            self.count
        } else {
            available
        };
        (self.start, count)
    }
}

/// Which header fields to dump.
#[derive(Debug, Clone, Copy)]
pub enum FieldFilter<'a> {
    /// Every field.
    All,
    /// Only fields whose name is in the list (case-insensitive).
    Include(&'a [String]),
    /// Only fields whose name is not in the list (case-insensitive).
    Exclude(&'a [String]),
}

impl FieldFilter<'_> {
    /// Returns true if `field` is selected.
    #[must_use]
    pub fn matches(&self, field: &HeaderField) -> bool {
        match self {
            Self::All => true,
            Self::Include(names) => names.iter().any(|name| field.is(name)),
            Self::Exclude(names) => !names.iter().any(|name| field.is(name)),
        }
    }
}

/// A rendered header window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderWindow {
    /// Offset of `data` within the full rendering.
    pub offset: u64,
    /// Size of the full rendering, before windowing.
    pub total_size: u64,
    /// The windowed bytes.
    pub data: Vec<u8>,
}

/// Result of a header dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderDump {
    /// No header to dump.
    Nil,
    /// The selected fields, windowed.
    Window(HeaderWindow),
}

impl HeaderDump {
    /// Returns the windowed bytes, or `None` for [`HeaderDump::Nil`].
    #[must_use]
    pub fn data(&self) -> Option<&[u8]> {
        match self {
            Self::Nil => None,
            Self::Window(window) => Some(&window.data),
        }
    }

    /// Writes the dump as an IMAP value: `NIL`, or a literal
    /// `{count}\r\n<data>`. With `show_origin`, the literal is preceded by
    /// `<offset> `.
    pub fn write_literal(&self, buf: &mut Vec<u8>, show_origin: bool) {
        match self {
            Self::Nil => buf.extend_from_slice(NIL),
            Self::Window(window) => {
                if show_origin {
                    buf.extend_from_slice(format!("<{}> ", window.offset).as_bytes());
                }
                buf.extend_from_slice(format!("{{{}}}\r\n", window.data.len()).as_bytes());
                buf.extend_from_slice(&window.data);
            }
        }
    }
}

/// Dumps the fields of `header` selected by `filter`, cut to `window`.
///
/// Without a window the whole rendering is returned. An empty header yields
/// [`HeaderDump::Nil`].
///
/// # Errors
///
/// Returns [`Error::ResourceExhausted`](crate::Error::ResourceExhausted) if
/// the rendering buffer cannot be allocated.
pub fn dump_header_fields(
    header: &Headers,
    filter: FieldFilter<'_>,
    window: Option<ByteWindow>,
) -> Result<HeaderDump> {
    if header.is_empty() {
        return Ok(HeaderDump::Nil);
    }

    let selected: Vec<&HeaderField> = header.iter().filter(|f| filter.matches(f)).collect();
    let size: usize = selected
        .iter()
        .map(|f| f.name.len() + f.value.len() + 4)
        .sum::<usize>()
        + 2;

    let mut rendered = Vec::new();
    rendered.try_reserve_exact(size)?;
    for field in selected {
        rendered.extend_from_slice(field.name.as_bytes());
        rendered.extend_from_slice(b": ");
        rendered.extend_from_slice(field.value.as_bytes());
        rendered.extend_from_slice(b"\r\n");
    }
    rendered.extend_from_slice(b"\r\n");

    let total_size = rendered.len() as u64;
    let (offset, count) = window.map_or((0, total_size), |w| w.clamp(total_size));

    // Both bounds are clamped to the rendering, which lives in memory.
    #[allow(clippy::cast_possible_truncation)]
    let data = rendered[offset as usize..(offset + count) as usize].to_vec();

    tracing::trace!(total_size, offset, count, "Dumped header fields");

    Ok(HeaderDump::Window(HeaderWindow {
        offset,
        total_size,
        data,
    }))
}

/// Dumps every field of a node's MIME sub-header, cut to `window`.
///
/// A node without a MIME sub-header yields [`HeaderDump::Nil`].
///
/// # Errors
///
/// See [`dump_header_fields`].
pub fn dump_mime_header(node: &MimeNode, window: Option<ByteWindow>) -> Result<HeaderDump> {
    match &node.mime_header {
        Some(header) => dump_header_fields(header, FieldFilter::All, window),
        None => Ok(HeaderDump::Nil),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn header() -> Headers {
        Headers::new()
            .with("Date", "Mon, 7 Feb 1994 21:52:25 -0800")
            .with("From", "Fred <fred@example.com>")
            .with("Subject", "afternoon meeting")
            .with("To", "mooch@owatagu.example.net")
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    fn text(dump: &HeaderDump) -> &str {
        std::str::from_utf8(dump.data().unwrap()).unwrap()
    }

    #[test]
    fn test_include() {
        let wanted = names(&["from", "SUBJECT"]);
        let dump = dump_header_fields(&header(), FieldFilter::Include(&wanted), None).unwrap();
        assert_eq!(
            text(&dump),
            "From: Fred <fred@example.com>\r\nSubject: afternoon meeting\r\n\r\n"
        );
    }

    #[test]
    fn test_exclude() {
        let unwanted = names(&["date", "from", "to"]);
        let dump = dump_header_fields(&header(), FieldFilter::Exclude(&unwanted), None).unwrap();
        assert_eq!(text(&dump), "Subject: afternoon meeting\r\n\r\n");
    }

    #[test]
    fn test_no_match_is_blank_line() {
        let wanted = names(&["X-Missing"]);
        let dump = dump_header_fields(&header(), FieldFilter::Include(&wanted), None).unwrap();
        assert_eq!(text(&dump), "\r\n");
    }

    #[test]
    fn test_empty_header_is_nil() {
        let dump = dump_header_fields(&Headers::new(), FieldFilter::All, None).unwrap();
        assert_eq!(dump, HeaderDump::Nil);
        let mut buf = Vec::new();
        dump.write_literal(&mut buf, true);
        assert_eq!(buf, b"NIL");
    }

    #[test]
    fn test_window_inside() {
        let wanted = names(&["Subject"]);
        let dump = dump_header_fields(
            &header(),
            FieldFilter::Include(&wanted),
            Some(ByteWindow::new(9, 9)),
        )
        .unwrap();
        assert_eq!(text(&dump), "afternoon");
        let HeaderDump::Window(window) = &dump else {
            panic!("expected window");
        };
        assert_eq!(window.offset, 9);
        assert_eq!(window.total_size, 30);
    }

    #[test]
    fn test_window_clamped_count() {
        let wanted = names(&["Subject"]);
        let dump = dump_header_fields(
            &header(),
            FieldFilter::Include(&wanted),
            Some(ByteWindow::new(19, 1000)),
        )
        .unwrap();
        assert_eq!(text(&dump), "meeting\r\n\r\n");
    }

    #[test]
    fn test_window_past_end() {
        let wanted = names(&["Subject"]);
        let dump = dump_header_fields(
            &header(),
            FieldFilter::Include(&wanted),
            Some(ByteWindow::new(500, 10)),
        )
        .unwrap();
        let HeaderDump::Window(window) = &dump else {
            panic!("expected window");
        };
        assert_eq!(window.offset, 30);
        assert!(window.data.is_empty());

        let mut buf = Vec::new();
        dump.write_literal(&mut buf, true);
        assert_eq!(buf, b"<30> {0}\r\n");
    }

    #[test]
    fn test_clamp() {
        assert_eq!(ByteWindow::new(0, 10).clamp(5), (0, 5));
        assert_eq!(ByteWindow::new(5, 10).clamp(5), (5, 0));
        assert_eq!(ByteWindow::new(2, 2).clamp(5), (2, 2));
        assert_eq!(ByteWindow::new(u64::MAX, u64::MAX).clamp(5), (5, 0));
    }

    #[test]
    fn test_mime_header_dump() {
        let part = MimeNode::part(
            Headers::new()
                .with("Content-Type", "text/plain")
                .with("Content-Transfer-Encoding", "7bit"),
            3,
            1,
        );
        let dump = dump_mime_header(&part, None).unwrap();
        assert_eq!(
            text(&dump),
            "Content-Type: text/plain\r\nContent-Transfer-Encoding: 7bit\r\n\r\n"
        );

        let message = MimeNode::message(header(), 3, 1);
        assert_eq!(dump_mime_header(&message, None).unwrap(), HeaderDump::Nil);
    }
}

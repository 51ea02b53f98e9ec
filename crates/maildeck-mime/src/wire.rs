//! IMAP wire syntax primitives shared by the renderers.

/// The IMAP `nil` atom.
pub const NIL: &[u8] = b"NIL";

/// Writes `s` as an IMAP quoted string, escaping `"` and `\`.
///
/// Values containing CR or LF cannot be quoted and are written as a
/// synchronizing literal instead.
pub fn write_string(buf: &mut Vec<u8>, s: &str) {
    if s.bytes().any(|b| b == b'\r' || b == b'\n') {
        buf.extend_from_slice(format!("{{{}}}\r\n", s.len()).as_bytes());
        buf.extend_from_slice(s.as_bytes());
        return;
    }

    buf.push(b'"');
    for b in s.bytes() {
        if b == b'"' || b == b'\\' {
            buf.push(b'\\');
        }
        buf.push(b);
    }
    buf.push(b'"');
}

/// Writes `Some(s)` as a string and `None` as `NIL`.
pub fn write_nstring(buf: &mut Vec<u8>, s: Option<&str>) {
    match s {
        Some(s) => write_string(buf, s),
        None => buf.extend_from_slice(NIL),
    }
}

/// Writes a number.
pub fn write_number(buf: &mut Vec<u8>, n: u64) {
    buf.extend_from_slice(n.to_string().as_bytes());
}

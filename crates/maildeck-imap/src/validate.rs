//! Character-class checks for client-supplied names.
//!
//! The classes are 256-entry tables built at compile time.

use crate::config::Limits;

/// Builds a table with every byte in `lo..=hi` allowed, except `excluded`.
const fn class(lo: u8, hi: u8, excluded: &[u8]) -> [bool; 256] {
    let mut table = [false; 256];
    let mut b = lo as usize;
    while b <= hi as usize {
        table[b] = true;
        b += 1;
    }
    let mut i = 0;
    while i < excluded.len() {
        table[excluded[i] as usize] = false;
        i += 1;
    }
    table
}

/// `tag`: any ASTRING-CHAR except `+`.
static TAG_CHARS: [bool; 256] = class(0x21, 0x7E, b"(){%*\"\\+");

/// Command text: printable ASCII, space and tab.
static COMMAND_CHARS: [bool; 256] = {
    let mut table = class(0x20, 0x7E, b"");
    table[b'\t' as usize] = true;
    table
};

/// Mailbox names: printable ASCII without wildcards, quotes or backslash.
static MAILBOX_CHARS: [bool; 256] = class(0x20, 0x7E, b"%*\"\\");

fn all_in(s: &str, table: &[bool; 256]) -> bool {
    s.bytes().all(|b| table[usize::from(b)])
}

/// Returns true if `tag` is a valid command tag.
#[must_use]
pub fn is_valid_tag(tag: &str) -> bool {
    !tag.is_empty() && all_in(tag, &TAG_CHARS)
}

/// Returns true if `text` contains only characters allowed in command
/// text. Empty text is valid.
#[must_use]
pub fn is_valid_command_text(text: &str) -> bool {
    all_in(text, &COMMAND_CHARS)
}

/// Returns true if `name` is an acceptable mailbox name.
///
/// Rejects empty names, names of `max_mailbox_name_len` bytes or more,
/// disallowed characters, `//`, and the bare name `/`.
#[must_use]
pub fn is_valid_mailbox_name(name: &str, limits: &Limits) -> bool {
    if name.is_empty() || name.len() >= limits.max_mailbox_name_len {
        return false;
    }
    if name == "/" || name.contains("//") {
        return false;
    }
    all_in(name, &MAILBOX_CHARS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags() {
        assert!(is_valid_tag("A001"));
        assert!(is_valid_tag("a.b-c]"));
        assert!(!is_valid_tag(""));
        assert!(!is_valid_tag("A 1"));
        assert!(!is_valid_tag("A+1"));
        assert!(!is_valid_tag("A*"));
        assert!(!is_valid_tag("(A)"));
        assert!(!is_valid_tag("tag\r"));
        assert!(!is_valid_tag("tägg"));
    }

    #[test]
    fn test_command_text() {
        assert!(is_valid_command_text("FETCH 1:4 (FLAGS BODY[HEADER])"));
        assert!(is_valid_command_text("a\tb"));
        assert!(is_valid_command_text(""));
        assert!(!is_valid_command_text("FETCH\r\n"));
        assert!(!is_valid_command_text("nul\0"));
        assert!(!is_valid_command_text("\x7f"));
    }

    #[test]
    fn test_mailbox_names() {
        let limits = Limits::default();
        assert!(is_valid_mailbox_name("INBOX", &limits));
        assert!(is_valid_mailbox_name("Archive/2024 Q1", &limits));
        assert!(is_valid_mailbox_name("&AMQ-rger", &limits));
        assert!(!is_valid_mailbox_name("", &limits));
        assert!(!is_valid_mailbox_name("/", &limits));
        assert!(!is_valid_mailbox_name("a//b", &limits));
        assert!(!is_valid_mailbox_name("a*", &limits));
        assert!(!is_valid_mailbox_name("a%b", &limits));
        assert!(!is_valid_mailbox_name("\"q\"", &limits));
        assert!(!is_valid_mailbox_name("a\\b", &limits));
        assert!(!is_valid_mailbox_name("tab\there", &limits));
    }

    #[test]
    fn test_mailbox_name_length_bound() {
        let limits = Limits::builder().max_mailbox_name_len(5).build();
        assert!(is_valid_mailbox_name("abcd", &limits));
        assert!(!is_valid_mailbox_name("abcde", &limits));
    }
}

//! Header field lists.

use std::fmt;

/// A single header field as stored by the message store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderField {
    /// Field name, with its original capitalisation.
    pub name: String,
    /// Unfolded field value.
    pub value: String,
}

impl HeaderField {
    /// Creates a new header field.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Returns true if the field name matches `name`, ignoring ASCII case.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// Ordered collection of header fields.
///
/// Field order is preserved exactly as supplied; lookups compare names
/// case-insensitively and return the first match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    fields: Vec<HeaderField>,
}

impl Headers {
    /// Creates a new empty header collection.
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Appends a header field.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push(HeaderField::new(name, value));
    }

    /// Appends a header field, builder style.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.add(name, value);
        self
    }

    /// Gets the first value for a header.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.is(name))
            .map(|field| field.value.as_str())
    }

    /// Gets the first value for a header, treating an empty value as absent.
    #[must_use]
    pub fn get_non_empty(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|value| !value.is_empty())
    }

    /// Gets all values for a header.
    #[must_use]
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|field| field.is(name))
            .map(|field| field.value.as_str())
            .collect()
    }

    /// Returns an iterator over all fields in order.
    pub fn iter(&self) -> impl Iterator<Item = &HeaderField> {
        self.fields.iter()
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if there are no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Parses headers from raw text.
    ///
    /// Continuation lines (starting with space or tab) are unfolded into the
    /// preceding field. Parsing stops at the first empty line. Lines without
    /// a colon are ignored.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut headers = Self::new();
        let mut current: Option<HeaderField> = None;

        for line in text.lines() {
            if line.is_empty() {
                break;
            }

            if line.starts_with(' ') || line.starts_with('\t') {
                if let Some(field) = current.as_mut() {
                    field.value.push(' ');
                    field.value.push_str(line.trim());
                }
                continue;
            }

            if let Some(field) = current.take() {
                headers.fields.push(field);
            }

            if let Some((name, value)) = line.split_once(':') {
                current = Some(HeaderField::new(name.trim(), value.trim()));
            }
        }

        if let Some(field) = current {
            headers.fields.push(field);
        }

        headers
    }
}

impl FromIterator<HeaderField> for Headers {
    fn from_iter<I: IntoIterator<Item = HeaderField>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Headers {
    type Item = &'a HeaderField;
    type IntoIter = std::slice::Iter<'a, HeaderField>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl fmt::Display for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for field in &self.fields {
            write!(f, "{}: {}\r\n", field.name, field.value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_ignores_case() {
        let mut headers = Headers::new();
        headers.add("Content-Transfer-Encoding", "quoted-printable");
        assert_eq!(headers.get("content-transfer-encoding"), Some("quoted-printable"));
        assert_eq!(headers.get("CONTENT-TRANSFER-ENCODING"), Some("quoted-printable"));
        assert_eq!(headers.get("Content-ID"), None);
    }

    #[test]
    fn test_first_match_wins() {
        let headers = Headers::new()
            .with("Received", "from mx1")
            .with("received", "from mx2");
        assert_eq!(headers.get("RECEIVED"), Some("from mx1"));
        assert_eq!(headers.get_all("Received"), vec!["from mx1", "from mx2"]);
    }

    #[test]
    fn test_get_non_empty() {
        let headers = Headers::new().with("Content-Language", "");
        assert_eq!(headers.get("Content-Language"), Some(""));
        assert_eq!(headers.get_non_empty("Content-Language"), None);
    }

    #[test]
    fn test_order_preserved() {
        let headers: Headers = [
            HeaderField::new("Cc", "ops@example.org"),
            HeaderField::new("Message-ID", "<1@example.org>"),
            HeaderField::new("Bcc", "audit@example.org"),
        ]
        .into_iter()
        .collect();
        let names: Vec<_> = headers.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["Cc", "Message-ID", "Bcc"]);
    }

    #[test]
    fn test_parse_unfolds_and_stops_at_body() {
        let text = concat!(
            "Return-Path: <bounce@lists.example.org>\r\n",
            "List-Id: Release announcements\r\n",
            "\t<announce.lists.example.org>\r\n",
            "garbage line\r\n",
            "Content-Disposition: inline\r\n",
            "\r\n",
            "X-In-Body: ignored\r\n"
        );

        let headers = Headers::parse(text);
        assert_eq!(headers.len(), 3);
        assert_eq!(
            headers.get("List-Id"),
            Some("Release announcements <announce.lists.example.org>")
        );
        assert_eq!(headers.get("content-disposition"), Some("inline"));
        assert_eq!(headers.get("X-In-Body"), None);
    }

    #[test]
    fn test_display_uses_crlf() {
        let headers = Headers::new()
            .with("MIME-Version", "1.0")
            .with("Content-Type", "text/html");
        assert_eq!(
            headers.to_string(),
            "MIME-Version: 1.0\r\nContent-Type: text/html\r\n"
        );
    }
}

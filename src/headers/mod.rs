//! HTTP header fields.
use bytes::{Buf, BytesMut};

use crate::common::{CRLF, ParseResult, find_crlf};
use crate::matches;

mod error;

#[cfg(test)]
mod test;

pub use error::HeaderError;

/// HTTP header fields.
///
/// An ordered association list from lowercase field name to value. Names are
/// unique case-insensitively: setting a name that is already present merges
/// the values as `"old, new"` instead of overwriting. Insertion order is
/// preserved, and serialization emits fields in that order.
#[derive(Clone, Default)]
pub struct Headers {
    fields: Vec<(String, String)>,
}

impl Headers {
    /// Create new empty [`Headers`].
    ///
    /// This function does not allocate.
    #[inline]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// The default header set for a response of known length.
    ///
    /// `Content-Length: <len>`, `Connection: close`, `Content-Type: text/plain`.
    /// Callers override entries with [`replace`][Headers::replace] as needed.
    pub fn default_response(content_len: u64) -> Self {
        let mut headers = Self::new();
        let mut buf = itoa::Buffer::new();
        headers.set("Content-Length", buf.format(content_len));
        headers.set("Connection", "close");
        headers.set("Content-Type", "text/plain");
        headers
    }

    /// Returns the number of fields.
    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if there are no fields.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns an iterator over fields as name and value pair, in insertion
    /// order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        self.fields
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }
}

// ===== Lookup =====

impl Headers {
    /// Returns the value for given field name, matched case-insensitively.
    ///
    /// A field set more than once yields its merged `"old, new"` value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns `true` if a field with given name is present.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns the declared `Content-Length` as a non-negative integer.
    ///
    /// Returns 0 when the field is absent or its value does not parse; an
    /// explicit `Content-Length: 0` is indistinguishable from no declaration.
    pub fn content_length(&self) -> u64 {
        match self.get("content-length") {
            Some(value) => value.parse().unwrap_or(0),
            None => 0,
        }
    }
}

// ===== Mutation =====

impl Headers {
    /// Insert a field, merging with an existing one.
    ///
    /// The name is lowercased. If it is already present the new value is
    /// appended to the existing one as `"old, new"`.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        match self.field_mut(name) {
            Some(existing) => {
                existing.push_str(", ");
                existing.push_str(&value.into());
            }
            None => self.fields.push((name.to_ascii_lowercase(), value.into())),
        }
    }

    /// Insert a field, overwriting an existing one.
    pub fn replace(&mut self, name: &str, value: impl Into<String>) {
        match self.field_mut(name) {
            Some(existing) => *existing = value.into(),
            None => self.fields.push((name.to_ascii_lowercase(), value.into())),
        }
    }

    /// Remove a field, matched case-insensitively. No-op if absent.
    pub fn delete(&mut self, name: &str) {
        self.fields.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
    }
}

// ===== Parsing =====

impl Headers {
    /// Parse header field lines from the front of `bytes`.
    ///
    /// Complete `name: value` lines are consumed from `bytes` in place and
    /// stored via [`set`][Headers::set]. An empty line marks the end of the
    /// header block: its CRLF is consumed and `Ok(())` is returned. When the
    /// remainder of `bytes` holds no further CRLF the result is `Pending`,
    /// with every complete line already consumed; the caller buffers more
    /// input and calls again.
    ///
    /// A malformed line is a hard error: the field name must be `1*tchar`,
    /// and value bytes must follow the colon and any leading spaces.
    pub fn parse_chunk(&mut self, bytes: &mut BytesMut) -> ParseResult<(), HeaderError> {
        loop {
            let Some(line_len) = find_crlf(bytes) else {
                return ParseResult::Pending;
            };

            if line_len == 0 {
                bytes.advance(CRLF.len());
                return ParseResult::Ok(());
            }

            let line = bytes.split_to(line_len);
            bytes.advance(CRLF.len());

            if let Err(err) = self.parse_field(&line) {
                return ParseResult::Err(err);
            }
        }
    }

    fn parse_field(&mut self, line: &[u8]) -> Result<(), HeaderError> {
        let Some(colon) = line.iter().position(|&b| b == b':') else {
            return Err(HeaderError::MissingColon);
        };

        let name = &line[..colon];
        if !matches::is_token_str(name) {
            return Err(HeaderError::InvalidName);
        }

        let mut value = &line[colon + 1..];
        while let [b' ', rest @ ..] = value {
            value = rest;
        }
        if value.is_empty() {
            return Err(HeaderError::MissingValue);
        }
        while let [rest @ .., b' '] = value {
            value = rest;
        }

        // SAFETY: token bytes are a subset of ASCII
        let name = unsafe { str::from_utf8_unchecked(name) };
        self.set(name, String::from_utf8_lossy(value).into_owned());

        Ok(())
    }
}

impl std::fmt::Debug for Headers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

use std::fmt;

use crate::headers::HeaderError;

/// Error of parsing an HTTP/1.1 request.
///
/// Fatal for its connection: the caller stops feeding the parser, answers
/// `400 Bad Request` when nothing has been written yet, and closes the
/// stream. [`is_unsupported`][ProtocolError::is_unsupported] distinguishes a
/// message the peer framed legally but this parser does not implement from a
/// wire violation.
#[derive(Debug)]
pub struct ProtocolError {
    kind: ProtocolErrorKind,
}

#[derive(Debug)]
pub enum ProtocolErrorKind {
    /// The request line is missing one of its two space separators.
    MalformedRequestLine,
    /// The request method is not a token.
    InvalidMethod,
    /// The version suffix after `/` is not `1.1`.
    UnsupportedVersion,
    /// A header field line is malformed.
    Header(HeaderError),
    /// The request declares `Transfer-Encoding`. Chunked request bodies are
    /// declined rather than misread as a Content-Length body.
    UnsupportedTransferCoding,
    /// The request head outgrew the read buffer cap before a single unit
    /// could be consumed.
    RequestTooLarge,
}

use ProtocolErrorKind as Kind;

impl ProtocolError {
    /// Returns what went wrong.
    #[inline]
    pub const fn kind(&self) -> &ProtocolErrorKind {
        &self.kind
    }

    /// Returns `true` for a message that is legal on the wire but names a
    /// feature this parser does not implement, as opposed to a violation.
    #[inline]
    pub const fn is_unsupported(&self) -> bool {
        matches!(self.kind, Kind::UnsupportedTransferCoding)
    }
}

impl From<Kind> for ProtocolError {
    fn from(kind: Kind) -> Self {
        Self { kind }
    }
}

impl From<HeaderError> for ProtocolError {
    fn from(err: HeaderError) -> Self {
        Self {
            kind: Kind::Header(err),
        }
    }
}

impl std::error::Error for ProtocolError { }

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}

impl fmt::Display for ProtocolErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::MalformedRequestLine => f.write_str("malformed request line"),
            Kind::InvalidMethod => f.write_str("invalid method"),
            Kind::UnsupportedVersion => f.write_str("http version is not supported"),
            Kind::Header(err) => write!(f, "header error: {err}"),
            Kind::UnsupportedTransferCoding => {
                f.write_str("transfer codings on a request are not supported")
            }
            Kind::RequestTooLarge => f.write_str("request head is too large"),
        }
    }
}

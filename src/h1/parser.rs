use bytes::{Buf, BytesMut};

use super::error::{ProtocolError, ProtocolErrorKind};
use crate::common::{CRLF, ParseResult, find_crlf};
use crate::matches;

macro_rules! err {
    ($variant:ident) => {
        ParseResult::Err(ProtocolError::from(ProtocolErrorKind::$variant))
    };
}

/// An HTTP/1.1 request line.
///
/// Constructed atomically by [`parse_reqline_chunk`] once its line is fully
/// buffered; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    method: String,
    target: String,
    http_version: String,
}

impl RequestLine {
    /// The request method, e.g: `GET`.
    #[inline]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The request target as sent, path and query left opaque.
    #[inline]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// The HTTP version. Always `1.1` after a successful parse.
    #[inline]
    pub fn http_version(&self) -> &str {
        &self.http_version
    }
}

/// Parse a request line from the front of `bytes`.
///
/// Returns `Pending` until the buffer holds the line's CRLF. Once it does,
/// the line is parsed as a unit: `method SP target SP version`, split on the
/// first two spaces. A missing separator, a non-token method, or a version
/// whose suffix after `/` is not exactly `1.1` is a hard error — at that
/// point the full line was seen, so it is a violation, not a partial read.
///
/// This function performs a chunked parsing, see [module level documentation]
/// for more details.
///
/// [module level documentation]: crate::h1
pub fn parse_reqline_chunk(bytes: &mut BytesMut) -> ParseResult<RequestLine, ProtocolError> {
    let Some(line_len) = find_crlf(bytes) else {
        return ParseResult::Pending;
    };

    let line = bytes.split_to(line_len);
    bytes.advance(CRLF.len());

    let Some(method_end) = line.iter().position(|&b| b == b' ') else {
        return err!(MalformedRequestLine);
    };
    let method = &line[..method_end];
    let rest = &line[method_end + 1..];

    let Some(target_end) = rest.iter().position(|&b| b == b' ') else {
        return err!(MalformedRequestLine);
    };
    let target = &rest[..target_end];
    let version = &rest[target_end + 1..];

    if !matches::is_token_str(method) {
        return err!(InvalidMethod);
    }

    let suffix = match version.iter().position(|&b| b == b'/') {
        Some(slash) => &version[slash + 1..],
        None => version,
    };
    if suffix != b"1.1" {
        return err!(UnsupportedVersion);
    }

    // SAFETY: token bytes are a subset of ASCII
    let method = unsafe { str::from_utf8_unchecked(method) }.to_owned();

    ParseResult::Ok(RequestLine {
        method,
        target: String::from_utf8_lossy(target).into_owned(),
        http_version: "1.1".to_owned(),
    })
}

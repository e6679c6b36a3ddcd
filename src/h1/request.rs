use bytes::{Buf, BytesMut};

use super::error::{ProtocolError, ProtocolErrorKind};
use super::parser::{RequestLine, parse_reqline_chunk};
use crate::common::ParseResult;
use crate::headers::Headers;

/// Request parser state.
///
/// Transitions only move forward: `Start → Headers → Body → Done`, with
/// `Body` skipped when no body is declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Waiting for the request line.
    Start,
    /// Reading header field lines.
    Headers,
    /// Accumulating a `Content-Length` delimited body.
    Body,
    /// The message is complete and frozen; the parser is inert.
    Done,
}

/// An HTTP/1.1 request, parsed incrementally.
///
/// Created empty at connection start and mutated exclusively through
/// [`parse_chunk`][Request::parse_chunk] until it reaches [`State::Done`],
/// after which it is handed to application code read-only.
#[derive(Debug)]
pub struct Request {
    line: Option<RequestLine>,
    headers: Headers,
    body: BytesMut,
    /// Declared body length, fixed once on `Body` entry.
    content_length: u64,
    state: State,
}

impl Request {
    /// Create new empty [`Request`] in the [`Start`][State::Start] state.
    pub fn new() -> Self {
        Self {
            line: None,
            headers: Headers::new(),
            body: BytesMut::new(),
            content_length: 0,
            state: State::Start,
        }
    }

    /// Current parser state.
    #[inline]
    pub fn state(&self) -> State {
        self.state
    }

    /// Returns `true` once the full message has been read.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.state == State::Done
    }

    /// The request line. `None` until the start line has been parsed.
    #[inline]
    pub fn request_line(&self) -> Option<&RequestLine> {
        self.line.as_ref()
    }

    /// The header fields parsed so far.
    #[inline]
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// The body bytes accumulated so far.
    #[inline]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Feed a buffer to the parser.
    ///
    /// Consumes as many leading bytes as form complete units and advances the
    /// state machine. Unconsumed bytes stay in `bytes` for the next call —
    /// the buffer is never assumed to contain a whole message. Returns `Ok`
    /// both on progress and on "need more input"; an `Err` is a protocol
    /// violation that is fatal for the whole connection.
    pub fn parse_chunk(&mut self, bytes: &mut BytesMut) -> Result<(), ProtocolError> {
        loop {
            match self.state {
                State::Start => match parse_reqline_chunk(bytes) {
                    ParseResult::Ok(line) => {
                        self.line = Some(line);
                        self.state = State::Headers;
                    }
                    ParseResult::Pending => return Ok(()),
                    ParseResult::Err(err) => return Err(err),
                },
                State::Headers => match self.headers.parse_chunk(bytes) {
                    ParseResult::Ok(()) => {
                        if self.headers.contains("transfer-encoding") {
                            return Err(ProtocolErrorKind::UnsupportedTransferCoding.into());
                        }
                        self.content_length = self.headers.content_length();
                        self.state = if self.content_length == 0 {
                            State::Done
                        } else {
                            State::Body
                        };
                    }
                    ParseResult::Pending => return Ok(()),
                    ParseResult::Err(err) => return Err(err.into()),
                },
                State::Body => {
                    // zero is unreachable: `Headers` only transitions here on
                    // a non-zero declared length
                    debug_assert!(self.content_length > 0);

                    if bytes.is_empty() {
                        return Ok(());
                    }

                    let needed = self.content_length - self.body.len() as u64;
                    let take = u64::min(bytes.len() as u64, needed) as usize;

                    self.body.extend_from_slice(&bytes[..take]);
                    bytes.advance(take);

                    if self.body.len() as u64 == self.content_length {
                        self.state = State::Done;
                    } else {
                        return Ok(());
                    }
                }
                State::Done => return Ok(()),
            }
        }
    }
}

impl Default for Request {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

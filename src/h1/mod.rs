//! HTTP/1.1 request parsing.
//!
//! [`Request::parse_chunk`] works on chunked bytes: given any length of
//! bytes, it consumes as much of the front as forms complete units and
//! advances its state machine. Bytes that end mid-unit stay in the buffer,
//! and the caller retries once more input has been read. Needing more input
//! is never an error; a wire violation always is.
mod error;
mod parser;
mod request;


pub use error::{ProtocolError, ProtocolErrorKind};
pub use parser::{RequestLine, parse_reqline_chunk};
pub use request::{Request, State};

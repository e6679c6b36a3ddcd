//! HTTP/1.1 response serialization.
//!
//! [`ResponseWriter`] serializes the status line, header block, and raw body
//! onto a stream. [`begin_chunked`][ResponseWriter::begin_chunked] switches
//! the message to chunked transfer framing and returns a [`ChunkedWriter`];
//! from that point the message can only be finished as a chunked body with
//! its trailer block, never mixed back into `Content-Length` framing.
use std::future::poll_fn;
use std::io;
use std::pin::pin;

use bytes::{BufMut, BytesMut};
use futures_core::Stream;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::headers::Headers;
use crate::http::StatusCode;

#[cfg(test)]
mod test;

/// Writer half of one HTTP/1.1 response message.
#[derive(Debug)]
pub struct ResponseWriter<IO> {
    io: IO,
}

impl<IO> ResponseWriter<IO> {
    /// Create a writer over an output stream.
    #[inline]
    pub fn new(io: IO) -> Self {
        Self { io }
    }

    /// Returns the underlying stream.
    #[inline]
    pub fn into_inner(self) -> IO {
        self.io
    }
}

impl<IO> ResponseWriter<IO>
where
    IO: AsyncWrite + Unpin,
{
    /// Serialize the status line, `"HTTP/1.1 <code> <reason>\r\n"`.
    pub async fn write_status_line(&mut self, status: StatusCode) -> io::Result<()> {
        let mut buf = BytesMut::with_capacity(64);
        buf.put_slice(b"HTTP/1.1 ");
        buf.put_slice(status.as_str().as_bytes());
        buf.put_slice(b"\r\n");
        self.io.write_all(&buf).await
    }

    /// Serialize the header block.
    ///
    /// Every field is written as `"<name>: <value>\r\n"` in insertion order,
    /// followed by an empty line. Must be called exactly once per message,
    /// after the status line and before any body bytes.
    pub async fn write_headers(&mut self, headers: &Headers) -> io::Result<()> {
        let mut buf = BytesMut::new();
        put_headers(headers, &mut buf);
        self.io.write_all(&buf).await
    }

    /// Write raw body bytes verbatim.
    ///
    /// May be called multiple times for streamed content.
    pub async fn write_body(&mut self, chunk: &[u8]) -> io::Result<()> {
        self.io.write_all(chunk).await
    }

    /// Switch the message to chunked transfer framing.
    ///
    /// `Content-Length` is removed from `headers`, `Transfer-Encoding:
    /// chunked` takes its place, and each of `trailer_names` is declared in
    /// advance through a `Trailer` field before the header block is written.
    /// The returned [`ChunkedWriter`] owns the remainder of the message and
    /// must be driven to [`finish`][ChunkedWriter::finish].
    pub async fn begin_chunked(
        mut self,
        headers: &mut Headers,
        trailer_names: &[&str],
    ) -> io::Result<ChunkedWriter<IO>> {
        headers.delete("Content-Length");
        headers.replace("Transfer-Encoding", "chunked");
        for name in trailer_names {
            headers.set("Trailer", *name);
        }
        self.write_headers(headers).await?;

        Ok(ChunkedWriter {
            io: self.io,
            declared: trailer_names.iter().map(|n| n.to_ascii_lowercase()).collect(),
        })
    }
}

// ===== ChunkedWriter =====

/// Writer of a chunked message body and its trailers.
///
/// Produced by [`ResponseWriter::begin_chunked`]. Dropping it without
/// [`finish`][ChunkedWriter::finish] leaves the message unterminated on the
/// wire; the peer sees a truncated body when the connection closes.
#[derive(Debug)]
pub struct ChunkedWriter<IO> {
    io: IO,
    /// Lowercased trailer names declared via `Trailer`.
    declared: Vec<String>,
}

impl<IO> ChunkedWriter<IO>
where
    IO: AsyncWrite + Unpin,
{
    /// Write one body chunk, framed as `"<hex-length>\r\n"`, the raw bytes,
    /// `"\r\n"`.
    ///
    /// An empty chunk is skipped: a zero length on the wire marks
    /// end-of-body, which only [`finish`][ChunkedWriter::finish] writes.
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> io::Result<()> {
        if chunk.is_empty() {
            return Ok(());
        }

        let mut buf = BytesMut::with_capacity(chunk.len() + 20);
        put_hex(chunk.len(), &mut buf);
        buf.put_slice(b"\r\n");
        buf.put_slice(chunk);
        buf.put_slice(b"\r\n");
        self.io.write_all(&buf).await
    }

    /// Relay an upstream stream of unknown total length, chunk by chunk,
    /// until it ends.
    pub async fn write_stream<S, B>(&mut self, stream: S) -> io::Result<()>
    where
        S: Stream<Item = io::Result<B>>,
        B: AsRef<[u8]>,
    {
        let mut stream = pin!(stream);
        while let Some(chunk) = poll_fn(|cx| stream.as_mut().poll_next(cx)).await {
            self.write_chunk(chunk?.as_ref()).await?;
        }
        Ok(())
    }

    /// Terminate the body with `"0\r\n"` and write the trailer block.
    ///
    /// `trailers` must carry exactly the fields that were declared through
    /// `Trailer` when chunked mode began; anything else is refused before a
    /// byte is written.
    pub async fn finish(mut self, trailers: &Headers) -> io::Result<IO> {
        if trailers.len() != self.declared.len()
            || !self.declared.iter().all(|name| trailers.contains(name))
        {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "trailer fields differ from the declared `Trailer` names",
            ));
        }

        let mut buf = BytesMut::new();
        buf.put_slice(b"0\r\n");
        put_headers(trailers, &mut buf);
        self.io.write_all(&buf).await?;
        Ok(self.io)
    }
}

// ===== Serialization =====

fn put_headers(headers: &Headers, buf: &mut BytesMut) {
    for (name, value) in headers.iter() {
        buf.put_slice(name.as_bytes());
        buf.put_slice(b": ");
        buf.put_slice(value.as_bytes());
        buf.put_slice(b"\r\n");
    }
    buf.put_slice(b"\r\n");
}

fn put_hex(len: usize, buf: &mut BytesMut) {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    const DIGITS: usize = (usize::BITS / 4) as usize;

    let mut digits = [0u8; DIGITS];
    let mut at = DIGITS;
    let mut rem = len;

    loop {
        at -= 1;
        digits[at] = HEX[rem % 16];
        rem /= 16;
        if rem == 0 {
            break;
        }
    }

    buf.put_slice(&digits[at..]);
}

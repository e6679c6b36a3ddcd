//! Listener loop and connection driver.
use std::io;
use std::pin::pin;
use std::sync::Arc;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::net::{TcpListener, TcpStream};

use crate::h1::{ProtocolError, ProtocolErrorKind, Request};
use crate::headers::Headers;
use crate::http::StatusCode;
use crate::log::{debug, warning};
use crate::response::ResponseWriter;
use crate::service::Handler;

const DEFAULT_BUFFER_CAP: usize = 1024;

/// Cap on buffered head bytes the parser cannot consume. The buffer itself
/// grows freely; a single request line or header block that exceeds this
/// without yielding a unit fails the connection.
const MAX_FIELD_CAP: usize = 64 * 1024;

/// Serve connections accepted from `listener` until `shutdown` completes.
///
/// Every accepted stream runs as its own task, exclusively owning its
/// buffer, parser, and stream; connection workers share nothing but the
/// handler. When `shutdown` completes the accept loop stops and the listener
/// is dropped; already-accepted connections finish on their own. There is no
/// per-request timeout: a stalled peer occupies its worker indefinitely.
pub async fn serve<H>(listener: TcpListener, handler: H, shutdown: impl Future<Output = ()>)
where
    H: Handler<TcpStream> + 'static,
{
    let handler = Arc::new(handler);
    let mut shutdown = pin!(shutdown);

    loop {
        let accepted = tokio::select! {
            accepted = listener.accept() => accepted,
            _ = shutdown.as_mut() => break,
        };

        match accepted {
            Ok((stream, _)) => {
                let handler = Arc::clone(&handler);
                tokio::spawn(connection(stream, handler));
            }
            Err(_err) => {
                warning!("failed to accept connection: {_err}");
            }
        }
    }
}

// ===== Connection =====

#[derive(Debug)]
enum DriveError {
    Io(io::Error),
    Protocol(ProtocolError),
}

impl From<io::Error> for DriveError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<ProtocolError> for DriveError {
    fn from(err: ProtocolError) -> Self {
        Self::Protocol(err)
    }
}

/// Drive one connection: parse the request, hand it to the handler once,
/// answer 400 on a protocol violation. No error leaves this task.
async fn connection<H>(mut stream: TcpStream, handler: Arc<H>)
where
    H: Handler<TcpStream>,
{
    match drive(&mut stream).await {
        Ok(request) => {
            handler.call(ResponseWriter::new(stream), request).await;
        }
        Err(DriveError::Protocol(_err)) => {
            warning!("protocol violation: {_err}");

            // nothing has been written yet, so the worker still owns the
            // message and can answer before closing
            let mut writer = ResponseWriter::new(stream);
            let wrote = async {
                writer.write_status_line(StatusCode::BadRequest).await?;
                writer.write_headers(&Headers::default_response(0)).await
            }
            .await;

            if let Err(_err) = wrote {
                debug!("failed to write error response: {_err}");
            }
        }
        Err(DriveError::Io(_err)) => {
            debug!("failed to serve peer: {_err}");
        }
    }
}

/// Read from `io` until the parser completes one request.
///
/// Newly read bytes are appended to a growable buffer; the parser consumes
/// from its front and whatever it leaves stays buffered for the next round.
/// A read of zero bytes before the parser finishes means the peer closed
/// mid-message, which is a transport error, never a short body.
async fn drive<IO>(io: &mut IO) -> Result<Request, DriveError>
where
    IO: AsyncRead + Unpin,
{
    let mut buffer = BytesMut::with_capacity(DEFAULT_BUFFER_CAP);
    let mut request = Request::new();

    loop {
        request.parse_chunk(&mut buffer)?;

        if request.is_done() {
            return Ok(request);
        }

        if buffer.len() > MAX_FIELD_CAP {
            return Err(ProtocolError::from(ProtocolErrorKind::RequestTooLarge).into());
        }

        buffer.reserve(DEFAULT_BUFFER_CAP);
        let read = io.read_buf(&mut buffer).await?;
        if read == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "stream ended before the message was complete",
            )
            .into());
        }
    }
}

// ===== Test =====

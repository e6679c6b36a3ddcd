use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::BytesMut;
use futures_core::Stream;

use super::ResponseWriter;
use crate::h1::Request;
use crate::headers::Headers;
use crate::http::StatusCode;

#[tokio::test]
async fn test_write_status_line() {
    macro_rules! test {
        ($status:ident, $expected:literal) => {
            let mut writer = ResponseWriter::new(Vec::new());
            writer.write_status_line(StatusCode::$status).await.unwrap();
            assert_eq!(writer.into_inner(), $expected);
        };
    }

    test!(Ok, b"HTTP/1.1 200 OK\r\n");
    test!(BadRequest, b"HTTP/1.1 400 Bad Request\r\n");
    test!(InternalServerError, b"HTTP/1.1 500 Internal Server Error\r\n");
}

#[tokio::test]
async fn test_write_headers() {
    let mut writer = ResponseWriter::new(Vec::new());
    writer
        .write_headers(&Headers::default_response(13))
        .await
        .unwrap();

    assert_eq!(
        writer.into_inner(),
        b"content-length: 13\r\nconnection: close\r\ncontent-type: text/plain\r\n\r\n",
    );
}

#[tokio::test]
async fn test_write_body() {
    let mut writer = ResponseWriter::new(Vec::new());
    writer.write_body(b"Hello ").await.unwrap();
    writer.write_body(b"World!").await.unwrap();

    assert_eq!(writer.into_inner(), b"Hello World!");
}

#[tokio::test]
async fn test_chunked() {
    let mut writer = ResponseWriter::new(Vec::new());
    writer.write_status_line(StatusCode::Ok).await.unwrap();

    let mut headers = Headers::default_response(0);
    let mut body = writer
        .begin_chunked(&mut headers, &["X-Content-SHA256", "X-Content-Length"])
        .await
        .unwrap();

    assert_eq!(headers.get("content-length"), None);
    assert_eq!(headers.get("transfer-encoding"), Some("chunked"));
    assert_eq!(
        headers.get("trailer"),
        Some("X-Content-SHA256, X-Content-Length"),
    );

    body.write_chunk(b"abcdefghijklmnopqrstuvwxyz").await.unwrap();
    body.write_chunk(b"012").await.unwrap();

    let mut trailers = Headers::new();
    trailers.set("X-Content-SHA256", "deadbeef");
    trailers.set("X-Content-Length", "29");

    let wire = body.finish(&trailers).await.unwrap();

    let expected = concat!(
        "HTTP/1.1 200 OK\r\n",
        "connection: close\r\n",
        "content-type: text/plain\r\n",
        "transfer-encoding: chunked\r\n",
        "trailer: X-Content-SHA256, X-Content-Length\r\n",
        "\r\n",
        "1a\r\nabcdefghijklmnopqrstuvwxyz\r\n",
        "3\r\n012\r\n",
        "0\r\n",
        "x-content-sha256: deadbeef\r\n",
        "x-content-length: 29\r\n",
        "\r\n",
    );
    assert_eq!(wire, expected.as_bytes());
}

#[tokio::test]
async fn test_chunked_empty_body() {
    // no chunk at all: the body on the wire is exactly "0\r\n" followed by
    // the declared trailers
    let writer = ResponseWriter::new(Vec::new());

    let mut headers = Headers::new();
    let body = writer
        .begin_chunked(&mut headers, &["X-Content-Length"])
        .await
        .unwrap();

    let mut trailers = Headers::new();
    trailers.set("X-Content-Length", "0");

    let wire = body.finish(&trailers).await.unwrap();

    let expected = concat!(
        "transfer-encoding: chunked\r\n",
        "trailer: X-Content-Length\r\n",
        "\r\n",
        "0\r\n",
        "x-content-length: 0\r\n",
        "\r\n",
    );
    assert_eq!(wire, expected.as_bytes());
}

#[tokio::test]
async fn test_chunked_rejects_undeclared_trailers() {
    let writer = ResponseWriter::new(Vec::new());
    let mut headers = Headers::new();
    let body = writer.begin_chunked(&mut headers, &["X-A"]).await.unwrap();

    let mut trailers = Headers::new();
    trailers.set("X-B", "nope");

    let err = body.finish(&trailers).await.unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidInput);

    // a superset of the declared names is refused as well
    let writer = ResponseWriter::new(Vec::new());
    let mut headers = Headers::new();
    let body = writer.begin_chunked(&mut headers, &["X-A"]).await.unwrap();

    let mut trailers = Headers::new();
    trailers.set("X-A", "yes");
    trailers.set("X-B", "nope");

    let err = body.finish(&trailers).await.unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
}

#[tokio::test]
async fn test_write_stream() {
    let writer = ResponseWriter::new(Vec::new());
    let mut headers = Headers::new();
    let mut body = writer.begin_chunked(&mut headers, &[]).await.unwrap();

    let chunks: Vec<io::Result<&'static [u8]>> = vec![Ok(b"hello"), Ok(b""), Ok(b" world")];
    body.write_stream(Chunks(chunks.into_iter())).await.unwrap();

    let wire = body.finish(&Headers::new()).await.unwrap();

    let expected = concat!(
        "transfer-encoding: chunked\r\n",
        "\r\n",
        "5\r\nhello\r\n",
        // empty upstream chunks are skipped, not written as end-of-body
        "6\r\n world\r\n",
        "0\r\n",
        "\r\n",
    );
    assert_eq!(wire, expected.as_bytes());
}

#[tokio::test]
async fn test_round_trip() {
    // serialize a response of known length, swap its status line for a
    // request line, and recover the identical header set and body through
    // the same header/body machinery
    let body = b"round trip body bytes";
    let mut headers = Headers::default_response(body.len() as u64);
    headers.replace("Content-Type", "application/octet-stream");

    let mut writer = ResponseWriter::new(Vec::new());
    writer.write_status_line(StatusCode::Ok).await.unwrap();
    writer.write_headers(&headers).await.unwrap();
    writer.write_body(body).await.unwrap();
    let wire = writer.into_inner();

    let line_end = wire.iter().position(|&b| b == b'\r').unwrap();
    let mut bytes = BytesMut::from(&b"POST /echo HTTP/1.1"[..]);
    bytes.extend_from_slice(&wire[line_end..]);

    let mut request = Request::new();
    request.parse_chunk(&mut bytes).unwrap();

    assert!(request.is_done());
    assert_eq!(request.body(), body);
    assert!(request.headers().iter().eq(headers.iter()));
}

// ===== Helpers =====

struct Chunks(std::vec::IntoIter<io::Result<&'static [u8]>>);

impl Stream for Chunks {
    type Item = io::Result<&'static [u8]>;

    fn poll_next(mut self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Poll::Ready(self.0.next())
    }
}

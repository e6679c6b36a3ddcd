use bytes::BytesMut;

use super::{HeaderError, Headers};
use crate::common::ParseResult;

macro_rules! parsed {
    ($input:expr) => {{
        let mut bytes = BytesMut::from(&$input[..]);
        let mut headers = Headers::new();
        let result = headers.parse_chunk(&mut bytes);
        (headers, bytes, result)
    }};
}

#[test]
fn test_parse_single_read() {
    let input = b"Host: localhost:42069\r\nTest:      value\r\n\r\n";
    assert_eq!(input.len(), 43);

    let (headers, bytes, result) = parsed!(input);

    assert!(result.is_ok());
    assert!(bytes.is_empty(), "all 43 bytes are consumed");
    assert_eq!(headers.get("host"), Some("localhost:42069"));
    assert_eq!(headers.get("test"), Some("value"));
    assert_eq!(headers.len(), 2);
}

#[test]
fn test_parse_partial_line() {
    let (headers, bytes, result) = parsed!(b"Host: x\r\nUser-Ag");

    assert!(result.is_pending());
    assert_eq!(headers.get("host"), Some("x"));
    assert_eq!(&bytes[..], b"User-Ag", "partial line is left for the next call");
}

#[test]
fn test_parse_malformed() {
    macro_rules! test {
        ($input:literal, $err:ident) => {
            let (_, _, result) = parsed!($input);
            match result {
                ParseResult::Err(HeaderError::$err) => {}
                other => panic!("expected `{}`, got {other:?}", stringify!($err)),
            }
        };
    }

    test!(b"H@st: localhost:42069\r\n\r\n", InvalidName);
    test!(b"       Host : localhost:42069       \r\n\r\n", InvalidName);
    test!(b": localhost\r\n\r\n", InvalidName);
    test!(b"Host localhost:42069\r\n\r\n", MissingColon);
    test!(b"Host:\r\n\r\n", MissingValue);
    test!(b"Host:      \r\n\r\n", MissingValue);
}

#[test]
fn test_parse_duplicate() {
    let (headers, _, result) = parsed!(b"Host: localhost:42069\r\nHost: localhost:42069\r\n");

    assert!(result.is_pending(), "no terminating empty line yet");
    assert_eq!(
        headers.get("host"),
        Some("localhost:42069, localhost:42069"),
    );
}

#[test]
fn test_parse_chunk_size_invariance() {
    let input = &b"Host: localhost:42069\r\nUser-Agent: curl/7.81.0\r\nAccept: */*\r\n\r\n"[..];

    let (single, ..) = parsed!(input);

    for chunk_size in 1..input.len() {
        let mut headers = Headers::new();
        let mut bytes = BytesMut::new();
        let mut complete = false;

        for chunk in input.chunks(chunk_size) {
            bytes.extend_from_slice(chunk);
            match headers.parse_chunk(&mut bytes) {
                ParseResult::Ok(()) => complete = true,
                ParseResult::Pending => {}
                ParseResult::Err(err) => panic!("unexpected `ParseResult::Err`: {err:?}"),
            }
        }

        assert!(complete, "chunk size {chunk_size} never completed");
        assert!(
            headers.iter().eq(single.iter()),
            "chunk size {chunk_size} differs from single-read parse",
        );
    }
}

#[test]
fn test_set_replace_delete() {
    let mut headers = Headers::new();

    headers.set("Content-Type", "text/plain");
    assert_eq!(headers.get("content-type"), Some("text/plain"));
    assert_eq!(headers.get("CONTENT-TYPE"), Some("text/plain"));

    headers.set("Content-Type", "text/html");
    assert_eq!(headers.get("content-type"), Some("text/plain, text/html"));

    headers.replace("Content-Type", "video/mp4");
    assert_eq!(headers.get("content-type"), Some("video/mp4"));

    headers.replace("Trailer", "X-Digest");
    assert_eq!(headers.get("trailer"), Some("X-Digest"));

    headers.delete("CONTENT-type");
    assert_eq!(headers.get("content-type"), None);

    // no-op
    headers.delete("content-type");
    assert_eq!(headers.len(), 1);
}

#[test]
fn test_insertion_order() {
    let mut headers = Headers::new();
    headers.set("B", "2");
    headers.set("a", "1");
    headers.set("C", "3");
    headers.set("B", "2");

    let order: Vec<_> = headers.iter().collect();
    assert_eq!(order, [("b", "2, 2"), ("a", "1"), ("c", "3")]);
}

#[test]
fn test_content_length() {
    let mut headers = Headers::new();
    assert_eq!(headers.content_length(), 0, "absent means no body");

    headers.set("Content-Length", "1224");
    assert_eq!(headers.content_length(), 1224);

    headers.replace("Content-Length", "0");
    assert_eq!(headers.content_length(), 0);

    headers.replace("Content-Length", "banana");
    assert_eq!(headers.content_length(), 0, "unparsable falls back to 0");

    headers.replace("Content-Length", "-20");
    assert_eq!(headers.content_length(), 0, "negative is not a length");
}

//! Body framing: fixed `Content-Length` and chunked `Transfer-Encoding`.

use bytes::{Bytes, BytesMut};
use tokio::io::AsyncRead;
use tracing::debug;

use super::{ByteStream, ParseError};
use crate::http::Headers;

/// Decides whether the message has a body and reads it off the stream.
///
/// The decision comes entirely from the finished header map:
///
/// - both framing headers present → [`ParseError::AmbiguousBodyFraming`],
///   never a silent preference for one of them;
/// - `Content-Length` → read exactly that many bytes;
/// - `Transfer-Encoding: chunked` → decode chunks until the zero-size chunk;
/// - any other `Transfer-Encoding` → unsupported;
/// - neither header → no body.
pub(crate) async fn read_body<R: AsyncRead + Unpin>(
    stream: &mut ByteStream<R>,
    headers: &Headers,
) -> Result<Option<Bytes>, ParseError> {
    let content_length = headers.get("content-length");
    let transfer_encoding = headers.get("transfer-encoding");

    if content_length.is_some() && transfer_encoding.is_some() {
        // A disagreement between the two framings is exactly what request
        // smuggling exploits.
        return Err(ParseError::AmbiguousBodyFraming);
    }

    if let Some(value) = content_length.and_then(|values| values.first()) {
        let length = parse_content_length(value)?;
        debug!(length, "reading fixed-length body");
        return Ok(Some(stream.read_exact(length).await?));
    }

    if let Some(value) = transfer_encoding.and_then(|values| values.first()) {
        let coding = value.to_ascii_lowercase();
        if coding != "chunked" {
            return Err(ParseError::UnsupportedTransferEncoding { value: coding });
        }
        return Ok(Some(read_chunked_body(stream).await?));
    }

    Ok(None)
}

/// A `Content-Length` value must be a plain run of ASCII digits — no sign, no
/// decimal point, no surprises.
fn parse_content_length(value: &str) -> Result<usize, ParseError> {
    let invalid = || ParseError::InvalidContentLength {
        value: value.to_owned(),
    };
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    value.parse().map_err(|_| invalid())
}

/// Accumulates chunks until the zero-size chunk terminates the body.
async fn read_chunked_body<R: AsyncRead + Unpin>(
    stream: &mut ByteStream<R>,
) -> Result<Bytes, ParseError> {
    let mut body = BytesMut::new();
    let mut chunks = 0usize;
    while let Some(chunk) = read_chunk(stream).await? {
        body.extend_from_slice(&chunk);
        chunks += 1;
    }
    debug!(chunks, body_len = body.len(), "chunked body complete");
    Ok(body.freeze())
}

/// Reads one `<hex-size> CRLF <data> CRLF` chunk.
///
/// Returns `None` for the zero-size chunk that terminates the body; trailer
/// headers are not supported and nothing past the zero-size line is consumed.
async fn read_chunk<R: AsyncRead + Unpin>(
    stream: &mut ByteStream<R>,
) -> Result<Option<Bytes>, ParseError> {
    let size_line = stream.read_line().await?;
    let size_hex = String::from_utf8_lossy(&size_line);
    let size = parse_chunk_size(size_hex.trim())?;
    if size == 0 {
        return Ok(None);
    }

    let data = stream.read_exact(size).await?;
    // The chunk data is framed by its own line terminator; consume it so the
    // next size line starts clean.
    stream.read_line().await?;
    Ok(Some(data))
}

fn parse_chunk_size(value: &str) -> Result<usize, ParseError> {
    let invalid = || ParseError::InvalidChunkSize {
        value: value.to_owned(),
    };
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    usize::from_str_radix(value, 16).map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn decode(headers: &[(&str, &str)], raw: &[u8]) -> Result<Option<Bytes>, ParseError> {
        let mut map = Headers::new();
        for (name, value) in headers {
            let values = if value.is_empty() {
                Vec::new()
            } else {
                vec![value.to_string()]
            };
            map.append(*name, values);
        }
        let mut stream = ByteStream::new(raw);
        read_body(&mut stream, &map).await
    }

    #[tokio::test]
    async fn no_framing_headers_means_no_body() {
        let body = decode(&[("host", "example.com")], b"ignored").await.unwrap();
        assert!(body.is_none());
    }

    #[tokio::test]
    async fn content_length_reads_exactly_n_bytes() {
        let body = decode(&[("content-length", "5")], b"helloEXTRA").await.unwrap();
        assert_eq!(body.unwrap().as_ref(), b"hello");
    }

    #[tokio::test]
    async fn content_length_zero_reads_an_empty_body() {
        let body = decode(&[("content-length", "0")], b"").await.unwrap();
        assert_eq!(body.unwrap().as_ref(), b"");
    }

    #[tokio::test]
    async fn content_length_must_be_digits_only() {
        for bad in ["abc", "-5", "5.5", "+10", "0x10", ""] {
            let headers = [("content-length", bad)];
            let err = decode(&headers, b"whatever").await;
            if bad.is_empty() {
                // An empty value list means the header contributes no framing.
                assert!(err.unwrap().is_none());
            } else {
                assert!(
                    matches!(err.unwrap_err(), ParseError::InvalidContentLength { .. }),
                    "value: {bad:?}"
                );
            }
        }
    }

    #[tokio::test]
    async fn short_stream_is_a_transport_error() {
        let err = decode(&[("content-length", "10")], b"abc").await.unwrap_err();
        assert!(matches!(err, ParseError::Io(_)));
    }

    #[tokio::test]
    async fn single_chunk_body() {
        let body = decode(&[("transfer-encoding", "chunked")], b"4\r\nWiki\r\n0\r\n")
            .await
            .unwrap();
        assert_eq!(body.unwrap().as_ref(), b"Wiki");
    }

    #[tokio::test]
    async fn multiple_chunks_are_concatenated() {
        let body = decode(
            &[("transfer-encoding", "chunked")],
            b"4\r\nWiki\r\n5\r\npedia\r\nE\r\n in\r\n\r\nchunks.\r\n0\r\n",
        )
        .await
        .unwrap();
        assert_eq!(body.unwrap().as_ref(), b"Wikipedia in\r\n\r\nchunks.");
    }

    #[tokio::test]
    async fn chunk_size_is_hexadecimal() {
        let body = decode(&[("transfer-encoding", "chunked")], b"A\r\n0123456789\r\n0\r\n")
            .await
            .unwrap();
        assert_eq!(body.unwrap().as_ref(), b"0123456789");
    }

    #[tokio::test]
    async fn chunked_encoding_is_case_insensitive() {
        let body = decode(&[("transfer-encoding", "Chunked")], b"2\r\nok\r\n0\r\n")
            .await
            .unwrap();
        assert_eq!(body.unwrap().as_ref(), b"ok");
    }

    #[tokio::test]
    async fn non_hex_chunk_size_is_rejected() {
        for raw in [&b"xyz\r\ndata\r\n0\r\n"[..], b"4;ext=1\r\nWiki\r\n0\r\n", b"-4\r\nWiki\r\n0\r\n"] {
            let err = decode(&[("transfer-encoding", "chunked")], raw).await.unwrap_err();
            assert!(matches!(err, ParseError::InvalidChunkSize { .. }), "raw: {raw:?}");
        }
    }

    #[tokio::test]
    async fn other_transfer_encodings_are_unsupported() {
        let err = decode(&[("transfer-encoding", "gzip")], b"").await.unwrap_err();
        assert!(
            matches!(err, ParseError::UnsupportedTransferEncoding { value } if value == "gzip")
        );
    }

    #[tokio::test]
    async fn both_framing_headers_are_ambiguous() {
        let err = decode(
            &[("content-length", "5"), ("transfer-encoding", "chunked")],
            b"hello",
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ParseError::AmbiguousBodyFraming));
    }

    #[tokio::test]
    async fn ambiguity_beats_emptiness() {
        // Even with empty value lists, the mere presence of both keys is
        // rejected.
        let err = decode(&[("content-length", ""), ("transfer-encoding", "")], b"")
            .await
            .unwrap_err();
        assert!(matches!(err, ParseError::AmbiguousBodyFraming));
    }

    #[tokio::test]
    async fn empty_transfer_encoding_list_means_no_body() {
        let body = decode(&[("transfer-encoding", "")], b"leftover").await.unwrap();
        assert!(body.is_none());
    }
}

//! Byte-level tokenizer over an async byte stream.
//!
//! [`ByteStream`] owns a connection's read cursor and provides the three
//! primitives the rest of the parser is built on: a relaxed line reader for
//! the request line and chunk-size lines, a strict line reader for the header
//! section, and an exact-count reader for body bytes.

use std::io;

use bytes::{Buf, Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};

use super::ParseError;

/// Initial capacity of the internal refill buffer.
const INITIAL_BUF_SIZE: usize = 4096;

/// ASCII control bytes that may never appear inside a header line.
/// CR and LF are handled separately as (potential) terminators.
fn is_forbidden_control(byte: u8) -> bool {
    matches!(
        byte,
        0x00 | 0x01 | 0x07 | 0x08 | b'\t' | 0x10 | 0x12 | 0x13 | 0x1B | 0x7F
    )
}

/// A forward-only cursor over an async byte stream.
///
/// Reads are buffered internally, but the cursor never looks ahead further
/// than the single byte needed to decide whether a `CR` begins a `CR LF`
/// terminator. Each parse owns its stream exclusively; nothing is shared, so
/// concurrent parses on separate connections need no locking.
///
/// All reads suspend the calling task until the requested bytes arrive or the
/// underlying stream ends or fails.
pub struct ByteStream<R> {
    inner: R,
    buf: BytesMut,
}

impl<R: AsyncRead + Unpin> ByteStream<R> {
    /// Wraps a reader positioned at the start of an HTTP/1.1 request.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUF_SIZE),
        }
    }

    /// Refills the internal buffer from the reader.
    /// Returns `false` if the stream is exhausted.
    async fn fill(&mut self) -> io::Result<bool> {
        debug_assert!(self.buf.is_empty());
        let n = self.inner.read_buf(&mut self.buf).await?;
        Ok(n > 0)
    }

    async fn next_byte(&mut self) -> io::Result<Option<u8>> {
        if self.buf.is_empty() && !self.fill().await? {
            return Ok(None);
        }
        Ok(Some(self.buf.get_u8()))
    }

    async fn peek_byte(&mut self) -> io::Result<Option<u8>> {
        if self.buf.is_empty() && !self.fill().await? {
            return Ok(None);
        }
        Ok(Some(self.buf[0]))
    }

    /// Returns `true` if the stream is cleanly exhausted: no buffered bytes
    /// and no more to read. Used between pipelined requests to tell a closed
    /// connection apart from a malformed one.
    pub async fn at_eof(&mut self) -> io::Result<bool> {
        if !self.buf.is_empty() {
            return Ok(false);
        }
        Ok(!self.fill().await?)
    }

    /// Reads until `LF`, `CR LF`, or end-of-stream, returning the bytes read
    /// with the terminator excluded.
    ///
    /// Line syntax is unconstrained in this mode: a lone `CR` not followed by
    /// `LF` is kept as a literal byte. Used for the request line and for
    /// chunk-size lines.
    pub async fn read_line(&mut self) -> io::Result<Vec<u8>> {
        let mut line = Vec::new();
        loop {
            match self.next_byte().await? {
                None => break,
                Some(b'\n') => break,
                Some(b'\r') => {
                    if self.peek_byte().await? == Some(b'\n') {
                        self.next_byte().await?;
                        break;
                    }
                    line.push(b'\r');
                }
                Some(byte) => line.push(byte),
            }
        }
        Ok(line)
    }

    /// Reads one line of the header section, under stricter rules than
    /// [`read_line`](Self::read_line):
    ///
    /// - forbidden control bytes anywhere in the line are an error;
    /// - a `CR` not followed by `LF` is an error, not a literal;
    /// - two colons separated by nothing but spaces are an error (the
    ///   name/value boundary would be ambiguous);
    /// - end-of-stream before a terminator means the header section was never
    ///   closed by an empty line.
    pub async fn read_header_line(&mut self) -> Result<Vec<u8>, ParseError> {
        let mut line = Vec::new();
        // Spaces do not reset the run; any other byte does.
        let mut colon_run = 0u32;
        loop {
            let Some(byte) = self.next_byte().await? else {
                return Err(ParseError::UnterminatedHeaders);
            };
            match byte {
                b if is_forbidden_control(b) => {
                    return Err(ParseError::InvalidHeaderLine {
                        reason: format!("control byte 0x{b:02X} in header line"),
                    });
                }
                b'\n' => break,
                b'\r' => {
                    if self.peek_byte().await? == Some(b'\n') {
                        self.next_byte().await?;
                        break;
                    }
                    return Err(ParseError::InvalidHeaderLine {
                        reason: "CR not followed by LF".to_owned(),
                    });
                }
                b':' => {
                    colon_run += 1;
                    if colon_run == 2 {
                        return Err(ParseError::DoubleColon);
                    }
                    line.push(byte);
                }
                b' ' => line.push(byte),
                _ => {
                    colon_run = 0;
                    line.push(byte);
                }
            }
        }
        Ok(line)
    }

    /// Reads exactly `n` bytes, suspending until they are available.
    ///
    /// The stream ending first is an [`io::ErrorKind::UnexpectedEof`] error —
    /// a body that cannot be completed is a transport failure, not a shorter
    /// body.
    pub async fn read_exact(&mut self, n: usize) -> io::Result<Bytes> {
        let mut out = BytesMut::with_capacity(n);
        while out.len() < n {
            if self.buf.is_empty() && !self.fill().await? {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("stream ended after {} of {n} body bytes", out.len()),
                ));
            }
            let take = (n - out.len()).min(self.buf.len());
            out.extend_from_slice(&self.buf.split_to(take));
        }
        Ok(out.freeze())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(raw: &[u8]) -> ByteStream<&[u8]> {
        ByteStream::new(raw)
    }

    #[tokio::test]
    async fn read_line_strips_crlf() {
        let mut s = stream(b"GET / HTTP/1.1\r\nrest");
        assert_eq!(s.read_line().await.unwrap(), b"GET / HTTP/1.1");
    }

    #[tokio::test]
    async fn read_line_strips_bare_lf() {
        let mut s = stream(b"GET / HTTP/1.1\nrest");
        assert_eq!(s.read_line().await.unwrap(), b"GET / HTTP/1.1");
    }

    #[tokio::test]
    async fn read_line_keeps_lone_cr_as_literal() {
        let mut s = stream(b"ab\rc\n");
        assert_eq!(s.read_line().await.unwrap(), b"ab\rc");
    }

    #[tokio::test]
    async fn read_line_ends_at_eof() {
        let mut s = stream(b"no terminator");
        assert_eq!(s.read_line().await.unwrap(), b"no terminator");
    }

    #[tokio::test]
    async fn header_line_accepts_crlf_and_lf() {
        let mut s = stream(b"Host: a\r\nAccept: b\n\r\n");
        assert_eq!(s.read_header_line().await.unwrap(), b"Host: a");
        assert_eq!(s.read_header_line().await.unwrap(), b"Accept: b");
        assert_eq!(s.read_header_line().await.unwrap(), b"");
    }

    #[tokio::test]
    async fn header_line_rejects_control_bytes() {
        for raw in [&b"Host: a\x07b\r\n"[..], b"Host: a\x00b\r\n", b"Bad\tName: x\r\n"] {
            let err = stream(raw).read_header_line().await.unwrap_err();
            assert!(matches!(err, ParseError::InvalidHeaderLine { .. }), "raw: {raw:?}");
        }
    }

    #[tokio::test]
    async fn header_line_rejects_lone_cr() {
        let err = stream(b"Host: a\rb\r\n").read_header_line().await.unwrap_err();
        assert!(matches!(err, ParseError::InvalidHeaderLine { .. }));
    }

    #[tokio::test]
    async fn header_line_rejects_trailing_cr_at_eof() {
        let err = stream(b"Host: example.com\r").read_header_line().await.unwrap_err();
        assert!(matches!(err, ParseError::InvalidHeaderLine { .. }));
    }

    #[tokio::test]
    async fn header_line_rejects_double_colon() {
        let err = stream(b"Host:: a\r\n").read_header_line().await.unwrap_err();
        assert!(matches!(err, ParseError::DoubleColon));
    }

    #[tokio::test]
    async fn double_colon_ignores_intervening_spaces() {
        let err = stream(b"Host: : a\r\n").read_header_line().await.unwrap_err();
        assert!(matches!(err, ParseError::DoubleColon));
    }

    #[tokio::test]
    async fn colon_run_resets_on_other_bytes() {
        let mut s = stream(b"Referer: http://a/b:8080\r\n");
        assert_eq!(s.read_header_line().await.unwrap(), b"Referer: http://a/b:8080");
    }

    #[tokio::test]
    async fn header_line_requires_a_terminator() {
        let err = stream(b"Host: example.com").read_header_line().await.unwrap_err();
        assert!(matches!(err, ParseError::UnterminatedHeaders));
    }

    #[tokio::test]
    async fn read_exact_returns_requested_count() {
        let mut s = stream(b"hello world");
        assert_eq!(s.read_exact(5).await.unwrap().as_ref(), b"hello");
        assert_eq!(s.read_exact(6).await.unwrap().as_ref(), b" world");
    }

    #[tokio::test]
    async fn read_exact_fails_on_short_stream() {
        let err = stream(b"abc").read_exact(5).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[tokio::test]
    async fn at_eof_reports_stream_state() {
        let mut s = stream(b"x");
        assert!(!s.at_eof().await.unwrap());
        s.read_exact(1).await.unwrap();
        assert!(s.at_eof().await.unwrap());
    }
}

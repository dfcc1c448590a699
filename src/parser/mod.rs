//! Strict HTTP/1.1 request parsing and framing.
//!
//! Untrusted bytes go in, a validated [`Request`] comes out — or a typed
//! [`ParseError`] the moment anything is malformed. The pipeline is strictly
//! one-directional:
//!
//! ```text
//! stream → ByteStream → { request line, header section } → body framing → Request
//! ```
//!
//! Every stage fails fast; nothing is repaired or guessed at. In particular,
//! the framing decisions that request smuggling relies on (`Content-Length` vs
//! `Transfer-Encoding`, repeated framing headers, control bytes in header
//! lines, obsolete line folding) are all hard errors.
//!
//! The entry point is [`parse_request`]; [`ByteStream`] wraps any
//! `AsyncRead + Unpin` and owns the connection's forward-only read cursor.

mod body;
mod headers;
mod request_line;
mod stream;

pub use headers::{
    COMMA_LIST_EXEMPT_HEADERS, HeaderCategory, NON_REPEATABLE_HEADERS, header_category,
};
pub use stream::ByteStream;

use thiserror::Error;
use tokio::io::AsyncRead;
use tracing::debug;

use crate::http::Request;

/// Errors that can occur while parsing an HTTP/1.1 request.
///
/// Each variant carries the offending line or value where one exists, so the
/// caller can log a useful diagnostic. The caller decides the outcome: an
/// [`Io`](Self::Io) failure means the connection is gone and must be closed;
/// everything else describes a malformed message on a live connection.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Underlying stream read failure — always fatal to the current parse.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The request line did not split into exactly method, target, and version.
    #[error("not enough information in the request line: {line:?}")]
    MalformedRequestLine { line: String },

    /// The method token is not one of the eight defined HTTP/1.1 methods.
    #[error("unknown HTTP method: {method:?}")]
    UnknownMethod { method: String },

    /// The version token is not of the form `HTTP/<decimal>`.
    #[error("malformed HTTP version: {version:?}")]
    MalformedVersion { version: String },

    /// The version parsed cleanly but is not 1.1. Distinct from
    /// [`MalformedVersion`](Self::MalformedVersion) so the caller can answer
    /// with a version-specific status instead of a generic bad-request.
    #[error("HTTP version {version} is not supported")]
    UnsupportedVersion { version: f32 },

    /// A header line contains a forbidden control byte or ends with a bare CR.
    #[error("invalid header line: {reason}")]
    InvalidHeaderLine { reason: String },

    /// Two colons, separated by nothing but spaces, appeared in one header
    /// line — the header/value boundary would be ambiguous.
    #[error("header line contains consecutive colons")]
    DoubleColon,

    /// A header line has no colon separator at all.
    #[error("header line has no colon separator: {line:?}")]
    MissingColon { line: String },

    /// A header name fails the HTTP token character class.
    #[error("invalid header name: {name:?}")]
    InvalidHeaderName { name: String },

    /// The stream ended inside the header section, before the empty line.
    #[error("headers section did not end with an empty line")]
    UnterminatedHeaders,

    /// A non-repeatable header appeared more than once in one message.
    #[error("more than one instance of header {name:?} in the message headers")]
    DuplicateHeader { name: String },

    /// Both `Content-Length` and `Transfer-Encoding` are present; the framing
    /// is ambiguous and the message is rejected outright.
    #[error("both Content-Length and Transfer-Encoding headers are present")]
    AmbiguousBodyFraming,

    /// The `Content-Length` value is not a plain non-negative integer.
    #[error("invalid Content-Length value: {value:?}")]
    InvalidContentLength { value: String },

    /// A `Transfer-Encoding` other than `chunked` was requested.
    #[error("unsupported Transfer-Encoding value: {value:?}")]
    UnsupportedTransferEncoding { value: String },

    /// A chunk-size line is not a hexadecimal integer.
    #[error("invalid chunk size: {value:?}")]
    InvalidChunkSize { value: String },
}

/// Reads and parses one HTTP/1.1 request from the stream.
///
/// The stream must be positioned at the start of a request. On success the
/// cursor is left immediately after the parsed message, so pipelined requests
/// can be parsed by calling this again on the same stream. On failure the
/// cursor position is unspecified and the error is terminal for the message:
/// no partial [`Request`] is ever returned.
///
/// # Errors
///
/// Any [`ParseError`] from a sub-stage — transport, request line, header
/// section, or body framing — aborts immediately and is returned as-is.
pub async fn parse_request<R: AsyncRead + Unpin>(
    stream: &mut ByteStream<R>,
) -> Result<Request, ParseError> {
    let line = stream.read_line().await?;
    let line = String::from_utf8_lossy(&line);
    let (method, version) = request_line::parse(&line)?;
    debug!(method = %method, "parsed request line");

    let headers = headers::parse_headers(stream).await?;
    let body = body::read_body(stream, &headers).await?;
    debug!(
        method = %method,
        header_count = headers.len(),
        body_len = body.as_ref().map_or(0, |b| b.len()),
        "request parsed"
    );

    Ok(Request::new(method, version, headers, body))
}

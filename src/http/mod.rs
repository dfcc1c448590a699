//! HTTP/1.1 protocol types.
//!
//! This module provides the core HTTP primitives:
//! [`Method`], [`Version`], [`StatusCode`], [`Headers`], [`Request`], and [`Response`].

use std::fmt;

pub mod headers;
pub mod request;
pub mod response;

pub use headers::Headers;
pub use request::Request;
pub use response::Response;

/// An HTTP response status code.
///
/// Covers the subset of codes this crate's connection layer can emit.
///
/// # Examples
///
/// ```
/// use intake::http::StatusCode;
///
/// let status = StatusCode::Ok;
/// assert_eq!(status.as_u16(), 200);
/// assert_eq!(status.canonical_reason(), "OK");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum StatusCode {
    // 2xx Success
    Ok = 200,
    NoContent = 204,

    // 4xx Client Error
    BadRequest = 400,
    NotFound = 404,
    MethodNotAllowed = 405,
    LengthRequired = 411,
    PayloadTooLarge = 413,

    // 5xx Server Error
    InternalServerError = 500,
    NotImplemented = 501,
    ServiceUnavailable = 503,
    HttpVersionNotSupported = 505,
}

impl StatusCode {
    /// Returns the numeric status code as a `u16`.
    pub fn as_u16(self) -> u16 {
        self as u16
    }

    /// Returns the canonical reason phrase for this status code.
    pub fn canonical_reason(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::NoContent => "No Content",
            Self::BadRequest => "Bad Request",
            Self::NotFound => "Not Found",
            Self::MethodNotAllowed => "Method Not Allowed",
            Self::LengthRequired => "Length Required",
            Self::PayloadTooLarge => "Payload Too Large",
            Self::InternalServerError => "Internal Server Error",
            Self::NotImplemented => "Not Implemented",
            Self::ServiceUnavailable => "Service Unavailable",
            Self::HttpVersionNotSupported => "HTTP Version Not Supported",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.canonical_reason())
    }
}

impl From<StatusCode> for u16 {
    fn from(code: StatusCode) -> u16 {
        code.as_u16()
    }
}

/// An HTTP request method.
///
/// This is a closed set: only the eight methods defined for HTTP/1.1 are
/// representable. The request parser rejects anything else as an unknown
/// method rather than smuggling it through in a catch-all variant.
///
/// # Examples
///
/// ```
/// use intake::http::Method;
///
/// let method = Method::from_token("GET").unwrap();
/// assert_eq!(method, Method::Get);
/// assert_eq!(method.as_str(), "GET");
/// assert!(method.is_safe());
/// assert!(Method::from_token("BREW").is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// OPTIONS — describe the communication options for the target resource.
    Options,
    /// GET — retrieve a representation of the target resource.
    Get,
    /// HEAD — identical to GET but without a response body.
    Head,
    /// POST — perform resource-specific processing on the request payload.
    Post,
    /// PUT — replace the target resource's current representation.
    Put,
    /// DELETE — remove the association between the target resource and its functionality.
    Delete,
    /// TRACE — perform a message loop-back test along the path to the target resource.
    Trace,
    /// CONNECT — establish a tunnel to the server identified by the target resource.
    Connect,
}

impl Method {
    /// Parses a method token, returning `None` for anything outside the
    /// defined set. Matching is case-sensitive — method tokens are.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "OPTIONS" => Some(Self::Options),
            "GET" => Some(Self::Get),
            "HEAD" => Some(Self::Head),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "DELETE" => Some(Self::Delete),
            "TRACE" => Some(Self::Trace),
            "CONNECT" => Some(Self::Connect),
            _ => None,
        }
    }

    /// Returns the method as a string slice.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Options => "OPTIONS",
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Trace => "TRACE",
            Self::Connect => "CONNECT",
        }
    }

    /// Returns `true` if this method is considered "safe" (no side effects per RFC 9110 §9.2.1).
    ///
    /// Safe methods: GET, HEAD, OPTIONS, TRACE.
    pub fn is_safe(self) -> bool {
        matches!(self, Self::Get | Self::Head | Self::Options | Self::Trace)
    }

    /// Returns `true` if this method is idempotent (RFC 9110 §9.2.2).
    ///
    /// Idempotent methods: GET, HEAD, PUT, DELETE, OPTIONS, TRACE.
    pub fn is_idempotent(self) -> bool {
        matches!(
            self,
            Self::Get | Self::Head | Self::Put | Self::Delete | Self::Options | Self::Trace
        )
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for Method {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// An HTTP protocol version, as carried on the request line.
///
/// The version is kept as the parsed decimal number so an unsupported-version
/// error can report exactly what the client sent. Only [`Version::HTTP_1_1`]
/// is accepted for further processing; the gate lives in the request-line
/// parser.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Version(f32);

impl Version {
    /// HTTP/1.1 — the only version this crate accepts.
    pub const HTTP_1_1: Version = Version(1.1);

    pub(crate) fn new(number: f32) -> Self {
        Version(number)
    }

    /// Returns the numeric version (e.g. `1.1`).
    pub fn number(self) -> f32 {
        self.0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP/{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_round_trip() {
        for token in ["OPTIONS", "GET", "HEAD", "POST", "PUT", "DELETE", "TRACE", "CONNECT"] {
            let method = Method::from_token(token).unwrap();
            assert_eq!(method.as_str(), token);
        }
    }

    #[test]
    fn unknown_methods_rejected() {
        assert!(Method::from_token("PATCH").is_none());
        assert!(Method::from_token("get").is_none());
        assert!(Method::from_token("asdfasdf").is_none());
        assert!(Method::from_token("").is_none());
    }

    #[test]
    fn method_classification() {
        assert!(Method::Get.is_safe());
        assert!(!Method::Post.is_safe());
        assert!(Method::Put.is_idempotent());
        assert!(!Method::Connect.is_idempotent());
    }

    #[test]
    fn status_code_display() {
        assert_eq!(StatusCode::Ok.to_string(), "200 OK");
        assert_eq!(StatusCode::BadRequest.to_string(), "400 Bad Request");
        assert_eq!(
            StatusCode::HttpVersionNotSupported.to_string(),
            "505 HTTP Version Not Supported"
        );
    }

    #[test]
    fn version_display() {
        assert_eq!(Version::HTTP_1_1.to_string(), "HTTP/1.1");
        assert_eq!(Version::new(2.0).to_string(), "HTTP/2");
    }
}

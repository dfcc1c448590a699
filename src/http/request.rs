//! The parsed, immutable HTTP/1.1 request value.

use bytes::Bytes;

use super::{Headers, Method, Version};

/// A fully parsed HTTP/1.1 request.
///
/// Produced exclusively by [`parse_request`](crate::parser::parse_request) once
/// every stage of validation has passed — there is no way to observe a
/// half-parsed request. The value is immutable: all accessors borrow, and the
/// caller owns it until dropped.
///
/// The request-target is carried as an opaque token and is currently always
/// `None`; URI decomposition is an unimplemented hook point in the request-line
/// parser.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    method: Method,
    target: Option<String>,
    version: Version,
    headers: Headers,
    body: Option<Bytes>,
}

impl Request {
    pub(crate) fn new(
        method: Method,
        version: Version,
        headers: Headers,
        body: Option<Bytes>,
    ) -> Self {
        Self {
            method,
            target: None,
            version,
            headers,
            body,
        }
    }

    /// Returns the HTTP method.
    pub fn method(&self) -> Method {
        self.method
    }

    /// Returns the decomposed request-target, once a URI parser exists.
    /// Currently always `None`.
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Returns the protocol version (always [`Version::HTTP_1_1`] — other
    /// versions are rejected during parsing).
    pub fn version(&self) -> Version {
        self.version
    }

    /// Returns the request headers.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Returns the request body bytes, if the message carried a body.
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Returns `true` if the connection should be kept alive after this request.
    ///
    /// HTTP/1.1 defaults to keep-alive unless the client sent
    /// `Connection: close`.
    pub fn is_keep_alive(&self) -> bool {
        match self.headers.first("connection") {
            Some(conn) => !conn.eq_ignore_ascii_case("close"),
            None => true,
        }
    }
}

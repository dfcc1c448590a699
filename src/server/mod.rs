//! Async TCP server using Tokio.
//!
//! Accepts TCP connections and feeds each connection's byte stream to the
//! request parser, dispatching parsed requests to a handler function. This is
//! the caller the parser's error contract is written for: transport errors
//! close the connection, everything else is answered with a status chosen from
//! the error kind. Supports HTTP/1.1 persistent connections (keep-alive) out
//! of the box.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, warn};

use crate::http::{Request, Response, StatusCode};
use crate::parser::{ByteStream, ParseError, parse_request};

/// Errors produced by the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to bind to {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}

/// The intake HTTP server.
///
/// Binds to a TCP address and dispatches incoming HTTP/1.1 requests to a
/// handler function.
///
/// # Examples
///
/// ```rust,no_run
/// use intake::server::Server;
/// use intake::http::{Request, Response, StatusCode};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let server = Server::bind("127.0.0.1:8080").await?;
///     server.run(|_req| async {
///         Response::new(StatusCode::Ok).body("Hello!")
///     }).await?;
///     Ok(())
/// }
/// ```
pub struct Server {
    listener: TcpListener,
    local_addr: SocketAddr,
}

impl Server {
    /// Binds the server to the given TCP address.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Bind`] if the address cannot be bound
    /// (e.g. port already in use, insufficient permissions).
    pub async fn bind(addr: impl AsRef<str>) -> Result<Self, ServerError> {
        let addr = addr.as_ref();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Bind {
                addr: addr.to_owned(),
                source: e,
            })?;
        let local_addr = listener.local_addr()?;
        Ok(Self {
            listener,
            local_addr,
        })
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Starts accepting connections and dispatching requests to `handler`.
    ///
    /// The handler receives a [`Request`] and must return a [`Future`] that
    /// resolves to a [`Response`]. The handler is wrapped in an [`Arc`] and
    /// shared across all spawned Tokio tasks, so it must be `Send + Sync + 'static`.
    ///
    /// This method runs until the process is terminated or an unrecoverable
    /// listener error occurs.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Io`] if the TCP listener itself fails.
    pub async fn run<H, F>(self, handler: H) -> Result<(), ServerError>
    where
        H: Fn(Request) -> F + Send + Sync + 'static,
        F: Future<Output = Response> + Send + 'static,
    {
        let handler = Arc::new(handler);
        info!(address = %self.local_addr, "intake listening");

        loop {
            let (stream, peer_addr) = match self.listener.accept().await {
                Ok(pair) => pair,
                Err(e) => {
                    error!(error = %e, "failed to accept connection");
                    continue;
                }
            };

            debug!(peer = %peer_addr, "connection accepted");
            let handler = Arc::clone(&handler);

            tokio::spawn(async move {
                if let Err(e) = handle_connection(stream, peer_addr, handler).await {
                    warn!(peer = %peer_addr, error = %e, "connection closed with error");
                }
            });
        }
    }
}

/// Handles a single TCP connection over its lifetime.
///
/// HTTP/1.1 connections are persistent by default: we loop, parsing one
/// request per iteration straight off the socket, until the peer closes the
/// connection, signals `Connection: close`, or sends something malformed.
async fn handle_connection<H, F>(
    mut stream: TcpStream,
    peer_addr: SocketAddr,
    handler: Arc<H>,
) -> Result<(), std::io::Error>
where
    H: Fn(Request) -> F + Send + Sync + 'static,
    F: Future<Output = Response> + Send + 'static,
{
    let (reader, mut writer) = stream.split();
    let mut reader = ByteStream::new(reader);

    loop {
        if reader.at_eof().await? {
            debug!(peer = %peer_addr, "connection closed by peer");
            break;
        }

        let request = match parse_request(&mut reader).await {
            Ok(request) => request,
            Err(ParseError::Io(e)) => {
                // The stream died mid-parse; there is no peer left to answer.
                warn!(peer = %peer_addr, error = %e, "transport failure mid-parse");
                return Err(e);
            }
            Err(e) => {
                warn!(peer = %peer_addr, error = %e, "rejecting malformed request");
                writer.write_all(&error_response(&e).into_bytes()).await?;
                writer.flush().await?;
                break;
            }
        };

        let keep_alive = request.is_keep_alive();

        debug!(
            peer = %peer_addr,
            method = %request.method(),
            "dispatching request"
        );

        let response = handler(request).await;
        writer.write_all(&response.into_bytes()).await?;
        writer.flush().await?;

        if !keep_alive {
            debug!(peer = %peer_addr, "Connection: close — shutting down");
            break;
        }
    }

    Ok(())
}

/// Maps a parse failure to the response the peer receives.
///
/// Unsupported versions get the version-specific status, unknown methods get
/// `501`, and every other malformed message is a plain `400`. All error
/// responses close the connection: after a framing error the cursor position
/// in the stream can no longer be trusted.
fn error_response(error: &ParseError) -> Response {
    let status = match error {
        ParseError::UnsupportedVersion { .. } => StatusCode::HttpVersionNotSupported,
        ParseError::UnknownMethod { .. } => StatusCode::NotImplemented,
        _ => StatusCode::BadRequest,
    };
    Response::new(status)
        .body(error.to_string())
        .keep_alive(false)
}

//! # intake
//!
//! A strict, from-scratch async HTTP/1.1 request parser and framer written in Rust.
//!
//! The core of the crate is [`parse_request`], which reads one HTTP/1.1 request
//! from an untrusted byte stream and either returns a fully validated, immutable
//! [`Request`] or fails fast with a typed [`ParseError`]. Framing is deliberately
//! strict: ambiguous body framing, control characters in header lines, obsolete
//! line folding, and duplicated non-repeatable headers are all hard errors —
//! never silently repaired.
//!
//! A thin [`Server`] is included so the parser can be exercised end to end; it
//! owns the sockets, hands each connection's stream to the parser, and maps
//! parse failures to error responses. The parser itself never writes to the
//! stream.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use intake::server::Server;
//! use intake::http::{Request, Response, StatusCode};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let server = Server::bind("127.0.0.1:8080").await?;
//!     println!("Listening on http://127.0.0.1:8080");
//!     server.run(|_req: Request| async {
//!         Response::new(StatusCode::Ok).body("Hello, World!")
//!     }).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Parsing without a server
//!
//! Anything implementing `AsyncRead` can be parsed directly, including byte
//! slices in tests:
//!
//! ```rust
//! use intake::parser::{ByteStream, parse_request};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let raw: &[u8] = b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n";
//! let mut stream = ByteStream::new(raw);
//! let request = parse_request(&mut stream).await.unwrap();
//!
//! assert_eq!(request.method().as_str(), "GET");
//! assert_eq!(request.headers().first("host"), Some("localhost"));
//! assert!(request.body().is_none());
//! # }
//! ```

pub mod http;
pub mod parser;
pub mod server;

// ── Convenience re-exports ────────────────────────────────────────────────────
pub use http::{Headers, Method, Request, Response, StatusCode, Version};
pub use parser::{ByteStream, ParseError, parse_request};
pub use server::{Server, ServerError};

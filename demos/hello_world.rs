//! Minimal intake server: greets every request.
//!
//! Run with `cargo run --example hello_world`, then try:
//!
//! ```text
//! curl -v http://127.0.0.1:8080
//! curl -v -X POST --data hello http://127.0.0.1:8080
//! ```
//!
//! The bind address can be overridden with the `INTAKE_ADDR` environment
//! variable. Set `RUST_LOG=debug` to watch the parser work.

use intake::http::{Request, Response, StatusCode};
use intake::server::Server;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let addr = std::env::var("INTAKE_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_owned());
    let server = Server::bind(&addr).await?;
    println!("Listening on http://{}", server.local_addr());

    server
        .run(|req: Request| async move {
            let host = req.headers().first("host").unwrap_or("<no host>").to_owned();
            let body_len = req.body().map_or(0, |b| b.len());
            Response::new(StatusCode::Ok).body(format!(
                "Hello from intake! Parsed a {} request for {host} ({body_len} body bytes).\n",
                req.method()
            ))
        })
        .await?;

    Ok(())
}

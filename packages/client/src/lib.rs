//! # httpcheck client
//!
//! The transport half of httpcheck: a small HTTP/1.1 client built for tests,
//! an in-process test server, and the JSON path resolver used by response
//! assertions.
//!
//! ## Features
//!
//! - **One connection per request** over tokio and hyper, no pooling
//! - **Rustls TLS** with webpki roots plus extra trusted certificates
//! - **Cookie jar** shared by every session request of a client
//! - **Request filters** that rewrite or reject requests before dialing
//! - **Test server** on a loopback port, optionally TLS with a generated CA
//! - **Websocket dialing** with tokio-tungstenite
//! - **JSON path resolution** over raw bytes, without building a JSON tree
//!
//! ## Usage
//!
//! ```no_run
//! use httpcheck_client::{HttpClient, HttpRequest, Method};
//!
//! # async fn run() -> httpcheck_client::Result<()> {
//! let client = HttpClient::new()?;
//! let request = HttpRequest::parse(Method::GET, "http://127.0.0.1:8080/status")?;
//! let response = client.execute(request).await?;
//!
//! let outcome = httpcheck_client::jsonpath::assert_contains(response.body(), "status", "ok");
//! assert!(outcome.passed, "{}", outcome.message);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(clippy::all)]

pub mod client;
pub mod config;
pub mod connect;
pub mod cookie;
pub mod error;
pub mod http;
pub mod jsonpath;
pub mod middleware;
pub mod server;
pub mod websocket;

pub mod prelude;

pub use crate::error::{Error, Result};
pub use crate::prelude::*;

//! httpcheck public API
//!
//! Blocking helpers for testing HTTP services: a [`Tester`] bound to one host,
//! a fluent [`Request`] builder for every verb, and [`Expect`] assertions over
//! responses, including dotted JSON path checks such as
//! `addresses.1.name`.
//!
//! ```no_run
//! use httpcheck::{PanicReporter, ResponseExt, Tester};
//!
//! let tester = Tester::new("127.0.0.1:8080", false)?;
//! let response = tester.request().get("/users/1")?;
//!
//! response
//!     .expect(&PanicReporter)
//!     .ok()
//!     .content_type("application/json")
//!     .contains_json("user.name", "alice");
//! # Ok::<(), httpcheck::Error>(())
//! ```

#![deny(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]

pub mod assert;
pub mod builder;
pub mod tester;
pub mod websocket;

pub use assert::{Expect, PanicReporter, Recorder, Reporter, ResponseExt};
pub use builder::{AcceptValue, ContentType, Request};
pub use tester::Tester;
pub use websocket::WebSocket;

// Re-export important types from client package
pub use httpcheck_client::jsonpath;
pub use httpcheck_client::{
    ClientStatsSnapshot, Error, FailureKind, FileSource, FilterChain, HttpConfig, HttpError,
    HttpRequest, HttpResponse, Kind, Literal, Message, Outcome, Params, RequestBody,
    RequestFilter, Result,
};

/// Response returned by every request helper.
pub type Response = HttpResponse;

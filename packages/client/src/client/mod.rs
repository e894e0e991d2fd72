//! HTTP client
//!
//! `HttpClient` owns the configuration, the TLS trust store, the cookie jar
//! and the statistics; each call to `execute` is one HTTP/1.1 exchange over a
//! freshly dialed connection.

pub mod core;
pub mod stats;

pub use self::core::{HttpClient, HttpClientBuilder};
pub use stats::{ClientStats, ClientStatsSnapshot};

//! Core HTTP configuration structure and field definitions

use std::time::Duration;

/// HTTP client configuration
///
/// Central configuration struct read by the transport for every request.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Deadline for establishing the TCP connection
    pub connect_timeout: Duration,

    /// TCP keep-alive idle time, `None` leaves the OS default
    pub tcp_keepalive: Option<Duration>,

    /// Enable TCP_NODELAY
    pub tcp_nodelay: bool,

    /// Deadline for the TLS handshake
    pub tls_handshake_timeout: Duration,

    /// Deadline for receiving the complete response
    pub response_timeout: Duration,

    /// Largest response body the client will buffer
    pub max_body_size: usize,

    /// User agent string sent unless the request sets one
    pub user_agent: String,

    /// Attach and store cookies for session requests
    pub cookie_store: bool,
}

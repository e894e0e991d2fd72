//! Builder methods for HTTP configuration

use std::time::Duration;

use super::types::HttpConfig;

impl HttpConfig {
    /// Set the TCP connect deadline
    ///
    /// # Examples
    /// ```
    /// use std::time::Duration;
    /// use httpcheck_client::config::HttpConfig;
    ///
    /// let config = HttpConfig::default().with_connect_timeout(Duration::from_secs(2));
    /// assert_eq!(config.connect_timeout, Duration::from_secs(2));
    /// ```
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the TLS handshake deadline
    #[must_use]
    pub fn with_tls_handshake_timeout(mut self, timeout: Duration) -> Self {
        self.tls_handshake_timeout = timeout;
        self
    }

    /// Set the deadline for receiving a complete response
    ///
    /// Covers writing the request, reading the head and buffering the body.
    #[must_use]
    pub fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = timeout;
        self
    }

    /// Configure TCP keep-alive and `TCP_NODELAY`
    #[must_use]
    pub fn with_tcp(mut self, nodelay: bool, keepalive: Option<Duration>) -> Self {
        self.tcp_nodelay = nodelay;
        self.tcp_keepalive = keepalive;
        self
    }

    /// Limit the size of buffered response bodies
    #[must_use]
    pub fn with_max_body_size(mut self, bytes: usize) -> Self {
        self.max_body_size = bytes;
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Enable or disable the cookie jar for session requests
    #[must_use]
    pub fn with_cookie_store(mut self, enabled: bool) -> Self {
        self.cookie_store = enabled;
        self
    }
}

//! Default implementations for HTTP configuration

use std::time::Duration;

use super::types::HttpConfig;

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            tcp_keepalive: Some(Duration::from_secs(30)),
            tcp_nodelay: true,
            tls_handshake_timeout: Duration::from_secs(5),
            response_timeout: Duration::from_secs(30),
            max_body_size: 16 * 1024 * 1024,
            user_agent: concat!("httpcheck/", env!("CARGO_PKG_VERSION")).to_string(),
            cookie_store: true,
        }
    }
}

//! TCP dialing and socket options

mod socket_config;

use tokio::net::TcpStream;

use crate::config::HttpConfig;
use crate::error::{self, Result};

pub use socket_config::configure_tcp_socket;

/// Dial `host:port` within the configured connect deadline and apply the
/// socket options of `config`.
///
/// # Errors
///
/// Returns a timeout error when the deadline elapses and a connect error when
/// the dial or socket configuration fails.
pub async fn connect_tcp(host: &str, port: u16, config: &HttpConfig) -> Result<TcpStream> {
    let stream = tokio::time::timeout(config.connect_timeout, TcpStream::connect((host, port)))
        .await
        .map_err(|_| error::timeout("connect"))?
        .map_err(error::connect)?;

    configure_tcp_socket(&stream, config.tcp_nodelay, config.tcp_keepalive)?;

    tracing::trace!(target: "httpcheck::connect", host, port, "tcp connection established");
    Ok(stream)
}

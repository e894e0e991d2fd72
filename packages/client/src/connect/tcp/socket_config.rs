//! TCP socket configuration utilities

use std::time::Duration;

use socket2::{SockRef, TcpKeepalive};
use tokio::net::TcpStream;

use crate::error::{self, Result};

/// Apply `TCP_NODELAY` and keep-alive idle time to a connected stream.
///
/// # Errors
///
/// Returns a connect error if the OS rejects either option.
pub fn configure_tcp_socket(
    stream: &TcpStream,
    nodelay: bool,
    keepalive: Option<Duration>,
) -> Result<()> {
    stream.set_nodelay(nodelay).map_err(error::connect)?;

    if let Some(idle) = keepalive {
        let params = TcpKeepalive::new().with_time(idle);
        SockRef::from(stream)
            .set_tcp_keepalive(&params)
            .map_err(error::connect)?;
    }

    Ok(())
}

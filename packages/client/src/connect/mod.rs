//! Connection establishment
//!
//! Every request dials a fresh TCP connection; `https` and `wss` URLs wrap it
//! in a rustls session. The resulting [`Conn`] is handed to hyper or to the
//! websocket handshake.

pub mod tcp;
pub mod tls;

use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;
use url::Url;

use crate::config::HttpConfig;
use crate::error::Result;

pub use tcp::{configure_tcp_socket, connect_tcp};
pub use tls::{TlsSettings, client_config, parse_pem_certificates};

/// A dialed connection, plain or TLS.
pub enum Conn {
    Plain(TcpStream),
    Tls(Box<TlsStream<TcpStream>>),
}

impl Conn {
    #[must_use]
    pub fn is_tls(&self) -> bool {
        matches!(self, Conn::Tls(_))
    }
}

impl std::fmt::Debug for Conn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Conn::Plain(s) => f.debug_tuple("Plain").field(&s.peer_addr().ok()).finish(),
            Conn::Tls(s) => f.debug_tuple("Tls").field(&s.get_ref().0.peer_addr().ok()).finish(),
        }
    }
}

impl AsyncRead for Conn {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Conn::Plain(s) => Pin::new(s).poll_read(cx, buf),
            Conn::Tls(s) => Pin::new(s.as_mut()).poll_read(cx, buf),
        }
    }
}

impl AsyncWrite for Conn {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match self.get_mut() {
            Conn::Plain(s) => Pin::new(s).poll_write(cx, buf),
            Conn::Tls(s) => Pin::new(s.as_mut()).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Conn::Plain(s) => Pin::new(s).poll_flush(cx),
            Conn::Tls(s) => Pin::new(s.as_mut()).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Conn::Plain(s) => Pin::new(s).poll_shutdown(cx),
            Conn::Tls(s) => Pin::new(s.as_mut()).poll_shutdown(cx),
        }
    }
}

/// Dials connections according to an [`HttpConfig`].
#[derive(Clone)]
pub struct Connector {
    config: HttpConfig,
    tls: Arc<rustls::ClientConfig>,
}

impl Connector {
    #[must_use]
    pub fn new(config: HttpConfig, tls: Arc<rustls::ClientConfig>) -> Self {
        Self { config, tls }
    }

    /// Open a connection to the host of `url`, with TLS for secure schemes.
    ///
    /// # Errors
    ///
    /// Connect, TLS or timeout errors, tagged with `url`.
    pub async fn connect(&self, url: &Url) -> Result<Conn> {
        let (host, port) = crate::http::dial_target(url)?;

        let stream = connect_tcp(&host, port, &self.config)
            .await
            .map_err(|e| e.with_url(url.clone()))?;

        if !crate::http::is_secure(url) {
            return Ok(Conn::Plain(stream));
        }

        let tls = tls::handshake(
            stream,
            &host,
            Arc::clone(&self.tls),
            self.config.tls_handshake_timeout,
        )
        .await
        .map_err(|e| e.with_url(url.clone()))?;

        Ok(Conn::Tls(Box::new(tls)))
    }
}

impl std::fmt::Debug for Connector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connector")
            .field("connect_timeout", &self.config.connect_timeout)
            .field("tls_handshake_timeout", &self.config.tls_handshake_timeout)
            .finish_non_exhaustive()
    }
}

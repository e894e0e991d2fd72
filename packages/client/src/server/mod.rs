//! In-process test server
//!
//! Binds `127.0.0.1:0` and serves a synchronous handler over HTTP/1.1 on a
//! dedicated thread with its own runtime, so it works the same for blocking
//! and async callers. Optional TLS uses a freshly generated CA or a caller
//! supplied PEM pair; the roots a client must trust are exposed by
//! [`TestServer::trusted_roots`].

pub mod certificate;
mod service;

use std::net::SocketAddr;
use std::sync::Arc;
use std::thread;

use bytes::Bytes;
use rustls::ServerConfig;
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio_rustls::TlsAcceptor;

use crate::error::{self, Result};
use crate::websocket::Message;
pub use certificate::{GeneratedIdentity, generate_identity, load_pem_identity};
use service::App;

/// Synchronous request handler.
pub type Handler = Arc<dyn Fn(http::Request<Bytes>) -> http::Response<Bytes> + Send + Sync>;

/// Websocket message handler; `Some` is sent back to the peer.
pub type WebSocketHandler = Arc<dyn Fn(Message) -> Option<Message> + Send + Sync>;

/// TLS mode of the test server.
#[derive(Debug, Clone, Default)]
pub enum ServerTls {
    /// Plain HTTP
    #[default]
    Disabled,
    /// Generate a CA and a localhost certificate
    Generated,
    /// Use the given PEM certificate chain and private key
    Pem { cert: Vec<u8>, key: Vec<u8> },
}

/// Builder for [`TestServer`].
pub struct TestServerBuilder {
    handler: Handler,
    websocket: Option<WebSocketHandler>,
    tls: ServerTls,
}

impl TestServerBuilder {
    #[must_use]
    pub fn tls(mut self, tls: ServerTls) -> Self {
        self.tls = tls;
        self
    }

    /// Accept websocket upgrades and answer each message with `handler`.
    #[must_use]
    pub fn websocket<F>(mut self, handler: F) -> Self
    where
        F: Fn(Message) -> Option<Message> + Send + Sync + 'static,
    {
        self.websocket = Some(Arc::new(handler));
        self
    }

    /// Bind the listener and start serving.
    ///
    /// # Errors
    ///
    /// Returns a server error if binding, TLS setup or the server thread fails.
    pub fn start(self) -> Result<TestServer> {
        let (acceptor, trusted_roots) = match &self.tls {
            ServerTls::Disabled => (None, Vec::new()),
            ServerTls::Generated => {
                let identity = generate_identity().map_err(error::server)?;
                let acceptor = tls_acceptor(identity.chain, identity.key)?;
                (Some(acceptor), vec![identity.ca])
            }
            ServerTls::Pem { cert, key } => {
                let (chain, key) =
                    load_pem_identity(cert, key).map_err(error::server)?;
                let roots = chain.clone();
                (Some(tls_acceptor(chain, key)?), roots)
            }
        };

        let listener = std::net::TcpListener::bind(("127.0.0.1", 0)).map_err(error::server)?;
        listener.set_nonblocking(true).map_err(error::server)?;
        let addr = listener.local_addr().map_err(error::server)?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(error::server)?;

        let app = Arc::new(App::new(self.handler, self.websocket));
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let secure = acceptor.is_some();

        let thread = thread::Builder::new()
            .name(format!("httpcheck-server-{}", addr.port()))
            .spawn(move || {
                runtime.block_on(async move {
                    match TcpListener::from_std(listener) {
                        Ok(listener) => serve(listener, app, acceptor, shutdown_rx).await,
                        Err(e) => tracing::error!(target: "httpcheck::server", error = %e, "listener setup failed"),
                    }
                });
            })
            .map_err(error::server)?;

        tracing::debug!(target: "httpcheck::server", %addr, tls = secure, "test server started");

        Ok(TestServer {
            addr,
            secure,
            trusted_roots,
            shutdown_tx: Some(shutdown_tx),
            thread: Some(thread),
        })
    }
}

/// A running test server; dropping it shuts the server down.
pub struct TestServer {
    addr: SocketAddr,
    secure: bool,
    trusted_roots: Vec<CertificateDer<'static>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    thread: Option<thread::JoinHandle<()>>,
}

impl TestServer {
    /// Start building a server for `handler`.
    pub fn builder<F>(handler: F) -> TestServerBuilder
    where
        F: Fn(http::Request<Bytes>) -> http::Response<Bytes> + Send + Sync + 'static,
    {
        TestServerBuilder {
            handler: Arc::new(handler),
            websocket: None,
            tls: ServerTls::Disabled,
        }
    }

    /// Plain HTTP server for `handler`.
    ///
    /// # Errors
    ///
    /// See [`TestServerBuilder::start`].
    pub fn http<F>(handler: F) -> Result<Self>
    where
        F: Fn(http::Request<Bytes>) -> http::Response<Bytes> + Send + Sync + 'static,
    {
        Self::builder(handler).start()
    }

    /// HTTPS server for `handler` with a generated certificate.
    ///
    /// # Errors
    ///
    /// See [`TestServerBuilder::start`].
    pub fn https<F>(handler: F) -> Result<Self>
    where
        F: Fn(http::Request<Bytes>) -> http::Response<Bytes> + Send + Sync + 'static,
    {
        Self::builder(handler).tls(ServerTls::Generated).start()
    }

    #[must_use]
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// `127.0.0.1:port`
    #[must_use]
    pub fn host(&self) -> String {
        self.addr.to_string()
    }

    #[must_use]
    pub fn is_tls(&self) -> bool {
        self.secure
    }

    /// Base URL, `http://127.0.0.1:port` or `https://...`.
    #[must_use]
    pub fn url(&self) -> String {
        let scheme = if self.secure { "https" } else { "http" };
        format!("{scheme}://{}", self.addr)
    }

    /// Certificates a client must trust to reach this server.
    #[must_use]
    pub fn trusted_roots(&self) -> &[CertificateDer<'static>] {
        &self.trusted_roots
    }

    /// Stop accepting connections and wait for the server thread.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(thread) = self.thread.take()
            && thread.join().is_err()
        {
            tracing::warn!(target: "httpcheck::server", addr = %self.addr, "server thread panicked");
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for TestServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestServer")
            .field("addr", &self.addr)
            .field("tls", &self.secure)
            .finish_non_exhaustive()
    }
}

fn tls_acceptor(
    chain: Vec<CertificateDer<'static>>,
    key: PrivateKeyDer<'static>,
) -> Result<TlsAcceptor> {
    let config = ServerConfig::builder_with_provider(Arc::new(
        rustls::crypto::ring::default_provider(),
    ))
    .with_safe_default_protocol_versions()
    .map_err(error::tls)?
    .with_no_client_auth()
    .with_single_cert(chain, key)
    .map_err(error::tls)?;

    Ok(TlsAcceptor::from(Arc::new(config)))
}

async fn serve(
    listener: TcpListener,
    app: Arc<App>,
    acceptor: Option<TlsAcceptor>,
    mut shutdown_rx: oneshot::Receiver<()>,
) {
    let mut tasks = tokio::task::JoinSet::new();

    loop {
        tokio::select! {
            _ = &mut shutdown_rx => break,
            accepted = listener.accept() => {
                let (stream, remote) = match accepted {
                    Ok(pair) => pair,
                    Err(e) => {
                        tracing::warn!(target: "httpcheck::server", error = %e, "accept failed");
                        continue;
                    }
                };
                let app = Arc::clone(&app);
                let acceptor = acceptor.clone();

                tasks.spawn(async move {
                    match acceptor {
                        Some(acceptor) => match acceptor.accept(stream).await {
                            Ok(tls) => service::serve_connection(tls, app, remote).await,
                            Err(e) => tracing::warn!(
                                target: "httpcheck::server",
                                %remote,
                                error = %e,
                                "tls handshake failed"
                            ),
                        },
                        None => service::serve_connection(stream, app, remote).await,
                    }
                });
            }
        }

        while tasks.try_join_next().is_some() {}
    }

    tasks.shutdown().await;
    tracing::debug!(target: "httpcheck::server", "test server stopped");
}

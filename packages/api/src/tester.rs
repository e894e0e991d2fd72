//! Per-suite test client
//!
//! A [`Tester`] is bound to one host and owns the runtime that drives the
//! async client, so every helper is a plain blocking call. It must not be
//! used from inside an async runtime.

use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;
use http::HeaderMap;
use httpcheck_client::http::{display_host, normalize_host};
use httpcheck_client::{
    ClientStatsSnapshot, FilterChain, HttpClient, HttpConfig, HttpRequest, HttpResponse, Result,
    ServerTls, TestServer, error,
};
use url::Url;

use crate::builder::Request;
use crate::websocket::WebSocket;

/// State shared by a tester and every request or websocket it creates.
pub(crate) struct Session {
    runtime: tokio::runtime::Runtime,
    client: HttpClient,
    host: String,
    https: bool,
}

impl Session {
    fn new(host: &str, https: bool, client: HttpClient) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("httpcheck-tester")
            .enable_all()
            .build()
            .map_err(error::builder)?;

        Ok(Self {
            runtime,
            client,
            host: normalize_host(host),
            https,
        })
    }

    pub(crate) fn host(&self) -> String {
        display_host(&self.host)
    }

    pub(crate) fn url(&self, path: &str) -> String {
        let scheme = if self.https { "https" } else { "http" };
        format!("{scheme}://{}{path}", self.host())
    }

    pub(crate) fn websocket_url(&self, path: &str) -> String {
        let scheme = if self.https { "wss" } else { "ws" };
        format!("{scheme}://{}{path}", self.host())
    }

    pub(crate) fn client(&self) -> &HttpClient {
        &self.client
    }

    pub(crate) fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Session request: cookies from the jar go out, `Set-Cookie` comes back in.
    pub(crate) fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        log::debug!("httpcheck: {request}");
        self.block_on(self.client.execute(request))
    }

    pub(crate) fn send_filtered(
        &self,
        request: HttpRequest,
        filters: &FilterChain,
    ) -> Result<HttpResponse> {
        log::debug!("httpcheck: {request} with {} filter(s)", filters.len());
        self.block_on(self.client.execute_filtered(request, filters))
    }
}

/// Blocking HTTP test client bound to one host.
///
/// Either point it at an existing server with [`Tester::new`], or let it run
/// an in-process server with [`Tester::serve`]; the server stops when the
/// tester is closed or dropped.
pub struct Tester {
    session: Arc<Session>,
    server: Option<TestServer>,
}

impl Tester {
    /// Tester for `host`, which may be `host:port`, `:port` or a full
    /// `http(s)://` URL whose authority is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime or the client cannot be built.
    pub fn new(host: &str, https: bool) -> Result<Self> {
        Self::with_config(host, https, HttpConfig::default())
    }

    /// Like [`Tester::new`] with a custom client configuration.
    ///
    /// # Errors
    ///
    /// Returns a builder error if `config` is invalid.
    pub fn with_config(host: &str, https: bool, config: HttpConfig) -> Result<Self> {
        let client = HttpClient::builder().config(config).build()?;
        Ok(Self {
            session: Arc::new(Session::new(host, https, client)?),
            server: None,
        })
    }

    /// Start an in-process server for `handler` on `127.0.0.1` and bind a
    /// tester to it.
    ///
    /// With `tls` a throwaway CA and server certificate are generated and the
    /// tester trusts that CA.
    ///
    /// # Errors
    ///
    /// Returns a server error if the server cannot start.
    pub fn serve<F>(handler: F, tls: bool) -> Result<Self>
    where
        F: Fn(http::Request<Bytes>) -> http::Response<Bytes> + Send + Sync + 'static,
    {
        let mode = if tls { ServerTls::Generated } else { ServerTls::Disabled };
        let server = TestServer::builder(handler).tls(mode).start()?;
        Self::attach(server, HttpConfig::default())
    }

    /// Start an in-process TLS server for `handler` with a caller supplied
    /// PEM certificate chain and private key; the tester trusts that chain.
    ///
    /// # Errors
    ///
    /// Returns a server error if the PEM pair is unusable.
    pub fn serve_with_certificate<F>(handler: F, cert_pem: &[u8], key_pem: &[u8]) -> Result<Self>
    where
        F: Fn(http::Request<Bytes>) -> http::Response<Bytes> + Send + Sync + 'static,
    {
        let server = TestServer::builder(handler)
            .tls(ServerTls::Pem {
                cert: cert_pem.to_vec(),
                key: key_pem.to_vec(),
            })
            .start()?;
        Self::attach(server, HttpConfig::default())
    }

    /// Bind a tester to an already running server, trusting its roots.
    ///
    /// # Errors
    ///
    /// Returns a builder error if `config` is invalid.
    pub fn attach(server: TestServer, config: HttpConfig) -> Result<Self> {
        let mut builder = HttpClient::builder().config(config);
        for root in server.trusted_roots() {
            builder = builder.trust_root(root.clone());
        }
        let session = Session::new(&server.host(), server.is_tls(), builder.build()?)?;

        Ok(Self {
            session: Arc::new(session),
            server: Some(server),
        })
    }

    /// Host and port, e.g. `127.0.0.1:9090`.
    #[must_use]
    pub fn host(&self) -> String {
        self.session.host()
    }

    /// Absolute URL of `path`, e.g. `http://127.0.0.1:9090/status`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        self.session.url(path)
    }

    /// Absolute websocket URL of `path`, `wss://` for TLS testers.
    #[must_use]
    pub fn websocket_url(&self, path: &str) -> String {
        self.session.websocket_url(path)
    }

    #[must_use]
    pub fn is_tls(&self) -> bool {
        self.session.https
    }

    /// Cookies the session would send to this host.
    #[must_use]
    pub fn cookies(&self) -> Vec<cookie::Cookie<'static>> {
        match self.root_url() {
            Some(url) => self.session.client().jar().cookies_for(&url),
            None => Vec::new(),
        }
    }

    /// Seed the session with `cookies` as if this host had set them.
    pub fn set_cookies<I>(&self, cookies: I)
    where
        I: IntoIterator<Item = cookie::Cookie<'static>>,
    {
        match self.root_url() {
            Some(url) => self.session.client().jar().add_cookies(cookies, &url),
            None => log::warn!("httpcheck: cannot store cookies for host {}", self.host()),
        }
    }

    /// New request builder sharing this tester's session.
    #[must_use]
    pub fn request(&self) -> Request {
        Request::new(Arc::clone(&self.session))
    }

    /// Issue a prebuilt request with session cookies.
    ///
    /// # Errors
    ///
    /// Returns a builder error for a relative URI, otherwise any transport
    /// error.
    pub fn send<B: Into<Bytes>>(&self, request: http::Request<B>) -> Result<HttpResponse> {
        self.session.send(HttpRequest::from_http(request)?)
    }

    /// Issue a prebuilt request through `filters`, bypassing the cookie jar.
    ///
    /// A filter error aborts the request before any connection is made.
    ///
    /// # Errors
    ///
    /// Returns a filter error when a filter rejects the request, otherwise any
    /// transport error.
    pub fn send_filtered<B: Into<Bytes>>(
        &self,
        request: http::Request<B>,
        filters: &FilterChain,
    ) -> Result<HttpResponse> {
        self.session
            .send_filtered(HttpRequest::from_http(request)?, filters)
    }

    /// Open a websocket to `path` on this host.
    ///
    /// # Errors
    ///
    /// Returns connect, TLS or upgrade errors.
    pub fn websocket(&self, path: &str) -> Result<WebSocket> {
        self.websocket_with_headers(path, &HeaderMap::new())
    }

    /// Open a websocket with extra handshake headers.
    ///
    /// # Errors
    ///
    /// Returns connect, TLS or upgrade errors.
    pub fn websocket_with_headers(&self, path: &str, headers: &HeaderMap) -> Result<WebSocket> {
        let url = self.websocket_url(path);
        let session = Arc::clone(&self.session);
        let stream = session.block_on(httpcheck_client::websocket::connect(
            session.client(),
            url.as_str(),
            headers,
        ))?;
        Ok(WebSocket::new(session, stream))
    }

    /// Stop the in-process server, if any. Closing twice is a no-op.
    pub fn close(&mut self) {
        if let Some(mut server) = self.server.take() {
            server.shutdown();
        }
    }

    /// Counters of every request sent through this tester.
    #[must_use]
    pub fn stats(&self) -> ClientStatsSnapshot {
        self.session.client().stats()
    }

    /// The in-process server, if this tester runs one.
    #[must_use]
    pub fn server(&self) -> Option<&TestServer> {
        self.server.as_ref()
    }

    fn root_url(&self) -> Option<Url> {
        Url::parse(&self.url("/")).ok()
    }
}

impl Drop for Tester {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for Tester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tester")
            .field("host", &self.host())
            .field("https", &self.session.https)
            .field("server", &self.server)
            .finish()
    }
}

//! Core HTTP client implementation

use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use http::StatusCode;
use http_body_util::{BodyExt, Limited};
use hyper_util::rt::TokioIo;
use rustls::pki_types::CertificateDer;

use super::stats::{ClientStats, ClientStatsSnapshot};
use crate::config::{HttpConfig, Validator};
use crate::connect::{Conn, Connector, TlsSettings, client_config};
use crate::cookie::{self, Jar};
use crate::error::{self, Result};
use crate::http::{HttpRequest, HttpResponse};
use crate::middleware::FilterChain;

/// Builder for [`HttpClient`].
#[derive(Debug, Default)]
pub struct HttpClientBuilder {
    config: HttpConfig,
    tls: TlsSettings,
    jar: Option<Jar>,
}

impl HttpClientBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn config(mut self, config: HttpConfig) -> Self {
        self.config = config;
        self
    }

    /// Trust a DER certificate as a root, in addition to the webpki roots.
    #[must_use]
    pub fn trust_root(mut self, cert: CertificateDer<'static>) -> Self {
        self.tls = self.tls.with_root(cert);
        self
    }

    /// Trust every certificate of a PEM bundle.
    ///
    /// # Errors
    ///
    /// Returns a TLS error if the bundle holds no certificate.
    pub fn trust_pem(mut self, pem: &[u8]) -> Result<Self> {
        self.tls = self.tls.with_pem_roots(pem)?;
        Ok(self)
    }

    /// Share an existing cookie jar.
    #[must_use]
    pub fn cookie_jar(mut self, jar: Jar) -> Self {
        self.jar = Some(jar);
        self
    }

    /// Validate the configuration and build the client.
    ///
    /// # Errors
    ///
    /// Returns a builder error for invalid configuration and a TLS error if
    /// the trust store cannot be built.
    pub fn build(self) -> Result<HttpClient> {
        self.config.validate().map_err(error::builder)?;
        let tls = client_config(&self.tls)?;

        Ok(HttpClient {
            connector: Connector::new(self.config.clone(), tls),
            config: Arc::new(self.config),
            jar: self.jar.unwrap_or_default(),
            stats: Arc::new(ClientStats::new()),
        })
    }
}

/// HTTP/1.1 client for test exchanges.
///
/// Cloning is cheap; clones share the cookie jar and the statistics.
#[derive(Debug, Clone)]
pub struct HttpClient {
    config: Arc<HttpConfig>,
    connector: Connector,
    jar: Jar,
    stats: Arc<ClientStats>,
}

impl HttpClient {
    /// Client with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns a TLS error if the trust store cannot be built.
    pub fn new() -> Result<Self> {
        HttpClientBuilder::new().build()
    }

    #[must_use]
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::new()
    }

    #[must_use]
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    #[must_use]
    pub fn jar(&self) -> &Jar {
        &self.jar
    }

    #[must_use]
    pub fn connector(&self) -> &Connector {
        &self.connector
    }

    #[must_use]
    pub fn stats(&self) -> ClientStatsSnapshot {
        self.stats.snapshot()
    }

    /// Send a request with session cookies.
    ///
    /// Cookies stored for the URL are attached, and every `Set-Cookie` of the
    /// response is stored, unless the cookie store is disabled.
    ///
    /// # Errors
    ///
    /// Returns connect, TLS, timeout, request or body errors.
    pub async fn execute(&self, mut request: HttpRequest) -> Result<HttpResponse> {
        self.stats.record_request();
        let use_jar = self.config.cookie_store;

        if use_jar {
            let url = request.url().clone();
            cookie::add_cookie_header(request.headers_mut(), &self.jar, &url);
        }

        let response = self.exchange(request).await?;

        if use_jar {
            cookie::store_response_cookies(response.headers(), &self.jar, response.url());
        }
        Ok(response)
    }

    /// Send a request through `filters`, without the cookie jar.
    ///
    /// Filters run before dialing; an error from any of them aborts the
    /// request and no connection is made.
    ///
    /// # Errors
    ///
    /// Returns a filter error when a filter rejects the request, otherwise the
    /// same errors as [`execute`](Self::execute).
    pub async fn execute_filtered(
        &self,
        mut request: HttpRequest,
        filters: &FilterChain,
    ) -> Result<HttpResponse> {
        self.stats.record_request();

        if let Err(e) = filters.apply(&mut request) {
            self.stats.record_filtered();
            return Err(e);
        }

        self.exchange(request).await
    }

    async fn exchange(&self, request: HttpRequest) -> Result<HttpResponse> {
        let started = Instant::now();
        let url = request.url().clone();
        let method = request.method().clone();
        let sent = request.body().len() as u64;
        let deadline = request.timeout().unwrap_or(self.config.response_timeout);
        let wire = request.to_wire(&self.config.user_agent)?;

        self.stats.record_connection();
        let conn = match self.connector.connect(&url).await {
            Ok(conn) => conn,
            Err(e) => {
                self.stats.record_connection_failure();
                self.stats.record_failure();
                return Err(e);
            }
        };

        let result = tokio::time::timeout(deadline, self.round_trip(conn, wire))
            .await
            .unwrap_or_else(|_| Err(error::timeout("response")));

        let (parts, body) = match result {
            Ok(ok) => ok,
            Err(e) => {
                self.stats.record_failure();
                tracing::debug!(
                    target: "httpcheck::client",
                    %method,
                    %url,
                    error = %e,
                    "request failed"
                );
                return Err(e.with_url(url));
            }
        };

        let elapsed = started.elapsed();
        self.stats.record_completed(sent, body.len() as u64);
        tracing::debug!(
            target: "httpcheck::client",
            %method,
            %url,
            status = parts.status.as_u16(),
            bytes = body.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "request completed"
        );

        Ok(HttpResponse::new(
            parts.status,
            parts.version,
            parts.headers,
            body,
            url,
            elapsed,
        ))
    }

    async fn round_trip(
        &self,
        conn: Conn,
        wire: http::Request<http_body_util::Full<Bytes>>,
    ) -> Result<(http::response::Parts, Bytes)> {
        let (mut sender, connection) = hyper::client::conn::http1::handshake(TokioIo::new(conn))
            .await
            .map_err(error::request)?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::trace!(target: "httpcheck::client", error = %e, "connection closed with error");
            }
        });

        let response = sender.send_request(wire).await.map_err(error::request)?;
        let (parts, incoming) = response.into_parts();

        let body = if parts.status == StatusCode::NO_CONTENT {
            Bytes::new()
        } else {
            Limited::new(incoming, self.config.max_body_size)
                .collect()
                .await
                .map_err(error::body)?
                .to_bytes()
        };

        Ok((parts, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn invalid_config_is_rejected() {
        let err = HttpClient::builder()
            .config(HttpConfig::default().with_connect_timeout(Duration::ZERO))
            .build()
            .expect_err("zero timeout");
        assert_eq!(err.kind(), crate::error::Kind::Builder);
    }

    #[tokio::test]
    async fn refused_connection_is_a_connect_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);

        let client = HttpClient::new().expect("client");
        let request = HttpRequest::parse(http::Method::GET, format!("http://{addr}/"))
            .expect("valid url");
        let err = client.execute(request).await.expect_err("nothing listening");

        assert!(err.is_connect());
        assert!(err.url().is_some());
        assert_eq!(client.stats().connections_failed, 1);
    }
}

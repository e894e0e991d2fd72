//! rustls client configuration and handshakes

use std::sync::Arc;
use std::time::Duration;

use rustls::pki_types::{CertificateDer, ServerName};
use rustls::{ClientConfig, RootCertStore};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tokio_rustls::client::TlsStream;

use crate::error::{self, Result};

/// Roots trusted in addition to the webpki set.
#[derive(Debug, Clone, Default)]
pub struct TlsSettings {
    extra_roots: Vec<CertificateDer<'static>>,
}

impl TlsSettings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Trust one more DER certificate, typically a test CA.
    #[must_use]
    pub fn with_root(mut self, cert: CertificateDer<'static>) -> Self {
        self.extra_roots.push(cert);
        self
    }

    /// Trust every certificate in a PEM bundle.
    ///
    /// # Errors
    ///
    /// Returns a TLS error if the PEM data holds no certificate.
    pub fn with_pem_roots(mut self, pem: &[u8]) -> Result<Self> {
        self.extra_roots.extend(parse_pem_certificates(pem)?);
        Ok(self)
    }

    #[must_use]
    pub fn extra_roots(&self) -> &[CertificateDer<'static>] {
        &self.extra_roots
    }
}

/// Build a client config trusting webpki roots plus the extra roots.
///
/// # Errors
///
/// Returns a TLS error if an extra root is rejected or the protocol versions
/// are unsupported by the ring provider.
pub fn client_config(settings: &TlsSettings) -> Result<Arc<ClientConfig>> {
    let mut root_store = RootCertStore::empty();
    root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    for cert in &settings.extra_roots {
        root_store.add(cert.clone()).map_err(error::tls)?;
    }
    tracing::debug!(
        target: "httpcheck::tls",
        extra_roots = settings.extra_roots.len(),
        total_roots = root_store.len(),
        "built client trust store"
    );

    let config = ClientConfig::builder_with_provider(Arc::new(
        rustls::crypto::ring::default_provider(),
    ))
    .with_safe_default_protocol_versions()
    .map_err(error::tls)?
    .with_root_certificates(root_store)
    .with_no_client_auth();

    Ok(Arc::new(config))
}

/// Parse every `CERTIFICATE` block of a PEM document.
///
/// # Errors
///
/// Returns a TLS error if a block is malformed or none is present.
pub fn parse_pem_certificates(pem: &[u8]) -> Result<Vec<CertificateDer<'static>>> {
    let mut reader = std::io::BufReader::new(pem);
    let certs = rustls_pemfile::certs(&mut reader)
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(error::tls)?;

    if certs.is_empty() {
        return Err(error::tls("no certificate found in PEM data"));
    }

    Ok(certs)
}

/// Run a client handshake over `stream` within `deadline`.
///
/// # Errors
///
/// Returns a TLS error for invalid server names or handshake failures and a
/// timeout error when the deadline elapses.
pub async fn handshake(
    stream: TcpStream,
    host: &str,
    config: Arc<ClientConfig>,
    deadline: Duration,
) -> Result<TlsStream<TcpStream>> {
    let server_name = ServerName::try_from(host.to_string()).map_err(error::tls)?;
    let connector = TlsConnector::from(config);

    let tls = tokio::time::timeout(deadline, connector.connect(server_name, stream))
        .await
        .map_err(|_| error::timeout("tls handshake"))?
        .map_err(error::tls)?;

    tracing::trace!(target: "httpcheck::tls", host, "tls session established");
    Ok(tls)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_build_a_config() {
        assert!(client_config(&TlsSettings::new()).is_ok());
    }

    #[test]
    fn pem_without_certificates_is_rejected() {
        let err = parse_pem_certificates(b"not a pem").expect_err("no certs");
        assert_eq!(err.kind(), crate::error::Kind::Tls);
    }
}

use std::error::Error as StdError;
use std::fmt;

/// A Result alias where the Err case is `httpcheck_client::Error`.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents errors that can occur while building, sending or reading a request.
pub struct Error {
    pub inner: Box<Inner>,
}

pub struct Inner {
    pub kind: Kind,
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub url: Option<url::Url>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Invalid request or tester configuration
    Builder,
    /// Request could not be written or the exchange failed
    Request,
    /// A request filter rejected the request before dialing
    Filter,
    /// TCP connection could not be established
    Connect,
    /// TLS setup or handshake failure
    Tls,
    /// Connect, handshake or response deadline elapsed
    Timeout,
    /// Response body could not be read
    Body,
    /// Request body could not be encoded
    Encode,
    /// Response body could not be decoded
    Decode,
    /// Websocket upgrade failure
    Upgrade,
    /// Test server could not be started
    Server,
}

impl Error {
    pub fn new(kind: Kind) -> Error {
        Error {
            inner: Box::new(Inner {
                kind,
                source: None,
                url: None,
            }),
        }
    }

    #[must_use = "Error builder methods return a new Error and should be used"]
    pub fn with<E: Into<Box<dyn StdError + Send + Sync>>>(mut self, source: E) -> Error {
        self.inner.source = Some(source.into());
        self
    }

    #[must_use]
    pub fn with_url(mut self, url: url::Url) -> Self {
        self.inner.url = Some(url);
        self
    }

    #[must_use]
    pub fn kind(&self) -> Kind {
        self.inner.kind
    }

    /// Get the URL associated with this error, if any
    #[must_use]
    pub fn url(&self) -> Option<&url::Url> {
        self.inner.url.as_ref()
    }

    #[must_use]
    pub fn is_timeout(&self) -> bool {
        self.inner.kind == Kind::Timeout
    }

    #[must_use]
    pub fn is_connect(&self) -> bool {
        self.inner.kind == Kind::Connect
    }

    #[must_use]
    pub fn is_filter(&self) -> bool {
        self.inner.kind == Kind::Filter
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut f = f.debug_struct("httpcheck_client::Error");

        f.field("kind", &self.inner.kind);

        if let Some(ref source) = self.inner.source {
            f.field("source", source);
        }

        if let Some(ref url) = self.inner.url {
            f.field("url", url);
        }

        f.finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.kind {
            Kind::Builder => f.write_str("builder error")?,
            Kind::Request => f.write_str("error sending request")?,
            Kind::Filter => f.write_str("request rejected by filter")?,
            Kind::Connect => f.write_str("error connecting to server")?,
            Kind::Tls => f.write_str("tls error")?,
            Kind::Timeout => f.write_str("operation timed out")?,
            Kind::Body => f.write_str("error reading response body")?,
            Kind::Encode => f.write_str("error encoding request body")?,
            Kind::Decode => f.write_str("error decoding response body")?,
            Kind::Upgrade => f.write_str("error upgrading connection")?,
            Kind::Server => f.write_str("test server error")?,
        }

        if let Some(ref url) = self.inner.url {
            write!(f, " for url ({url})")?;
        }

        if let Some(ref source) = self.inner.source {
            write!(f, ": {source}")?;
        }

        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner
            .source
            .as_ref()
            .map(|err| &**err as &(dyn StdError + 'static))
    }
}

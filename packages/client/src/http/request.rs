//! Outgoing request type

use std::time::Duration;

use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use url::Url;

use super::into_url::{IntoUrl, IntoUrlSealed};
use crate::error::{self, Result};

/// A fully buffered HTTP request.
///
/// Request filters receive `&mut HttpRequest` and may rewrite any part of it
/// before a connection is made.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Bytes,
    timeout: Option<Duration>,
}

impl HttpRequest {
    #[must_use]
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            timeout: None,
        }
    }

    /// Parse `url` and build a request for it.
    ///
    /// # Errors
    ///
    /// Returns a builder error if the URL is unusable.
    pub fn parse<U: IntoUrl>(method: Method, url: U) -> Result<Self> {
        Ok(Self::new(method, url.into_url()?))
    }

    /// Convert an `http::Request` with an absolute URI.
    ///
    /// # Errors
    ///
    /// Returns a builder error if the URI is relative or uses an unknown scheme.
    pub fn from_http<B: Into<Bytes>>(request: http::Request<B>) -> Result<Self> {
        let (parts, body) = request.into_parts();
        let url = parts.uri.to_string().into_url()?;

        Ok(Self {
            method: parts.method,
            url,
            headers: parts.headers,
            body: body.into(),
            timeout: None,
        })
    }

    /// Set a header, replacing existing values.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Append every header of `headers`.
    #[must_use]
    pub fn with_headers(mut self, headers: &HeaderMap) -> Self {
        super::headers::merge_headers(&mut self.headers, headers);
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Override the configured response deadline for this request.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn method_mut(&mut self) -> &mut Method {
        &mut self.method
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn url_mut(&mut self) -> &mut Url {
        &mut self.url
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut Bytes {
        &mut self.body
    }

    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Build the wire request: origin-form target plus `Host`,
    /// `User-Agent` (unless set) and `Content-Length` for non-empty bodies.
    pub(crate) fn to_wire(&self, user_agent: &str) -> Result<http::Request<http_body_util::Full<Bytes>>> {
        let mut builder = http::Request::builder()
            .method(self.method.clone())
            .uri(super::url::origin_form(&self.url));

        let headers = builder
            .headers_mut()
            .ok_or_else(|| error::builder("invalid request parts"))?;
        headers.extend(self.headers.clone());

        if !headers.contains_key(http::header::HOST) {
            let host = super::url::authority(&self.url);
            headers.insert(
                http::header::HOST,
                HeaderValue::from_str(&host).map_err(error::builder)?,
            );
        }
        if !headers.contains_key(http::header::USER_AGENT) {
            headers.insert(
                http::header::USER_AGENT,
                HeaderValue::from_str(user_agent).map_err(error::builder)?,
            );
        }
        if !self.body.is_empty() && !headers.contains_key(http::header::CONTENT_LENGTH) {
            headers.insert(http::header::CONTENT_LENGTH, HeaderValue::from(self.body.len()));
        }

        builder
            .body(http_body_util::Full::new(self.body.clone()))
            .map_err(error::builder)
    }
}

impl std::fmt::Display for HttpRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.method, super::url::origin_form(&self.url))
    }
}

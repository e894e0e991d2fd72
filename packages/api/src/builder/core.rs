//! Core `Request` structure and base functionality
//!
//! A `Request` carries the headers, timeout and filters applied to every call
//! made through it; the verb methods in [`methods`](super::methods) are the
//! terminal operations and may be called any number of times.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use http::HeaderMap;
use httpcheck_client::{FilterChain, HttpRequest, HttpResponse, Result};

use crate::tester::Session;

/// Content type enumeration for the request helpers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    /// application/json content type
    ApplicationJson,
    /// application/x-www-form-urlencoded content type
    ApplicationFormUrlEncoded,
    /// application/octet-stream content type
    ApplicationOctetStream,
    /// text/plain content type
    TextPlain,
    /// text/html content type
    TextHtml,
    /// text/xml content type
    TextXml,
    /// multipart/form-data content type
    MultipartFormData,
}

impl ContentType {
    /// Convert content type to string representation
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::ApplicationJson => "application/json",
            ContentType::ApplicationFormUrlEncoded => "application/x-www-form-urlencoded",
            ContentType::ApplicationOctetStream => "application/octet-stream",
            ContentType::TextPlain => "text/plain",
            ContentType::TextHtml => "text/html",
            ContentType::TextXml => "text/xml",
            ContentType::MultipartFormData => "multipart/form-data",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for ContentType {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Request builder bound to a tester's session.
///
/// Headers added here are appended after the helper's own `Content-Type`, so
/// a custom `Content-Type` header yields two values.
pub struct Request {
    pub(crate) session: Arc<Session>,
    pub(crate) headers: HeaderMap,
    pub(crate) timeout: Option<Duration>,
    pub(crate) filters: FilterChain,
    pub(crate) debug_enabled: bool,
}

impl Request {
    pub(crate) fn new(session: Arc<Session>) -> Self {
        Self {
            session,
            headers: HeaderMap::new(),
            timeout: None,
            filters: FilterChain::new(),
            debug_enabled: false,
        }
    }

    /// Log every request and response status at `info` level.
    #[must_use]
    pub fn debug(mut self) -> Self {
        self.debug_enabled = true;
        self
    }

    /// Absolute URL of `path` on the tester's host.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        self.session.url(path)
    }

    /// Apply the builder's headers and timeout, then send.
    ///
    /// Without filters the request is a session request; with filters the
    /// cookie jar is bypassed and the filters run before dialing.
    pub(crate) fn dispatch(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut request = request.with_headers(&self.headers);
        if let Some(timeout) = self.timeout {
            request = request.with_timeout(timeout);
        }

        let line = request.to_string();
        if self.debug_enabled {
            log::info!("httpcheck: {line}");
        }

        let result = if self.filters.is_empty() {
            self.session.send(request)
        } else {
            self.session.send_filtered(request, &self.filters)
        };

        match &result {
            Ok(response) if self.debug_enabled => {
                log::info!(
                    "httpcheck: {line} -> {} in {:?}",
                    response.status(),
                    response.elapsed()
                );
            }
            Err(e) => log::warn!("httpcheck: {line} failed: {e}"),
            Ok(_) => {}
        }
        result
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("host", &self.session.host())
            .field("headers", &self.headers)
            .field("timeout", &self.timeout)
            .field("filters", &self.filters.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_types_render_as_mime_strings() {
        assert_eq!(ContentType::ApplicationJson.as_str(), "application/json");
        assert_eq!(ContentType::TextXml.to_string(), "text/xml");
        assert_eq!(
            ContentType::ApplicationFormUrlEncoded.as_ref(),
            "application/x-www-form-urlencoded"
        );
    }
}

//! Header management for requests
//!
//! Invalid header names or values are skipped with a warning rather than
//! failing the builder chain.

use std::time::Duration;

use http::{HeaderMap, HeaderValue};
use httpcheck_client::http::{header_name, header_value};

use crate::builder::core::{ContentType, Request};

/// Value for [`Request::accept`]: a string or a [`ContentType`]
pub enum AcceptValue {
    /// String representation of content type
    String(String),
    /// ContentType enum variant
    ContentType(ContentType),
}

impl AcceptValue {
    /// Convert to string representation
    pub fn as_str(&self) -> &str {
        match self {
            AcceptValue::String(s) => s,
            AcceptValue::ContentType(ct) => ct.as_str(),
        }
    }
}

impl From<&str> for AcceptValue {
    fn from(s: &str) -> Self {
        AcceptValue::String(s.to_string())
    }
}

impl From<String> for AcceptValue {
    fn from(s: String) -> Self {
        AcceptValue::String(s)
    }
}

impl From<ContentType> for AcceptValue {
    fn from(ct: ContentType) -> Self {
        AcceptValue::ContentType(ct)
    }
}

impl Request {
    /// Add a header to every request sent through this builder.
    ///
    /// Values accumulate: adding the same name twice sends both values.
    ///
    /// # Examples
    /// ```no_run
    /// use httpcheck::Tester;
    ///
    /// let tester = Tester::new(":8080", false)?;
    /// let response = tester
    ///     .request()
    ///     .header("x-request-id", "42")
    ///     .get("/status")?;
    /// # Ok::<(), httpcheck::Error>(())
    /// ```
    #[must_use]
    pub fn header(mut self, key: &str, value: &str) -> Self {
        match (header_name(key), header_value(value)) {
            (Ok(name), Ok(value)) => {
                self.headers.append(name, value);
            }
            (Err(e), _) | (_, Err(e)) => {
                log::warn!("httpcheck: skipping header {key}: {e}");
            }
        }
        self
    }

    /// Append every header of `headers`.
    #[must_use]
    pub fn headers(mut self, headers: &HeaderMap) -> Self {
        httpcheck_client::http::merge_headers(&mut self.headers, headers);
        self
    }

    /// Set the Accept header
    #[must_use]
    pub fn accept(self, accept: impl Into<AcceptValue>) -> Self {
        let accept = accept.into();
        self.header(http::header::ACCEPT.as_str(), accept.as_str())
    }

    /// Set a prebuilt header value, replacing earlier values of `key`.
    #[must_use]
    pub fn header_value(mut self, key: http::HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(key, value);
        self
    }

    /// Deadline for the whole exchange, overriding the client's response
    /// timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

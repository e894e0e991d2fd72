//! Authentication methods for HTTP requests

use http::header::AUTHORIZATION;
use httpcheck_client::{RequestFilter, http as client_http};

use crate::builder::core::Request;

/// Custom X-API-Key header for API authentication
pub const X_API_KEY: &str = "x-api-key";

impl Request {
    /// Set the `X-API-Key` header.
    #[must_use]
    pub fn api_key(self, key: &str) -> Self {
        self.header(X_API_KEY, key)
    }

    /// Set basic authentication header
    ///
    /// The credentials are base64 encoded; a missing password encodes as
    /// `user:`.
    #[must_use]
    pub fn basic_auth(self, user: &str, pass: Option<&str>) -> Self {
        match client_http::basic_auth(user, pass) {
            Ok(value) => self.header_value(AUTHORIZATION, value),
            Err(e) => {
                log::warn!("httpcheck: skipping basic auth: {e}");
                self
            }
        }
    }

    /// Set bearer token authentication header
    #[must_use]
    pub fn bearer_auth(self, token: &str) -> Self {
        match client_http::bearer_auth(token) {
            Ok(value) => self.header_value(AUTHORIZATION, value),
            Err(e) => {
                log::warn!("httpcheck: skipping bearer auth: {e}");
                self
            }
        }
    }

    /// Run `filter` on every request before dialing.
    ///
    /// Requests with filters bypass the session cookie jar. A filter may
    /// rewrite the request or return an error to abort it.
    #[must_use]
    pub fn filter<F: RequestFilter + 'static>(mut self, filter: F) -> Self {
        self.filters = self.filters.add(filter);
        self
    }
}

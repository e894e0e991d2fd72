//! Request filters
//!
//! A filter sees the request after it is fully built and before a connection
//! is dialed. It may rewrite any part of the request, or return an error to
//! abort the exchange without touching the network.

use std::sync::Arc;

use crate::http::HttpRequest;

/// Callback run on a request before dialing.
pub trait RequestFilter: Send + Sync {
    /// Inspect or rewrite `request`; an error aborts the request.
    ///
    /// # Errors
    ///
    /// Whatever the filter reports; the client wraps it as a filter error.
    fn filter(&self, request: &mut HttpRequest) -> anyhow::Result<()>;
}

impl<F> RequestFilter for F
where
    F: Fn(&mut HttpRequest) -> anyhow::Result<()> + Send + Sync,
{
    fn filter(&self, request: &mut HttpRequest) -> anyhow::Result<()> {
        self(request)
    }
}

/// Filters applied in insertion order.
#[derive(Clone, Default)]
pub struct FilterChain {
    filters: Vec<Arc<dyn RequestFilter>>,
}

impl FilterChain {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn add<F: RequestFilter + 'static>(mut self, filter: F) -> Self {
        self.filters.push(Arc::new(filter));
        self
    }

    pub fn push(&mut self, filter: Arc<dyn RequestFilter>) {
        self.filters.push(filter);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Run every filter; the first error stops the chain.
    ///
    /// # Errors
    ///
    /// Returns a [`Kind::Filter`](crate::error::Kind::Filter) error carrying
    /// the filter's message.
    pub fn apply(&self, request: &mut HttpRequest) -> crate::error::Result<()> {
        for filter in &self.filters {
            if let Err(e) = filter.filter(request) {
                tracing::warn!(
                    target: "httpcheck::filter",
                    request = %request,
                    error = %e,
                    "request aborted by filter"
                );
                return Err(crate::error::filter(e).with_url(request.url().clone()));
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterChain")
            .field("filters", &self.filters.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{HeaderValue, Method};

    fn request() -> HttpRequest {
        HttpRequest::parse(Method::GET, "http://127.0.0.1:1/").expect("valid url")
    }

    #[test]
    fn filters_run_in_order() {
        let chain = FilterChain::new()
            .add(|r: &mut HttpRequest| -> anyhow::Result<()> {
                r.headers_mut().insert("x-step", HeaderValue::from_static("one"));
                Ok(())
            })
            .add(|r: &mut HttpRequest| -> anyhow::Result<()> {
                let seen = r.headers().get("x-step").cloned();
                anyhow::ensure!(seen.as_ref().map(HeaderValue::as_bytes) == Some(b"one"), "wrong order");
                r.headers_mut().insert("x-step", HeaderValue::from_static("two"));
                Ok(())
            });

        let mut req = request();
        chain.apply(&mut req).expect("both filters pass");
        assert_eq!(req.headers()["x-step"], "two");
    }

    #[test]
    fn first_error_aborts() {
        let chain = FilterChain::new()
            .add(|_: &mut HttpRequest| -> anyhow::Result<()> { anyhow::bail!("denied") })
            .add(|_: &mut HttpRequest| -> anyhow::Result<()> { panic!("must not run") });

        let err = chain.apply(&mut request()).expect_err("aborted");
        assert!(err.is_filter());
        assert!(err.to_string().contains("denied"));
    }
}

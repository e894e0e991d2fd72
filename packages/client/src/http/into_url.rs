use url::Url;

use crate::error::{self, Result};

/// A trait to try to convert some type into a `Url`.
///
/// This trait is "sealed", such that only types within httpcheck_client can
/// implement it.
pub trait IntoUrl: IntoUrlSealed {}

impl IntoUrl for Url {}
impl IntoUrl for String {}
impl IntoUrl for &str {}
impl IntoUrl for &String {}

pub trait IntoUrlSealed {
    /// Besides parsing as a valid `Url`, the `Url` must have a host and one
    /// of the `http`, `https`, `ws` or `wss` schemes.
    ///
    /// # Errors
    ///
    /// Returns a builder error if the string does not parse or the scheme or
    /// host is unusable for a request.
    fn into_url(self) -> Result<Url>;

    fn as_str(&self) -> &str;
}

impl IntoUrlSealed for Url {
    fn into_url(self) -> Result<Url> {
        if !matches!(self.scheme(), "http" | "https" | "ws" | "wss") || !self.has_host() {
            return Err(error::url_bad_scheme(self));
        }

        Ok(self)
    }

    fn as_str(&self) -> &str {
        self.as_ref()
    }
}

impl IntoUrlSealed for &str {
    fn into_url(self) -> Result<Url> {
        Url::parse(self).map_err(error::builder)?.into_url()
    }

    fn as_str(&self) -> &str {
        self
    }
}

impl IntoUrlSealed for &String {
    fn into_url(self) -> Result<Url> {
        (&**self).into_url()
    }

    fn as_str(&self) -> &str {
        self.as_ref()
    }
}

impl IntoUrlSealed for String {
    fn into_url(self) -> Result<Url> {
        (&*self).into_url()
    }

    fn as_str(&self) -> &str {
        self.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Kind;

    #[test]
    fn into_url_file_scheme() {
        let err = "file:///etc/hosts".into_url().expect_err("file urls are rejected");
        assert_eq!(err.kind(), Kind::Builder);
        assert_eq!(err.url().map(Url::as_str), Some("file:///etc/hosts"));
    }

    #[test]
    fn into_url_blank_scheme() {
        let err = "127.0.0.1:8080".into_url().expect_err("missing scheme");
        assert_eq!(err.kind(), Kind::Builder);
    }

    #[test]
    fn into_url_accepts_websocket_schemes() {
        assert!("ws://127.0.0.1:9/chat".into_url().is_ok());
        assert!(String::from("https://localhost/").into_url().is_ok());
    }
}

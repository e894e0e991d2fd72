//! HTTP Cookies

use std::fmt;
use std::sync::{Arc, RwLock};

use bytes::Bytes;
use http::{HeaderMap, HeaderValue, header::COOKIE, header::SET_COOKIE};

/// Actions for a persistent cookie store providing session support.
pub trait CookieStore: Send + Sync {
    /// Store a set of Set-Cookie header values received from `url`
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &url::Url);
    /// Get any Cookie values in the store for `url`
    fn cookies(&self, url: &url::Url) -> Option<HeaderValue>;
}

/// The default `CookieStore` implementation, shared between clones.
#[derive(Default)]
pub struct Jar(Arc<RwLock<cookie_store::CookieStore>>);

impl Jar {
    /// Add a cookie to this jar as if `url` had sent it.
    ///
    /// # Example
    ///
    /// ```
    /// use httpcheck_client::cookie::Jar;
    /// use url::Url;
    ///
    /// let url = "http://127.0.0.1:8080/".parse::<Url>().expect("url");
    /// let jar = Jar::default();
    /// jar.add_cookie_str("session=abc", &url);
    /// assert_eq!(jar.cookies_for(&url)[0].value(), "abc");
    /// ```
    pub fn add_cookie_str(&self, cookie: &str, url: &url::Url) {
        let cookies = cookie::Cookie::parse(cookie)
            .ok()
            .map(cookie::Cookie::into_owned)
            .into_iter();
        self.store(cookies, url);
    }

    /// Store parsed cookies as if `url` had sent them.
    pub fn add_cookies<I>(&self, cookies: I, url: &url::Url)
    where
        I: IntoIterator<Item = cookie::Cookie<'static>>,
    {
        self.store(cookies.into_iter(), url);
    }

    /// Cookies that would be sent to `url`, as name/value pairs.
    #[must_use]
    pub fn cookies_for(&self, url: &url::Url) -> Vec<cookie::Cookie<'static>> {
        match self.0.read() {
            Ok(store) => store
                .get_request_values(url)
                .map(|(name, value)| cookie::Cookie::new(name.to_owned(), value.to_owned()))
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Drop every stored cookie.
    pub fn clear(&self) {
        if let Ok(mut store) = self.0.write() {
            store.clear();
        }
    }

    fn store<I>(&self, cookies: I, url: &url::Url)
    where
        I: Iterator<Item = cookie::Cookie<'static>>,
    {
        if let Ok(mut store) = self.0.write() {
            store.store_response_cookies(cookies, url);
        }
    }
}

impl Clone for Jar {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl fmt::Debug for Jar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.0.read().map(|store| store.iter_any().count()).unwrap_or(0);
        f.debug_struct("Jar").field("cookies", &count).finish()
    }
}

impl CookieStore for Jar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &url::Url) {
        let cookies: Vec<_> = cookie_headers
            .filter_map(|val| {
                let text = val.to_str().ok()?;
                match cookie::Cookie::parse(text) {
                    Ok(cookie) => Some(cookie.into_owned()),
                    Err(e) => {
                        tracing::debug!(target: "httpcheck::cookie", error = %e, "ignoring malformed Set-Cookie");
                        None
                    }
                }
            })
            .collect();

        self.store(cookies.into_iter(), url);
    }

    fn cookies(&self, url: &url::Url) -> Option<HeaderValue> {
        let s = match self.0.read() {
            Ok(store) => store
                .get_request_values(url)
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; "),
            Err(_) => return None,
        };

        if s.is_empty() {
            return None;
        }

        HeaderValue::from_maybe_shared(Bytes::from(s)).ok()
    }
}

/// Attach cookies for `url`, appending to a `Cookie` header the caller set.
pub(crate) fn add_cookie_header(headers: &mut HeaderMap, store: &dyn CookieStore, url: &url::Url) {
    let Some(stored) = store.cookies(url) else {
        return;
    };

    let merged = match headers.get(COOKIE) {
        Some(existing) => {
            let mut joined = existing.as_bytes().to_vec();
            joined.extend_from_slice(b"; ");
            joined.extend_from_slice(stored.as_bytes());
            HeaderValue::from_maybe_shared(Bytes::from(joined)).unwrap_or(stored)
        }
        None => stored,
    };

    headers.insert(COOKIE, merged);
}

/// Feed every `Set-Cookie` of a response into the store.
pub(crate) fn store_response_cookies(headers: &HeaderMap, store: &dyn CookieStore, url: &url::Url) {
    let mut values = headers.get_all(SET_COOKIE).iter();
    store.set_cookies(&mut values, url);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> url::Url {
        url::Url::parse(s).expect("valid url")
    }

    #[test]
    fn stores_and_returns_cookies_per_host() {
        let jar = Jar::default();
        let mut headers = HeaderMap::new();
        headers.append(SET_COOKIE, HeaderValue::from_static("a=1; Path=/"));
        headers.append(SET_COOKIE, HeaderValue::from_static("b=2; Path=/"));
        store_response_cookies(&headers, &jar, &url("http://127.0.0.1:9000/login"));

        let value = jar.cookies(&url("http://127.0.0.1:9000/")).expect("cookies");
        let text = value.to_str().expect("ascii");
        assert!(text.contains("a=1"));
        assert!(text.contains("b=2"));
        assert!(jar.cookies(&url("http://example.com/")).is_none());
    }

    #[test]
    fn appends_to_existing_cookie_header() {
        let jar = Jar::default();
        let target = url("http://localhost/");
        jar.add_cookie_str("sid=xyz", &target);

        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("mine=1"));
        add_cookie_header(&mut headers, &jar, &target);
        assert_eq!(headers[COOKIE], "mine=1; sid=xyz");
    }

    #[test]
    fn clones_share_the_store() {
        let jar = Jar::default();
        let target = url("http://localhost/");
        jar.clone().add_cookies([cookie::Cookie::new("k", "v")], &target);
        assert_eq!(jar.cookies_for(&target).len(), 1);
        jar.clear();
        assert!(jar.cookies_for(&target).is_empty());
    }

    #[test]
    fn malformed_cookies_are_ignored() {
        let jar = Jar::default();
        let mut headers = HeaderMap::new();
        headers.append(SET_COOKIE, HeaderValue::from_static("=novalue"));
        store_response_cookies(&headers, &jar, &url("http://localhost/"));
        assert!(jar.cookies_for(&url("http://localhost/")).is_empty());
    }
}

//! Host normalization and request-target helpers

use url::Url;

use crate::error::{self, Result};

/// Reduce a tester host to `host:port` form.
///
/// Accepts `host:port`, `:port` or a full `http(s)://` URL; for a URL only
/// the authority is kept. A string that merely looks like a URL but fails to
/// parse is kept as given.
#[must_use]
pub fn normalize_host(host: &str) -> String {
    if host.starts_with("http://") || host.starts_with("https://") {
        if let Ok(url) = Url::parse(host) {
            return authority(&url);
        }
    }

    host.to_string()
}

/// Host with a bare `:port` expanded to `127.0.0.1:port`.
#[must_use]
pub fn display_host(host: &str) -> String {
    if host.starts_with(':') {
        format!("127.0.0.1{host}")
    } else {
        host.to_string()
    }
}

/// `host[:port]` of a URL, with the port omitted when it is the scheme default.
#[must_use]
pub fn authority(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    let host = if host.contains(':') && !host.starts_with('[') {
        format!("[{host}]")
    } else {
        host.to_string()
    };

    match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host,
    }
}

/// Path and query of a URL as sent on the request line.
#[must_use]
pub fn origin_form(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{query}", url.path()),
        None => url.path().to_string(),
    }
}

/// Host and port to dial, resolving scheme defaults.
///
/// # Errors
///
/// Returns a builder error when the URL has no host or no known default port.
pub fn dial_target(url: &Url) -> Result<(String, u16)> {
    let host = url
        .host_str()
        .ok_or_else(|| error::url_bad_scheme(url.clone()))?
        .trim_start_matches('[')
        .trim_end_matches(']')
        .to_string();
    let port = url
        .port_or_known_default()
        .ok_or_else(|| error::url_bad_scheme(url.clone()))?;

    Ok((host, port))
}

/// Whether the URL needs a TLS session.
#[must_use]
pub fn is_secure(url: &Url) -> bool {
    matches!(url.scheme(), "https" | "wss")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_keeps_authority_of_urls() {
        assert_eq!(normalize_host("https://example.com:8443/x?y"), "example.com:8443");
        assert_eq!(normalize_host("http://example.com/"), "example.com");
        assert_eq!(normalize_host("localhost:9090"), "localhost:9090");
        assert_eq!(normalize_host(":9090"), ":9090");
    }

    #[test]
    fn bare_port_expands_to_loopback() {
        assert_eq!(display_host(":9090"), "127.0.0.1:9090");
        assert_eq!(display_host("example.com:80"), "example.com:80");
    }

    #[test]
    fn origin_form_includes_query() {
        let url = Url::parse("http://h/a/b?x=1&y=2#frag").expect("valid url");
        assert_eq!(origin_form(&url), "/a/b?x=1&y=2");
        let url = Url::parse("http://h").expect("valid url");
        assert_eq!(origin_form(&url), "/");
    }

    #[test]
    fn dial_target_uses_default_ports() {
        let url = Url::parse("https://example.com/").expect("valid url");
        assert_eq!(dial_target(&url).expect("dialable"), ("example.com".to_string(), 443));
        let url = Url::parse("ws://[::1]:9000/").expect("valid url");
        assert_eq!(dial_target(&url).expect("dialable"), ("::1".to_string(), 9000));
        assert_eq!(authority(&url), "[::1]:9000");
    }
}

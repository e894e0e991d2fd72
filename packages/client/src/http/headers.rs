//! Header construction and lookup helpers over `http::HeaderMap`

use base64::{Engine as _, engine::general_purpose};
use http::{HeaderMap, HeaderName, HeaderValue};

use crate::error::{self, Result};

/// Parse a header name, rejecting invalid tokens.
///
/// # Errors
///
/// Returns a builder error when `name` is not a valid header name.
pub fn header_name(name: &str) -> Result<HeaderName> {
    HeaderName::from_bytes(name.as_bytes()).map_err(error::builder)
}

/// Parse a header value, rejecting control characters.
///
/// # Errors
///
/// Returns a builder error when `value` is not a valid header value.
pub fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(error::builder)
}

/// `Authorization` value for HTTP basic authentication.
///
/// # Errors
///
/// Returns a builder error if the encoded credentials are not a valid header value.
pub fn basic_auth(user: &str, pass: Option<&str>) -> Result<HeaderValue> {
    let credentials = format!("{}:{}", user, pass.unwrap_or_default());
    let encoded = general_purpose::STANDARD.encode(credentials);
    let mut value = header_value(&format!("Basic {encoded}"))?;
    value.set_sensitive(true);
    Ok(value)
}

/// `Authorization` value for a bearer token.
///
/// # Errors
///
/// Returns a builder error if the token contains characters not allowed in headers.
pub fn bearer_auth(token: &str) -> Result<HeaderValue> {
    let mut value = header_value(&format!("Bearer {token}"))?;
    value.set_sensitive(true);
    Ok(value)
}

/// First value of `name` as text; empty when absent or not visible ASCII.
#[must_use]
pub fn header_str<'h>(headers: &'h HeaderMap, name: &str) -> &'h str {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

/// Canonical MIME form of a header name, e.g. `content-type` as `Content-Type`.
#[must_use]
pub fn canonical_name(name: &str) -> String {
    let mut upper = true;
    name.chars()
        .map(|c| {
            let mapped = if upper {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            };
            upper = c == '-';
            mapped
        })
        .collect()
}

/// Append every value of `additional` to `base`, keeping existing values.
pub fn merge_headers(base: &mut HeaderMap, additional: &HeaderMap) {
    for (name, value) in additional {
        base.append(name.clone(), value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalizes_header_names() {
        assert_eq!(canonical_name("content-type"), "Content-Type");
        assert_eq!(canonical_name("X-REQUEST-ID"), "X-Request-Id");
        assert_eq!(canonical_name("etag"), "Etag");
    }

    #[test]
    fn basic_auth_is_base64_encoded() {
        let value = basic_auth("user", Some("pass")).expect("valid credentials");
        assert_eq!(value.to_str().expect("ascii"), "Basic dXNlcjpwYXNz");
        assert!(value.is_sensitive());
    }

    #[test]
    fn header_str_defaults_to_empty() {
        let mut headers = HeaderMap::new();
        headers.append("x-a", HeaderValue::from_static("1"));
        headers.append("x-a", HeaderValue::from_static("2"));
        assert_eq!(header_str(&headers, "X-A"), "1");
        assert_eq!(header_str(&headers, "x-missing"), "");
    }

    #[test]
    fn merge_keeps_all_values() {
        let mut base = HeaderMap::new();
        base.append("x-a", HeaderValue::from_static("1"));
        let mut extra = HeaderMap::new();
        extra.append("x-a", HeaderValue::from_static("2"));
        merge_headers(&mut base, &extra);
        assert_eq!(base.get_all("x-a").iter().count(), 2);
    }

    #[test]
    fn invalid_names_are_rejected() {
        assert!(header_name("bad header").is_err());
        assert!(header_value("bad\nvalue").is_err());
    }
}

//! Buffered response type

use std::borrow::Cow;
use std::time::Duration;

use bytes::Bytes;
use http::{HeaderMap, StatusCode, Version};
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{self, Result};

/// A response whose body has been read completely.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    status: StatusCode,
    version: Version,
    headers: HeaderMap,
    body: Bytes,
    url: Url,
    elapsed: Duration,
}

impl HttpResponse {
    #[must_use]
    pub fn new(
        status: StatusCode,
        version: Version,
        headers: HeaderMap,
        body: Bytes,
        url: Url,
        elapsed: Duration,
    ) -> Self {
        Self {
            status,
            version,
            headers,
            body,
            url,
            elapsed,
        }
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    #[must_use]
    pub fn version(&self) -> Version {
        self.version
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// First value of `name`, empty when absent.
    #[must_use]
    pub fn header(&self, name: &str) -> &str {
        super::headers::header_str(&self.headers, name)
    }

    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Body as text, replacing invalid UTF-8.
    #[must_use]
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Deserialize the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns a decode error if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body)
            .map_err(|e| error::decode(e).with_url(self.url.clone()))
    }

    /// Deserialize the body as XML.
    ///
    /// # Errors
    ///
    /// Returns a decode error if the body is not valid XML for `T`.
    pub fn xml<T: DeserializeOwned>(&self) -> Result<T> {
        let text = std::str::from_utf8(&self.body)
            .map_err(|e| error::decode(e).with_url(self.url.clone()))?;
        quick_xml::de::from_str(text).map_err(|e| error::decode(e).with_url(self.url.clone()))
    }

    /// URL the request was sent to.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Time from dialing to the last body byte.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    fn response(body: &'static [u8]) -> HttpResponse {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", "application/json".parse().expect("header"));
        HttpResponse::new(
            StatusCode::OK,
            Version::HTTP_11,
            headers,
            Bytes::from_static(body),
            Url::parse("http://127.0.0.1/x").expect("url"),
            Duration::from_millis(1),
        )
    }

    #[derive(Deserialize, Debug, PartialEq)]
    struct User {
        name: String,
    }

    #[test]
    fn decodes_json_bodies() {
        let user: User = response(br#"{"name":"alice"}"#).json().expect("json");
        assert_eq!(user.name, "alice");
    }

    #[test]
    fn invalid_json_is_a_decode_error() {
        let err = response(b"nope").json::<User>().expect_err("not json");
        assert_eq!(err.kind(), crate::error::Kind::Decode);
        assert_eq!(err.url().map(Url::path), Some("/x"));
    }

    #[test]
    fn decodes_xml_bodies() {
        let user: User = response(b"<User><name>bob</name></User>").xml().expect("xml");
        assert_eq!(user.name, "bob");
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let resp = response(b"");
        assert_eq!(resp.header("Content-Type"), "application/json");
        assert_eq!(resp.header("X-Missing"), "");
    }
}

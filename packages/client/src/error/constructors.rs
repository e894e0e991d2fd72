use super::types::{Error, Kind};

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Creates an `Error` for a builder error.
pub fn builder<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Builder).with(e.into())
}

/// Creates an `Error` for a request error.
pub fn request<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Request).with(e.into())
}

/// Creates an `Error` for a request rejected by a filter.
pub fn filter<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Filter).with(e.into())
}

/// Creates an `Error` for a connection failure.
pub fn connect<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Connect).with(e.into())
}

/// Creates an `Error` for a TLS failure.
pub fn tls<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Tls).with(e.into())
}

/// Creates an `Error` for an elapsed deadline.
pub fn timeout(what: &'static str) -> Error {
    Error::new(Kind::Timeout).with(TimedOut(what))
}

/// Creates an `Error` for a body error.
pub fn body<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Body).with(e.into())
}

/// Creates an `Error` for an encode error.
pub fn encode<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Encode).with(e.into())
}

/// Creates an `Error` for a decode error.
pub fn decode<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Decode).with(e.into())
}

/// Creates an `Error` for an upgrade error.
pub fn upgrade<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Upgrade).with(e.into())
}

/// Creates an `Error` for a test server failure.
pub fn server<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Server).with(e.into())
}

pub fn url_bad_scheme(url: url::Url) -> Error {
    Error::new(Kind::Builder).with(BadScheme).with_url(url)
}

/// A marker type naming the deadline that elapsed.
#[derive(Debug)]
pub struct TimedOut(pub &'static str);

impl std::fmt::Display for TimedOut {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} timed out", self.0)
    }
}

impl std::error::Error for TimedOut {}

/// A marker type to indicate that a URI scheme was bad.
#[derive(Debug)]
pub struct BadScheme;

impl std::fmt::Display for BadScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("bad scheme")
    }
}

impl std::error::Error for BadScheme {}

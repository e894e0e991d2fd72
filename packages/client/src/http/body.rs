//! Request body encodings

use std::io::Read;

use bytes::Bytes;
use serde::Serialize;

use crate::error::{self, Result};

/// Ordered form/query parameters; a key may repeat.
///
/// Encoding sorts by key, keeping the insertion order of repeated keys, so
/// the same set of parameters always produces the same query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    pairs: Vec<(String, String)>,
}

impl Params {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value, keeping earlier values for the same key.
    #[must_use]
    pub fn add(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.pairs.push((key.into(), value.into()));
        self
    }

    /// Replace every value of `key` with `value`.
    #[must_use]
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        self.pairs.retain(|(k, _)| *k != key);
        self.pairs.push((key, value.into()));
        self
    }

    /// First value of `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// `application/x-www-form-urlencoded` form, sorted by key.
    ///
    /// # Errors
    ///
    /// Returns an encode error if serialization fails.
    pub fn encode(&self) -> Result<String> {
        let mut sorted: Vec<&(String, String)> = self.pairs.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(&b.0));
        serde_urlencoded::to_string(sorted).map_err(error::encode)
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Params
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// Body payload of an outgoing request.
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    /// No body
    #[default]
    Empty,
    /// UTF-8 text sent as is
    Text(String),
    /// Raw bytes sent as is
    Bytes(Bytes),
    /// Url-encoded form parameters
    Form(Params),
}

impl RequestBody {
    /// Serialize `value` with serde_json.
    ///
    /// # Errors
    ///
    /// Returns an encode error if `value` cannot be serialized.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        serde_json::to_vec(value)
            .map(|buf| RequestBody::Bytes(Bytes::from(buf)))
            .map_err(error::encode)
    }

    /// Serialize `value` as XML with quick-xml.
    ///
    /// # Errors
    ///
    /// Returns an encode error if `value` cannot be serialized, for example
    /// when it is not a struct or map with a root element name.
    pub fn xml<T: Serialize>(value: &T) -> Result<Self> {
        quick_xml::se::to_string(value)
            .map(RequestBody::Text)
            .map_err(error::encode)
    }

    /// Drain `reader` into memory.
    ///
    /// # Errors
    ///
    /// Returns an encode error if reading fails.
    pub fn reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).map_err(error::encode)?;
        Ok(RequestBody::Bytes(Bytes::from(buf)))
    }

    /// Encoded bytes as sent on the wire.
    ///
    /// # Errors
    ///
    /// Returns an encode error if form parameters fail to encode.
    pub fn into_bytes(self) -> Result<Bytes> {
        Ok(match self {
            RequestBody::Empty => Bytes::new(),
            RequestBody::Text(text) => Bytes::from(text),
            RequestBody::Bytes(bytes) => bytes,
            RequestBody::Form(params) => Bytes::from(params.encode()?),
        })
    }
}

impl From<&str> for RequestBody {
    fn from(value: &str) -> Self {
        RequestBody::Text(value.to_string())
    }
}

impl From<String> for RequestBody {
    fn from(value: String) -> Self {
        RequestBody::Text(value)
    }
}

impl From<Vec<u8>> for RequestBody {
    fn from(value: Vec<u8>) -> Self {
        RequestBody::Bytes(Bytes::from(value))
    }
}

impl From<&[u8]> for RequestBody {
    fn from(value: &[u8]) -> Self {
        RequestBody::Bytes(Bytes::copy_from_slice(value))
    }
}

impl From<Bytes> for RequestBody {
    fn from(value: Bytes) -> Self {
        RequestBody::Bytes(value)
    }
}

impl From<Params> for RequestBody {
    fn from(value: Params) -> Self {
        RequestBody::Form(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Person {
        name: String,
        age: u8,
    }

    #[test]
    fn params_encode_sorted_by_key() {
        let params = Params::new().add("b", "2").add("a", "x y").add("b", "1");
        assert_eq!(params.encode().expect("encodes"), "a=x+y&b=2&b=1");
    }

    #[test]
    fn params_set_replaces_all_values() {
        let params = Params::from([("k", "1"), ("k", "2")]).set("k", "3");
        assert_eq!(params.get("k"), Some("3"));
        assert_eq!(params.encode().expect("encodes"), "k=3");
    }

    #[test]
    fn json_body_is_compact() {
        let person = Person {
            name: "alice".into(),
            age: 3,
        };
        let body = RequestBody::json(&person).expect("serializes");
        assert_eq!(
            body.into_bytes().expect("bytes"),
            Bytes::from_static(br#"{"name":"alice","age":3}"#)
        );
    }

    #[test]
    fn xml_body_uses_struct_name_as_root() {
        let person = Person {
            name: "alice".into(),
            age: 3,
        };
        let body = RequestBody::xml(&person).expect("serializes");
        assert_eq!(
            body.into_bytes().expect("bytes"),
            Bytes::from_static(b"<Person><name>alice</name><age>3</age></Person>")
        );
    }

    #[test]
    fn reader_is_drained() {
        let body = RequestBody::reader(&b"streamed"[..]).expect("reads");
        assert_eq!(body.into_bytes().expect("bytes"), Bytes::from_static(b"streamed"));
    }

    #[test]
    fn empty_body_has_no_bytes() {
        assert!(RequestBody::Empty.into_bytes().expect("bytes").is_empty());
    }
}

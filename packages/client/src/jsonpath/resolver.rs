//! Path resolution over raw JSON bytes
//!
//! The cursor is always a borrowed slice of the input document. Object and
//! array lookups are serde visitors that borrow the selected member as a
//! `RawValue` and skip everything else with `IgnoredAny`, so nothing is
//! materialised into a `serde_json::Value`.

use std::fmt;

use serde::de::{self, DeserializeSeed, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde_json::value::RawValue;

use super::ast::{JsonPath, JsonSelector};

/// Resolve a dotted `path` against `document`.
///
/// Returns the raw bytes of the addressed value, or `None` when any segment
/// fails to resolve. String leaves are returned without their surrounding
/// quotes and without unescaping; every other value is returned exactly as
/// serialized.
///
/// # Examples
/// ```
/// use httpcheck_client::jsonpath::resolve;
///
/// let doc = br#"{"addresses":[{"name":"china"},{"name":"USA"}]}"#;
/// assert_eq!(resolve(doc, "addresses.1.name"), Some(&b"USA"[..]));
/// assert_eq!(resolve(doc, "addresses.3.name"), None);
/// ```
#[must_use]
pub fn resolve<'a>(document: &'a [u8], path: &str) -> Option<&'a [u8]> {
    resolve_path(document, &JsonPath::parse(path))
}

/// Resolve an already parsed path.
#[must_use]
pub fn resolve_path<'a>(document: &'a [u8], path: &JsonPath<'_>) -> Option<&'a [u8]> {
    let mut cursor = root(document)?;

    for selector in path.selectors() {
        cursor = match *selector {
            JsonSelector::Child { name } => member(cursor, name)?,
            JsonSelector::Index { index } => element(cursor, index)?,
        };
    }

    Some(leaf_bytes(cursor))
}

fn root(document: &[u8]) -> Option<&RawValue> {
    serde_json::from_slice::<&RawValue>(document).ok()
}

fn member<'a>(cursor: &'a RawValue, key: &str) -> Option<&'a RawValue> {
    let mut de = serde_json::Deserializer::from_str(cursor.get());
    let found = de.deserialize_map(MemberLookup { key }).ok()?;
    de.end().ok()?;
    found
}

fn element(cursor: &RawValue, index: usize) -> Option<&RawValue> {
    let mut de = serde_json::Deserializer::from_str(cursor.get());
    let found = de.deserialize_seq(ElementLookup { index }).ok()?;
    de.end().ok()?;
    found
}

fn leaf_bytes(value: &RawValue) -> &[u8] {
    let raw = value.get().as_bytes();
    match raw {
        [b'"', inner @ .., b'"'] => inner,
        _ => raw,
    }
}

/// Finds the first member named `key` in a JSON object.
struct MemberLookup<'k> {
    key: &'k str,
}

impl<'de> Visitor<'de> for MemberLookup<'_> {
    type Value = Option<&'de RawValue>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON object")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut found = None;

        while let Some(key) = map.next_key_seed(KeyMatch { key: self.key })? {
            if key && found.is_none() {
                found = Some(map.next_value::<&'de RawValue>()?);
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }

        Ok(found)
    }
}

/// Compares an object key against the wanted name without keeping it.
struct KeyMatch<'k> {
    key: &'k str,
}

impl<'de> DeserializeSeed<'de> for KeyMatch<'_> {
    type Value = bool;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(self)
    }
}

impl<'de> Visitor<'de> for KeyMatch<'_> {
    type Value = bool;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object key")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(v == self.key)
    }
}

/// Walks a JSON array and keeps the element at `index`.
struct ElementLookup {
    index: usize,
}

impl<'de> Visitor<'de> for ElementLookup {
    type Value = Option<&'de RawValue>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON array")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut found = None;
        let mut position = 0usize;

        loop {
            if position == self.index {
                match seq.next_element::<&'de RawValue>()? {
                    Some(value) => found = Some(value),
                    None => break,
                }
            } else if seq.next_element::<IgnoredAny>()?.is_none() {
                break;
            }
            position += 1;
        }

        Ok(found)
    }
}

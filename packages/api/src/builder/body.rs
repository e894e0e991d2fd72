//! Request body encodings for the verb helpers

use bytes::Bytes;
use httpcheck_client::{RequestBody, Result, error};
use serde::Serialize;

use crate::builder::core::ContentType;

/// Encode `form` as `application/x-www-form-urlencoded`.
///
/// Accepts anything serde_urlencoded can serialize: structs, maps or slices
/// of pairs.
pub(crate) fn form_body<T: Serialize + ?Sized>(form: &T) -> Result<(ContentType, RequestBody)> {
    let encoded = serde_urlencoded::to_string(form).map_err(error::encode)?;
    Ok((ContentType::ApplicationFormUrlEncoded, RequestBody::Text(encoded)))
}

pub(crate) fn json_body<T: Serialize + ?Sized>(value: &T) -> Result<(ContentType, RequestBody)> {
    Ok((ContentType::ApplicationJson, RequestBody::json(value)?))
}

pub(crate) fn xml_body<T: Serialize>(value: &T) -> Result<(ContentType, RequestBody)> {
    Ok((ContentType::TextXml, RequestBody::xml(value)?))
}

/// Append an encoded body to `url` as its query string.
pub(crate) fn append_query(url: &mut String, query: &Bytes) {
    if query.is_empty() {
        return;
    }
    url.push(if url.contains('?') { '&' } else { '?' });
    url.push_str(&String::from_utf8_lossy(query));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Login<'a> {
        user: &'a str,
        remember: bool,
    }

    #[test]
    fn form_encodes_structs_and_pairs() {
        let (ct, body) = form_body(&Login { user: "a b", remember: true }).expect("form");
        assert_eq!(ct, ContentType::ApplicationFormUrlEncoded);
        assert_eq!(
            body.into_bytes().expect("bytes"),
            Bytes::from_static(b"user=a+b&remember=true")
        );

        let (_, body) = form_body(&[("k", "v"), ("k", "w")]).expect("form");
        assert_eq!(body.into_bytes().expect("bytes"), Bytes::from_static(b"k=v&k=w"));
    }

    #[test]
    fn json_sets_the_json_content_type() {
        let (ct, body) = json_body(&serde_json::json!({"a": 1})).expect("json");
        assert_eq!(ct, ContentType::ApplicationJson);
        assert_eq!(body.into_bytes().expect("bytes"), Bytes::from_static(br#"{"a":1}"#));
    }

    #[test]
    fn query_is_appended_with_the_right_separator() {
        let mut url = "http://h/p".to_string();
        append_query(&mut url, &Bytes::from_static(b"a=1"));
        assert_eq!(url, "http://h/p?a=1");

        append_query(&mut url, &Bytes::from_static(b"b=2"));
        assert_eq!(url, "http://h/p?a=1&b=2");

        append_query(&mut url, &Bytes::new());
        assert_eq!(url, "http://h/p?a=1&b=2");
    }
}

//! Fluent assertions over a buffered response

use std::cell::Cell;

use http::StatusCode;
use httpcheck_client::http::canonical_name;
use httpcheck_client::jsonpath::{self, Literal, Outcome};
use httpcheck_client::HttpResponse;

use super::reporter::Reporter;

/// Adds [`expect`](ResponseExt::expect) to responses.
pub trait ResponseExt {
    /// Start asserting on this response, reporting failures to `reporter`.
    fn expect<'a, R: Reporter + ?Sized>(&'a self, reporter: &'a R) -> Expect<'a, R>;
}

impl ResponseExt for HttpResponse {
    fn expect<'a, R: Reporter + ?Sized>(&'a self, reporter: &'a R) -> Expect<'a, R> {
        Expect::new(self, reporter)
    }
}

/// Assertion view of a response.
///
/// Every check returns `&Self` so checks chain; a failed check is reported
/// and logged, and later checks still run. [`passed`](Expect::passed) tells
/// whether everything on this view passed.
pub struct Expect<'a, R: Reporter + ?Sized> {
    response: &'a HttpResponse,
    reporter: &'a R,
    passed: Cell<bool>,
}

impl<'a, R: Reporter + ?Sized> Expect<'a, R> {
    pub fn new(response: &'a HttpResponse, reporter: &'a R) -> Self {
        Self {
            response,
            reporter,
            passed: Cell::new(true),
        }
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.passed.get()
    }

    #[must_use]
    pub fn response(&self) -> &'a HttpResponse {
        self.response
    }

    /// Send the status line, headers and body to the reporter's log.
    pub fn dump(&self) -> &Self {
        let response = self.response;
        self.reporter.log(&format!(
            "{:?} {} from {}",
            response.version(),
            response.status(),
            response.url()
        ));
        for (name, value) in response.headers() {
            self.reporter.log(&format!(
                "{}: {}",
                canonical_name(name.as_str()),
                String::from_utf8_lossy(value.as_bytes())
            ));
        }
        self.reporter.log(&response.text());
        self
    }

    pub fn status(&self, expected: u16) -> &Self {
        let actual = self.response.status().as_u16();
        self.check(expected == actual, || {
            format!("Expected response status code of {expected}, but got {actual}")
        })
    }

    /// Status 200
    pub fn ok(&self) -> &Self {
        self.status(StatusCode::OK.as_u16())
    }

    /// Status 403
    pub fn forbidden(&self) -> &Self {
        self.status(StatusCode::FORBIDDEN.as_u16())
    }

    /// Status 404
    pub fn not_found(&self) -> &Self {
        self.status(StatusCode::NOT_FOUND.as_u16())
    }

    /// Status 500
    pub fn internal_error(&self) -> &Self {
        self.status(StatusCode::INTERNAL_SERVER_ERROR.as_u16())
    }

    /// First value of header `name` equals `value`; an absent header reads
    /// as empty.
    pub fn header(&self, name: &str, value: &str) -> &Self {
        let actual = self.response.header(name);
        self.check(actual == value, || {
            format!(
                "Expected response header contains {} of {value}, but got {actual}",
                canonical_name(name)
            )
        })
    }

    pub fn content_type(&self, content_type: &str) -> &Self {
        self.header("Content-Type", content_type)
    }

    pub fn exist_header(&self, name: &str) -> &Self {
        let found = self.response.headers().contains_key(name);
        self.check(found, || {
            format!("Expected response header includes {}", canonical_name(name))
        })
    }

    pub fn not_exist_header(&self, name: &str) -> &Self {
        let found = self.response.headers().contains_key(name);
        self.check(!found, || {
            format!(
                "Expected response header does not include {}",
                canonical_name(name)
            )
        })
    }

    pub fn empty(&self) -> &Self {
        let len = self.response.body().len();
        self.check(len == 0, || {
            format!("Expected response body to be empty, but got {len} bytes")
        })
    }

    pub fn not_empty(&self) -> &Self {
        self.check(!self.response.body().is_empty(), || {
            "Expected response body not to be empty".to_string()
        })
    }

    pub fn contains(&self, needle: &str) -> &Self {
        let found = self.response.text().contains(needle);
        self.check(found, || format!("Expected response body contains {needle:?}"))
    }

    pub fn not_contains(&self, needle: &str) -> &Self {
        let found = self.response.text().contains(needle);
        self.check(!found, || {
            format!("Expected response body does not contain {needle:?}")
        })
    }

    /// Body matches the regular expression `pattern`; an invalid pattern
    /// fails.
    pub fn matches(&self, pattern: &str) -> &Self {
        match regex::bytes::Regex::new(pattern) {
            Ok(re) => self.check(re.is_match(self.response.body()), || {
                format!("Expected response body matches regexp {pattern:?}")
            }),
            Err(e) => self.check(false, || format!("Invalid regexp {pattern:?}: {e}")),
        }
    }

    /// Body does not match `pattern`; an invalid pattern fails.
    pub fn not_matches(&self, pattern: &str) -> &Self {
        match regex::bytes::Regex::new(pattern) {
            Ok(re) => self.check(!re.is_match(self.response.body()), || {
                format!("Expected response body does not match regexp {pattern:?}")
            }),
            Err(e) => self.check(false, || format!("Invalid regexp {pattern:?}: {e}")),
        }
    }

    /// The dotted JSON `path` holds `expected`.
    ///
    /// Strings compare against the raw text between the quotes, numbers are
    /// parsed at the literal's width and booleans accept `true`, `1` or `on`
    /// in any case.
    pub fn contains_json(&self, path: &str, expected: impl Into<Literal>) -> &Self {
        let outcome = jsonpath::assert_contains(self.response.body(), path, expected);
        self.report(&outcome)
    }

    /// The dotted JSON `path` does not resolve.
    pub fn not_contains_json(&self, path: &str) -> &Self {
        let outcome = jsonpath::assert_not_contains(self.response.body(), path);
        self.report(&outcome)
    }

    fn report(&self, outcome: &Outcome) -> &Self {
        self.check(outcome.passed, || outcome.message.clone())
    }

    fn check(&self, ok: bool, message: impl FnOnce() -> String) -> &Self {
        if !ok {
            let message = message();
            log::error!("httpcheck: {} {}: {message}", self.response.status(), self.response.url());
            self.passed.set(false);
            self.reporter.fail(&message);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bytes::Bytes;
    use http::{HeaderMap, HeaderValue, Version};

    use super::*;
    use crate::assert::Recorder;

    fn response(status: u16, content_type: Option<&'static str>, body: &'static str) -> HttpResponse {
        let mut headers = HeaderMap::new();
        if let Some(ct) = content_type {
            headers.insert(http::header::CONTENT_TYPE, HeaderValue::from_static(ct));
        }
        HttpResponse::new(
            StatusCode::from_u16(status).expect("status"),
            Version::HTTP_11,
            headers,
            Bytes::from_static(body.as_bytes()),
            "http://127.0.0.1:1/".parse().expect("url"),
            Duration::from_millis(1),
        )
    }

    const ORDER: &str = r#"{"user":{"name":"alice","age":3},"addresses":[{"name":"china"},{"name":"USA"}]}"#;

    #[test]
    fn passing_chain_reports_nothing() {
        let recorder = Recorder::new();
        let res = response(200, Some("application/json"), ORDER);

        let view = res.expect(&recorder);
        view.ok()
            .content_type("application/json")
            .exist_header("content-type")
            .not_exist_header("x-missing")
            .not_empty()
            .contains("alice")
            .not_contains("bob")
            .matches(r#""age":\d+"#)
            .not_matches("^<html>")
            .contains_json("user.name", "alice")
            .contains_json("user.age", 3)
            .contains_json("addresses.1.name", "USA")
            .not_contains_json("addresses.3.name");

        assert!(view.passed());
        assert!(recorder.is_clean(), "{:?}", recorder.failures());
    }

    #[test]
    fn failures_are_reported_and_chain_continues() {
        let recorder = Recorder::new();
        let res = response(404, None, "");

        let view = res.expect(&recorder);
        view.ok().content_type("text/plain").not_empty().not_found().empty();

        assert!(!view.passed());
        let failures = recorder.failures();
        assert_eq!(failures.len(), 3);
        assert_eq!(failures[0], "Expected response status code of 200, but got 404");
        assert_eq!(
            failures[1],
            "Expected response header contains Content-Type of text/plain, but got "
        );
    }

    #[test]
    fn json_failures_carry_the_outcome_message() {
        let recorder = Recorder::new();
        let res = response(200, None, ORDER);

        res.expect(&recorder)
            .contains_json("user.age", 4)
            .not_contains_json("user.name");

        let failures = recorder.failures();
        assert_eq!(failures.len(), 2);
        assert!(failures[0].contains("user.age"));
        assert!(failures[1].contains("alice"));
    }

    #[test]
    fn invalid_regex_fails() {
        let recorder = Recorder::new();
        let res = response(200, None, "body");

        assert!(!res.expect(&recorder).matches("(").passed());
        assert!(recorder.failures()[0].starts_with("Invalid regexp"));
    }

    #[test]
    fn status_shorthands_match_their_codes() {
        let recorder = Recorder::new();
        let res = response(403, None, "");

        let view = res.expect(&recorder);
        view.status(403).forbidden();
        assert!(view.passed());

        let res = response(500, None, "");
        assert!(res.expect(&recorder).internal_error().passed());
    }

    #[test]
    fn dump_logs_to_the_reporter() {
        let recorder = Recorder::new();
        let res = response(200, Some("text/plain"), "hello");

        res.expect(&recorder).dump();
        let logs = recorder.logs();
        assert!(logs[0].contains("200 OK"));
        assert_eq!(logs[1], "Content-Type: text/plain");
        assert_eq!(logs[2], "hello");
    }
}

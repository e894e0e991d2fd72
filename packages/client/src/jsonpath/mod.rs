//! Dotted JSON path assertions over raw response bytes
//!
//! Paths are `.`-separated segments where plain decimal numbers index arrays,
//! e.g. `addresses.1.name`. Resolution never allocates a JSON tree: the cursor
//! is a borrowed slice of the document throughout.
//!
//! # Examples
//!
//! ```
//! use httpcheck_client::jsonpath::{assert_contains, assert_not_contains, FailureKind};
//!
//! let doc = br#"{"user":{"name":"alice","age":3}}"#;
//!
//! assert!(assert_contains(doc, "user.name", "alice").passed);
//! assert!(assert_contains(doc, "user.age", 3).passed);
//! assert_eq!(
//!     assert_contains(doc, "user.age", 4).kind(),
//!     Some(FailureKind::ValueMismatch)
//! );
//! assert!(assert_not_contains(doc, "user.email").passed);
//! ```

pub mod ast;
pub mod literal;
pub mod outcome;
pub mod resolver;

pub use ast::{JsonPath, JsonSelector};
pub use literal::{Literal, TRUTHY};
pub use outcome::{Failure, FailureKind, Outcome};
pub use resolver::{resolve, resolve_path};

/// Assert that `path` resolves in `document` to a value equal to `expected`.
#[must_use]
pub fn assert_contains(document: &[u8], path: &str, expected: impl Into<Literal>) -> Outcome {
    let expected = expected.into();

    match resolve(document, path) {
        Some(actual) => expected.compare(path, actual),
        None => Outcome::fail(Failure::PathNotFound {
            path: path.to_string(),
            expected: expected.to_string(),
        }),
    }
}

/// Assert that `path` does not resolve in `document`.
#[must_use]
pub fn assert_not_contains(document: &[u8], path: &str) -> Outcome {
    match resolve(document, path) {
        None => Outcome::pass(format!("json path {path} is absent")),
        Some(actual) => Outcome::fail(Failure::UnexpectedValue {
            path: path.to_string(),
            actual: String::from_utf8_lossy(actual).into_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &[u8] =
        br#"{"user":{"name":"alice","age":3},"addresses":[{"name":"china"},{"name":"USA"}]}"#;

    #[test]
    fn contains_passes_for_matching_leaf() {
        let outcome = assert_contains(DOC, "user.name", "alice");
        assert!(outcome.passed, "{}", outcome.message);
        assert!(outcome.failure().is_none());
    }

    #[test]
    fn contains_reports_value_mismatch() {
        assert!(assert_contains(DOC, "user.age", 3).passed);

        let outcome = assert_contains(DOC, "user.age", 4);
        assert!(!outcome.passed);
        assert_eq!(
            outcome.failure(),
            Some(&Failure::ValueMismatch {
                path: "user.age".into(),
                expected: "4".into(),
                actual: "3".into(),
            })
        );
    }

    #[test]
    fn contains_reports_missing_path_with_expectation() {
        let outcome = assert_contains(DOC, "addresses.5.name", "USA");
        assert_eq!(outcome.kind(), Some(FailureKind::PathNotFound));
        assert!(outcome.message.contains("addresses.5.name"));
        assert!(outcome.message.contains("USA"));
    }

    #[test]
    fn contains_reports_type_mismatch() {
        let outcome = assert_contains(DOC, "user.name", 1i64);
        assert_eq!(outcome.kind(), Some(FailureKind::TypeMismatch));
    }

    #[test]
    fn not_contains_passes_for_absent_paths() {
        assert!(assert_not_contains(DOC, "addresses.0.post").passed);
        assert!(assert_not_contains(DOC, "addresses.3.name").passed);
        assert!(assert_not_contains(DOC, "user.unknown.deep").passed);
    }

    #[test]
    fn not_contains_reports_found_value() {
        let outcome = assert_not_contains(DOC, "addresses.1.name");
        assert_eq!(
            outcome.clone().into_result(),
            Err(Failure::UnexpectedValue {
                path: "addresses.1.name".into(),
                actual: "USA".into(),
            })
        );
        assert!(outcome.message.contains("USA"));
    }
}

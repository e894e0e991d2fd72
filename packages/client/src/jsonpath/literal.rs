//! Typed expectations compared against resolved raw text

use std::fmt;
use std::str::FromStr;

use super::outcome::{Failure, Outcome};

/// Text values that classify as `true` when compared against a boolean.
pub const TRUTHY: [&str; 4] = ["true", "True", "1", "on"];

/// Expected value of a JSON path assertion.
///
/// Each variant carries its own comparison rule: textual kinds compare the
/// raw matched bytes exactly, numeric kinds parse the matched text at the
/// variant's width, and `Bool` classifies the text as truthy or falsy.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Str(String),
    Bytes(Vec<u8>),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    Isize(isize),
    F32(f32),
    F64(f64),
    Bool(bool),
}

impl Literal {
    /// Name of the expected type, used in mismatch diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Literal::Str(_) => "string",
            Literal::Bytes(_) => "bytes",
            Literal::I8(_) => "i8",
            Literal::I16(_) => "i16",
            Literal::I32(_) => "i32",
            Literal::I64(_) => "i64",
            Literal::Isize(_) => "isize",
            Literal::F32(_) => "f32",
            Literal::F64(_) => "f64",
            Literal::Bool(_) => "bool",
        }
    }

    /// Compare the raw bytes found at `path` against this literal.
    #[must_use]
    pub fn compare(&self, path: &str, actual: &[u8]) -> Outcome {
        let text = String::from_utf8_lossy(actual);

        match self {
            Literal::Str(expected) => compare_text(path, expected.as_bytes(), actual, self),
            Literal::Bytes(expected) => compare_text(path, expected, actual, self),
            Literal::I8(expected) => compare_parsed(path, &text, *expected, self),
            Literal::I16(expected) => compare_parsed(path, &text, *expected, self),
            Literal::I32(expected) => compare_parsed(path, &text, *expected, self),
            Literal::I64(expected) => compare_parsed(path, &text, *expected, self),
            Literal::Isize(expected) => compare_parsed(path, &text, *expected, self),
            Literal::F32(expected) => compare_parsed(path, &text, *expected, self),
            Literal::F64(expected) => compare_parsed(path, &text, *expected, self),
            Literal::Bool(expected) => compare_bool(path, &text, *expected),
        }
    }
}

fn compare_text(path: &str, expected: &[u8], actual: &[u8], literal: &Literal) -> Outcome {
    if expected == actual {
        Outcome::pass(format!("json path {path} is {literal}"))
    } else {
        Outcome::fail(Failure::ValueMismatch {
            path: path.to_string(),
            expected: literal.to_string(),
            actual: String::from_utf8_lossy(actual).into_owned(),
        })
    }
}

fn compare_parsed<T>(path: &str, text: &str, expected: T, literal: &Literal) -> Outcome
where
    T: FromStr + PartialEq,
{
    match text.parse::<T>() {
        Ok(actual) if actual == expected => Outcome::pass(format!("json path {path} is {literal}")),
        Ok(_) => Outcome::fail(Failure::ValueMismatch {
            path: path.to_string(),
            expected: literal.to_string(),
            actual: text.to_string(),
        }),
        Err(_) => Outcome::fail(Failure::TypeMismatch {
            path: path.to_string(),
            expected_type: literal.type_name(),
            actual: text.to_string(),
        }),
    }
}

fn compare_bool(path: &str, text: &str, expected: bool) -> Outcome {
    let truthy = TRUTHY.iter().any(|t| text.eq_ignore_ascii_case(t));

    if truthy == expected {
        Outcome::pass(format!("json path {path} is {expected}"))
    } else {
        let wanted = if expected {
            "[true|True|1|on]"
        } else {
            "[false|False|0|off]"
        };
        Outcome::fail(Failure::ValueMismatch {
            path: path.to_string(),
            expected: wanted.to_string(),
            actual: text.to_string(),
        })
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Str(v) => f.write_str(v),
            Literal::Bytes(v) => f.write_str(&String::from_utf8_lossy(v)),
            Literal::I8(v) => write!(f, "{v}"),
            Literal::I16(v) => write!(f, "{v}"),
            Literal::I32(v) => write!(f, "{v}"),
            Literal::I64(v) => write!(f, "{v}"),
            Literal::Isize(v) => write!(f, "{v}"),
            Literal::F32(v) => write!(f, "{v:.5}"),
            Literal::F64(v) => write!(f, "{v:.5}"),
            Literal::Bool(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::Str(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::Str(value)
    }
}

impl From<&String> for Literal {
    fn from(value: &String) -> Self {
        Literal::Str(value.clone())
    }
}

impl From<&[u8]> for Literal {
    fn from(value: &[u8]) -> Self {
        Literal::Bytes(value.to_vec())
    }
}

impl From<Vec<u8>> for Literal {
    fn from(value: Vec<u8>) -> Self {
        Literal::Bytes(value)
    }
}

impl From<i8> for Literal {
    fn from(value: i8) -> Self {
        Literal::I8(value)
    }
}

impl From<i16> for Literal {
    fn from(value: i16) -> Self {
        Literal::I16(value)
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Literal::I32(value)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::I64(value)
    }
}

impl From<isize> for Literal {
    fn from(value: isize) -> Self {
        Literal::Isize(value)
    }
}

impl From<f32> for Literal {
    fn from(value: f32) -> Self {
        Literal::F32(value)
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::F64(value)
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Bool(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jsonpath::FailureKind;

    #[test]
    fn strings_compare_raw_text() {
        assert!(Literal::from("alice").compare("p", b"alice").passed);
        assert!(!Literal::from("Alice").compare("p", b"alice").passed);
        assert!(Literal::from(r#"a\"b"#).compare("p", br#"a\"b"#).passed);
        assert!(!Literal::from(r#"a"b"#).compare("p", br#"a\"b"#).passed);
    }

    #[test]
    fn bytes_compare_raw_text() {
        assert!(Literal::from(b"USA".to_vec()).compare("p", b"USA").passed);
        assert!(Literal::from(&b"USA"[..]).compare("p", b"USA").passed);
    }

    #[test]
    fn integers_parse_at_their_width() {
        assert!(Literal::from(3i32).compare("p", b"3").passed);
        assert!(Literal::from(-7i64).compare("p", b"-7").passed);

        let overflow = Literal::from(1i8).compare("p", b"300");
        assert_eq!(overflow.kind(), Some(FailureKind::TypeMismatch));

        let unequal = Literal::from(4i16).compare("p", b"3");
        assert_eq!(unequal.kind(), Some(FailureKind::ValueMismatch));

        let text = Literal::from(4isize).compare("p", b"four");
        assert_eq!(text.kind(), Some(FailureKind::TypeMismatch));
    }

    #[test]
    fn floats_parse_at_their_width() {
        assert!(Literal::from(1.5f64).compare("p", b"1.5").passed);
        assert!(Literal::from(0.1f32).compare("p", b"0.1").passed);
        assert_eq!(
            Literal::from(1.5f64).compare("p", b"1.25").kind(),
            Some(FailureKind::ValueMismatch)
        );
        assert_eq!(
            Literal::from(1.5f64).compare("p", b"null").kind(),
            Some(FailureKind::TypeMismatch)
        );
    }

    #[test]
    fn booleans_are_lenient() {
        for text in ["true", "True", "1", "on", "TRUE", "On"] {
            assert!(Literal::from(true).compare("p", text.as_bytes()).passed, "{text}");
            assert!(!Literal::from(false).compare("p", text.as_bytes()).passed, "{text}");
        }
        for text in ["false", "0", "off", "yes", ""] {
            assert!(Literal::from(false).compare("p", text.as_bytes()).passed, "{text}");
            assert!(!Literal::from(true).compare("p", text.as_bytes()).passed, "{text}");
        }
    }

    #[test]
    fn mismatch_message_names_path_and_values() {
        let outcome = Literal::from(4i32).compare("user.age", b"3");
        assert!(outcome.message.contains("user.age"));
        assert!(outcome.message.contains('4'));
        assert!(outcome.message.contains('3'));
    }
}

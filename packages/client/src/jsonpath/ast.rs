//! Dotted path expressions
//!
//! A path such as `addresses.1.name` is split on `.`; every segment is either
//! an object key or an array index. Classification is syntactic: a segment made
//! only of ASCII digits that fits a non-negative `i32` is an index, even when
//! the object being walked has a key spelled the same way.

use std::fmt;

/// Individual path segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonSelector<'p> {
    /// Child property access
    Child {
        /// Name of the child property to access
        name: &'p str,
    },

    /// Array element access by zero-based position
    Index {
        /// Array index value
        index: usize,
    },
}

impl<'p> JsonSelector<'p> {
    /// Classify a single segment.
    #[must_use]
    pub fn parse(segment: &'p str) -> Self {
        if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
            if let Some(index) = segment
                .parse::<i32>()
                .ok()
                .and_then(|n| usize::try_from(n).ok())
            {
                return JsonSelector::Index { index };
            }
        }

        JsonSelector::Child { name: segment }
    }
}

impl fmt::Display for JsonSelector<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonSelector::Child { name } => f.write_str(name),
            JsonSelector::Index { index } => write!(f, "{index}"),
        }
    }
}

/// An ordered sequence of selectors borrowed from the path string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonPath<'p> {
    raw: &'p str,
    selectors: Vec<JsonSelector<'p>>,
}

impl<'p> JsonPath<'p> {
    /// Split `path` on `.` and classify every segment.
    ///
    /// The empty path has no selectors and addresses the document root.
    #[must_use]
    pub fn parse(path: &'p str) -> Self {
        let selectors = if path.is_empty() {
            Vec::new()
        } else {
            path.split('.').map(JsonSelector::parse).collect()
        };

        Self {
            raw: path,
            selectors,
        }
    }

    #[must_use]
    pub fn selectors(&self) -> &[JsonSelector<'p>] {
        &self.selectors
    }

    #[must_use]
    pub fn as_str(&self) -> &'p str {
        self.raw
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.selectors.is_empty()
    }
}

impl fmt::Display for JsonPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_become_indices() {
        assert_eq!(JsonSelector::parse("0"), JsonSelector::Index { index: 0 });
        assert_eq!(JsonSelector::parse("17"), JsonSelector::Index { index: 17 });
        assert_eq!(
            JsonSelector::parse("2147483647"),
            JsonSelector::Index { index: 2_147_483_647 }
        );
    }

    #[test]
    fn non_numeric_and_out_of_range_segments_are_keys() {
        for segment in ["name", "-1", "+1", "1e3", "2147483648", "", " 1"] {
            assert_eq!(
                JsonSelector::parse(segment),
                JsonSelector::Child { name: segment },
                "segment {segment:?}"
            );
        }
    }

    #[test]
    fn path_splits_on_dots() {
        let path = JsonPath::parse("addresses.1.name");
        assert_eq!(
            path.selectors(),
            &[
                JsonSelector::Child { name: "addresses" },
                JsonSelector::Index { index: 1 },
                JsonSelector::Child { name: "name" },
            ]
        );
        assert_eq!(path.to_string(), "addresses.1.name");
    }

    #[test]
    fn empty_path_is_root() {
        assert!(JsonPath::parse("").is_root());
        assert!(!JsonPath::parse(".").is_root());
    }
}

//! Results of JSON path assertions

/// Why a JSON path assertion failed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Failure {
    #[error("Expected json path {path} with {expected}, but the path was not found")]
    PathNotFound { path: String, expected: String },

    #[error("Expected json path {path} as {expected_type}, but got {actual}")]
    TypeMismatch {
        path: String,
        expected_type: &'static str,
        actual: String,
    },

    #[error("Expected json path {path} with {expected}, but got {actual}")]
    ValueMismatch {
        path: String,
        expected: String,
        actual: String,
    },

    #[error("Expected json path {path} to be absent, but got {actual}")]
    UnexpectedValue { path: String, actual: String },
}

/// Discriminant of [`Failure`] for matching without the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    PathNotFound,
    TypeMismatch,
    ValueMismatch,
    UnexpectedValue,
}

impl Failure {
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Failure::PathNotFound { .. } => FailureKind::PathNotFound,
            Failure::TypeMismatch { .. } => FailureKind::TypeMismatch,
            Failure::ValueMismatch { .. } => FailureKind::ValueMismatch,
            Failure::UnexpectedValue { .. } => FailureKind::UnexpectedValue,
        }
    }
}

/// Pass/fail result of an assertion, with a human-readable message.
///
/// Assertions never panic; the caller decides what a failed outcome means.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub passed: bool,
    pub message: String,
    failure: Option<Failure>,
}

impl Outcome {
    #[must_use]
    pub fn pass(message: impl Into<String>) -> Self {
        Self {
            passed: true,
            message: message.into(),
            failure: None,
        }
    }

    #[must_use]
    pub fn fail(failure: Failure) -> Self {
        Self {
            passed: false,
            message: failure.to_string(),
            failure: Some(failure),
        }
    }

    #[must_use]
    pub fn failure(&self) -> Option<&Failure> {
        self.failure.as_ref()
    }

    #[must_use]
    pub fn kind(&self) -> Option<FailureKind> {
        self.failure.as_ref().map(Failure::kind)
    }

    /// Convert into a `Result`, keeping the failure as the error.
    ///
    /// # Errors
    ///
    /// Returns the [`Failure`] when the outcome did not pass.
    pub fn into_result(self) -> Result<(), Failure> {
        match self.failure {
            Some(failure) => Err(failure),
            None => Ok(()),
        }
    }
}

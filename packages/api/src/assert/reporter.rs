//! Sinks for assertion failures

use std::sync::Mutex;

/// Receives assertion failures and diagnostics.
pub trait Reporter {
    /// Record a failed assertion.
    fn fail(&self, message: &str);

    /// Record a diagnostic line; ignored unless the reporter keeps them.
    fn log(&self, message: &str) {
        let _ = message;
    }
}

impl<F: Fn(&str)> Reporter for F {
    fn fail(&self, message: &str) {
        self(message);
    }
}

/// Fails the current test at the first failed assertion.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanicReporter;

impl Reporter for PanicReporter {
    fn fail(&self, message: &str) {
        panic!("{message}");
    }

    fn log(&self, message: &str) {
        log::info!("{message}");
    }
}

/// Collects failures so a test can check everything before failing.
///
/// ```
/// use httpcheck::{Recorder, Reporter};
///
/// let recorder = Recorder::new();
/// recorder.fail("first");
/// recorder.fail("second");
/// assert_eq!(recorder.failures(), vec!["first", "second"]);
/// ```
#[derive(Debug, Default)]
pub struct Recorder {
    failures: Mutex<Vec<String>>,
    logs: Mutex<Vec<String>>,
}

impl Recorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn failures(&self) -> Vec<String> {
        self.failures
            .lock()
            .map(|failures| failures.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn logs(&self) -> Vec<String> {
        self.logs.lock().map(|logs| logs.clone()).unwrap_or_default()
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures().is_empty()
    }

    /// Panic with every recorded failure, if there is any.
    ///
    /// # Panics
    ///
    /// When at least one failure was recorded.
    pub fn finish(self) {
        let failures = self.failures();
        if !failures.is_empty() {
            panic!(
                "{} assertion(s) failed:\n  {}",
                failures.len(),
                failures.join("\n  ")
            );
        }
    }
}

impl Reporter for Recorder {
    fn fail(&self, message: &str) {
        if let Ok(mut failures) = self.failures.lock() {
            failures.push(message.to_string());
        }
    }

    fn log(&self, message: &str) {
        if let Ok(mut logs) = self.logs.lock() {
            logs.push(message.to_string());
        }
    }
}

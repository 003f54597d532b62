//! Failure reporting used by mocks.
//!
//! A [`Reporter`] is the test framework side of a mock: mocks call it when an
//! expectation is violated. The controller hands it out but never calls it
//! on its own behalf.

use crate::lock;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::thread;
use tracing::warn;

/// Failure sink supplied by the test framework.
pub trait Reporter: Send + Sync {
    /// Record a failure and abort the current test immediately.
    fn fatal(&self, message: &str) -> !;

    /// Formatted variant of [`Reporter::fatal`].
    fn fatal_fmt(&self, args: fmt::Arguments<'_>) -> ! {
        self.fatal(&args.to_string())
    }

    /// Record a failure and keep going.
    fn error(&self, message: &str);
}

impl<R: Reporter + ?Sized> Reporter for Arc<R> {
    fn fatal(&self, message: &str) -> ! {
        (**self).fatal(message)
    }

    fn fatal_fmt(&self, args: fmt::Arguments<'_>) -> ! {
        (**self).fatal_fmt(args)
    }

    fn error(&self, message: &str) {
        (**self).error(message)
    }
}

/// Reporter for plain `#[test]` functions.
///
/// `fatal` panics straight away. `error` only records the message; the test
/// fails when the reporter is dropped with errors pending.
#[derive(Debug, Default)]
pub struct PanicReporter {
    errors: Mutex<Vec<String>>,
}

impl PanicReporter {
    /// Create a reporter with no recorded errors
    pub fn new() -> Self {
        Self::default()
    }

    /// Errors recorded so far
    pub fn errors(&self) -> Vec<String> {
        lock(&self.errors).clone()
    }
}

impl Reporter for PanicReporter {
    fn fatal(&self, message: &str) -> ! {
        panic!("{message}")
    }

    fn error(&self, message: &str) {
        warn!(error = message, "mock reported an error");
        lock(&self.errors).push(message.to_string());
    }
}

impl Drop for PanicReporter {
    fn drop(&mut self) {
        // A second panic while unwinding would abort the test binary.
        if thread::panicking() {
            return;
        }
        let errors = std::mem::take(
            self.errors
                .get_mut()
                .unwrap_or_else(std::sync::PoisonError::into_inner),
        );
        if !errors.is_empty() {
            panic!("{} error(s) reported:\n{}", errors.len(), errors.join("\n"));
        }
    }
}

/// Panic payload raised by [`RecordingReporter::fatal`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FatalReport(pub String);

impl fmt::Display for FatalReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fatal: {}", self.0)
    }
}

/// Reporter that keeps every message for later inspection.
///
/// Intended for testing mock implementations themselves. `fatal` records the
/// message and unwinds with a [`FatalReport`] payload, which can be observed
/// with `std::panic::catch_unwind`.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    fatals: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
}

impl RecordingReporter {
    /// Create an empty recording reporter
    pub fn new() -> Self {
        Self::default()
    }

    /// Fatal messages in report order
    pub fn fatals(&self) -> Vec<String> {
        lock(&self.fatals).clone()
    }

    /// Non-fatal messages in report order
    pub fn errors(&self) -> Vec<String> {
        lock(&self.errors).clone()
    }

    /// True when nothing has been reported
    pub fn is_clean(&self) -> bool {
        lock(&self.fatals).is_empty() && lock(&self.errors).is_empty()
    }
}

impl Reporter for RecordingReporter {
    fn fatal(&self, message: &str) -> ! {
        lock(&self.fatals).push(message.to_string());
        std::panic::panic_any(FatalReport(message.to_string()))
    }

    fn error(&self, message: &str) {
        lock(&self.errors).push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    #[rstest]
    #[should_panic(expected = "expectation failed")]
    fn test_panic_reporter_fatal_panics() {
        let reporter = PanicReporter::new();
        reporter.fatal("expectation failed");
    }

    #[rstest]
    #[should_panic(expected = "called 2 times, expected 3")]
    fn test_panic_reporter_fatal_fmt() {
        let reporter = PanicReporter::new();
        reporter.fatal_fmt(format_args!("called {} times, expected {}", 2, 3));
    }

    #[rstest]
    fn test_panic_reporter_error_is_recorded() {
        let reporter = PanicReporter::new();
        reporter.error("first");
        reporter.error("second");
        assert_eq!(reporter.errors(), vec!["first", "second"]);
        // Dropping with pending errors would fail this test.
        std::mem::forget(reporter);
    }

    #[rstest]
    #[should_panic(expected = "1 error(s) reported")]
    fn test_panic_reporter_drop_fails_on_errors() {
        let reporter = PanicReporter::new();
        reporter.error("unexpected call");
        drop(reporter);
    }

    #[rstest]
    fn test_panic_reporter_drop_while_panicking_keeps_original_panic() {
        let result = catch_unwind(|| {
            let reporter = PanicReporter::new();
            reporter.error("recorded before failure");
            panic!("test body failed");
        });

        let payload = result.unwrap_err();
        assert_eq!(payload.downcast_ref::<&str>(), Some(&"test body failed"));
    }

    #[rstest]
    fn test_panic_reporter_drop_without_errors() {
        let reporter = PanicReporter::new();
        drop(reporter);
    }

    #[rstest]
    fn test_recording_reporter_fatal_payload() {
        let reporter = RecordingReporter::new();
        let result = catch_unwind(AssertUnwindSafe(|| reporter.fatal("boom")));
        let payload = result.unwrap_err();
        let report = payload.downcast_ref::<FatalReport>().unwrap();
        assert_eq!(report, &FatalReport("boom".to_string()));
        assert_eq!(reporter.fatals(), vec!["boom"]);
        assert!(reporter.errors().is_empty());
    }

    #[rstest]
    fn test_recording_reporter_errors_in_order() {
        let reporter = RecordingReporter::new();
        assert!(reporter.is_clean());
        reporter.error("a");
        reporter.error("b");
        assert_eq!(reporter.errors(), vec!["a", "b"]);
        assert!(!reporter.is_clean());
    }

    #[rstest]
    fn test_shared_reporter_delegates() {
        let reporter = Arc::new(RecordingReporter::new());
        let shared: Arc<dyn Reporter> = reporter.clone();
        shared.error("through arc");
        let result = catch_unwind(AssertUnwindSafe(|| {
            shared.fatal_fmt(format_args!("missing {}", "call"))
        }));
        assert!(result.is_err());
        assert_eq!(reporter.errors(), vec!["through arc"]);
        assert_eq!(reporter.fatals(), vec!["missing call"]);
    }

    #[rstest]
    fn test_fatal_report_display() {
        let report = FatalReport("not satisfied".to_string());
        assert_eq!(report.to_string(), "fatal: not satisfied");
    }
}

//! Contract implemented by every mock registered with a controller.

use std::time::Duration;

/// A mock that can verify its own expectations.
///
/// Implementations report failures through the [`Reporter`](crate::Reporter)
/// they were built with. The controller only decides when these methods run.
///
/// # Example
/// ```ignore
/// struct StringerMock {
///     reporter: Arc<dyn Reporter>,
///     calls: AtomicUsize,
/// }
///
/// impl Mocker for StringerMock {
///     fn finish(&self) {
///         if self.calls.load(Ordering::SeqCst) == 0 {
///             self.reporter.fatal("expected call to StringerMock.string");
///         }
///     }
///
///     fn wait(&self, timeout: Duration) -> bool {
///         // poll until called or timed out
///     }
/// }
/// ```
pub trait Mocker: Send + Sync {
    /// Check that every expectation was met.
    fn finish(&self);

    /// Block for at most `timeout` until asynchronous expectations are met.
    ///
    /// Returns `true` when the mock ended up satisfied. Reporting a timeout is
    /// up to the implementation.
    fn wait(&self, timeout: Duration) -> bool;
}

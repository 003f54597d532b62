//! Core library for minimock.
//!
//! A [`Controller`] collects every mock created during a test and drives
//! their verification at teardown:
//!
//! ```ignore
//! let controller = Controller::new(PanicReporter::new());
//! let stringer = StringerMock::new(&controller);
//! // ... exercise the code under test ...
//! controller.wait(Duration::from_millis(100));
//! controller.finish();
//! ```
//!
//! # Features
//!
//! - `tokio`: adds `Controller::wait_async`, which runs the mock waits on
//!   tokio's blocking pool. Its tests only build with this feature, so run
//!   `cargo test --features tokio` to cover the async path.

pub mod config;
pub mod mocks;
pub mod reporter;

pub use config::controller::ControllerConfig;
pub use config::error::ConfigError;
pub use mocks::controller::{Controller, MockController};
pub use mocks::mocker::Mocker;
pub use reporter::{FatalReport, PanicReporter, RecordingReporter, Reporter};

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Acquire a lock, recovering the guard if a previous holder panicked.
///
/// Every mutex in this crate guards append-only data, so a panic mid-section
/// cannot leave it torn.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

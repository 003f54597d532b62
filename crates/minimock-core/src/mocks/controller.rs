//! Mocks controller for registering mocks and verifying them together.
//!
//! `Controller` holds every mock created for a test. Mock constructors register
//! themselves through [`MockController`]; test teardown calls
//! [`Controller::wait`] and [`Controller::finish`] once instead of tracking each
//! mock by hand.

use crate::config::controller::ControllerConfig;
use crate::lock;
use crate::mocks::mocker::Mocker;
use crate::reporter::Reporter;
use std::fmt;
use std::panic;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tracing::{debug, trace};

/// What a mock constructor needs from a controller.
///
/// The reporter methods delegate to the test framework reporter, so a mock
/// may use its controller directly as its failure sink.
pub trait MockController: Reporter {
    /// Shared handle to the reporter mocks should keep
    fn reporter(&self) -> Arc<dyn Reporter>;

    /// Add a mock to the set verified at teardown
    fn register_mocker(&self, mocker: Arc<dyn Mocker>);
}

/// Registry of the mocks created during one test.
///
/// Registered mocks are never removed. All access to the list goes through a
/// single mutex.
pub struct Controller {
    /// Test framework reporter handed out to mocks
    reporter: Arc<dyn Reporter>,
    /// Registered mocks in registration order
    mockers: Mutex<Vec<Arc<dyn Mocker>>>,
    config: ControllerConfig,
}

impl Controller {
    /// Create a controller with default settings
    pub fn new<R: Reporter + 'static>(reporter: R) -> Self {
        Self::with_config(reporter, ControllerConfig::default())
    }

    /// Create a controller with explicit settings
    pub fn with_config<R: Reporter + 'static>(reporter: R, config: ControllerConfig) -> Self {
        Self {
            reporter: Arc::new(reporter),
            mockers: Mutex::new(Vec::new()),
            config,
        }
    }

    /// Controller settings
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Append a mock to the registry.
    ///
    /// Safe to call from several threads at once. Must not be called from
    /// inside a mock's `finish`, which runs with the registry locked.
    pub fn register_mocker(&self, mocker: Arc<dyn Mocker>) {
        let mut mockers = lock(&self.mockers);
        mockers.push(mocker);
        trace!(registered = mockers.len(), "Registered mocker");
    }

    /// Number of registered mocks
    pub fn len(&self) -> usize {
        lock(&self.mockers).len()
    }

    /// True when no mock has been registered
    pub fn is_empty(&self) -> bool {
        lock(&self.mockers).is_empty()
    }

    /// Registered mocks in registration order
    pub fn mockers(&self) -> Vec<Arc<dyn Mocker>> {
        lock(&self.mockers).clone()
    }

    /// Verify every registered mock, in registration order.
    ///
    /// The registry stays locked for the whole pass. Failures are reported by
    /// the mocks themselves; a fatal report unwinds out of this call and the
    /// remaining mocks are not verified.
    pub fn finish(&self) {
        let mockers = lock(&self.mockers);
        debug!(mockers = mockers.len(), "Finishing mockers");
        for mocker in mockers.iter() {
            mocker.finish();
        }
    }

    /// Wait for every registered mock in parallel, at most `timeout` each.
    ///
    /// The registry is copied under the lock and released before any mock is
    /// waited on, so registration stays possible meanwhile. Mocks registered
    /// after the copy are not waited on. Returns once every wait has returned.
    /// A panic from a mock is resumed after all other waits have finished.
    pub fn wait(&self, timeout: Duration) {
        let mockers = self.mockers();
        if mockers.is_empty() {
            return;
        }
        debug!(mockers = mockers.len(), ?timeout, "Waiting for mockers");

        let results = thread::scope(|scope| {
            let handles: Vec<_> = mockers
                .iter()
                .map(|mocker| scope.spawn(move || mocker.wait(timeout)))
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join())
                .collect::<Vec<_>>()
        });

        settle(mockers.len(), results);
    }

    /// [`Controller::wait`] with the configured timeout
    pub fn wait_default(&self) {
        self.wait(self.config.wait_timeout());
    }

    /// Async counterpart of [`Controller::wait`].
    ///
    /// Each mock waits on tokio's blocking pool, so the calling runtime keeps
    /// making progress. Must be polled inside a tokio runtime.
    ///
    /// Every wait is joined when the returned future runs to completion.
    /// Blocking tasks cannot be aborted, so dropping the future early (for
    /// example under `tokio::time::timeout`) leaves the pending mock waits
    /// running on the blocking pool until their own timeout elapses.
    #[cfg(feature = "tokio")]
    pub async fn wait_async(&self, timeout: Duration) {
        let mockers = self.mockers();
        if mockers.is_empty() {
            return;
        }
        debug!(mockers = mockers.len(), ?timeout, "Waiting for mockers");

        let total = mockers.len();
        let mut tasks = tokio::task::JoinSet::new();
        for mocker in mockers {
            tasks.spawn_blocking(move || mocker.wait(timeout));
        }

        let mut results = Vec::with_capacity(total);
        while let Some(joined) = tasks.join_next().await {
            results.push(joined.map_err(|err| {
                if err.is_panic() {
                    err.into_panic()
                } else {
                    Box::new(err.to_string()) as Box<dyn std::any::Any + Send>
                }
            }));
        }

        settle(total, results);
    }
}

/// Log the wait outcome and resume the first mock panic, if any.
fn settle(total: usize, results: Vec<thread::Result<bool>>) {
    let mut unsatisfied = 0;
    let mut first_panic = None;
    for result in results {
        match result {
            Ok(true) => {}
            Ok(false) => unsatisfied += 1,
            Err(payload) => {
                first_panic.get_or_insert(payload);
            }
        }
    }
    debug!(mockers = total, unsatisfied, "Finished waiting for mockers");

    if let Some(payload) = first_panic {
        panic::resume_unwind(payload);
    }
}

impl Reporter for Controller {
    fn fatal(&self, message: &str) -> ! {
        self.reporter.fatal(message)
    }

    fn fatal_fmt(&self, args: fmt::Arguments<'_>) -> ! {
        self.reporter.fatal_fmt(args)
    }

    fn error(&self, message: &str) {
        self.reporter.error(message)
    }
}

impl MockController for Controller {
    fn reporter(&self) -> Arc<dyn Reporter> {
        Arc::clone(&self.reporter)
    }

    fn register_mocker(&self, mocker: Arc<dyn Mocker>) {
        Controller::register_mocker(self, mocker)
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        // Finishing while unwinding would turn one failure into an abort.
        if self.config.finish_on_drop && !thread::panicking() {
            self.finish();
        }
    }
}

impl fmt::Debug for Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("mockers", &self.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

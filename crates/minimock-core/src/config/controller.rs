//! Controller settings.

use crate::config::error::ConfigError;
use crate::config::parser;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_WAIT_TIMEOUT_MS: u64 = 10_000;

/// Settings for a [`Controller`](crate::Controller).
///
/// Missing fields fall back to their defaults when deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Timeout used by `Controller::wait_default`, in milliseconds
    pub wait_timeout_ms: u64,
    /// Run `finish` when the controller is dropped
    pub finish_on_drop: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            wait_timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            finish_on_drop: false,
        }
    }
}

impl ControllerConfig {
    /// Create config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from a `.json`, `.yaml` or `.yml` file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        parser::load_config(path)
    }

    /// Set the default wait timeout
    pub fn with_wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Enable or disable finishing on drop
    pub fn with_finish_on_drop(mut self, finish_on_drop: bool) -> Self {
        self.finish_on_drop = finish_on_drop;
        self
    }

    /// Default wait timeout as a `Duration`
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_millis(self.wait_timeout_ms)
    }
}

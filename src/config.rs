use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default time budget for one top-level delete call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// Pause between two failed top-level attempts
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_millis(50);
/// Pause before the single retry after a sharing violation
pub const DEFAULT_REMEDIATION_PAUSE: Duration = Duration::from_millis(1);

/// Tuning for a delete call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeleteOptions {
	/// Total time budget, measured from the start of the call
	pub timeout: Duration,
	/// Pause between failed attempts
	pub retry_interval: Duration,
	/// Pause before re-trying a file or directory that was briefly held open
	pub remediation_pause: Duration,
}

impl Default for DeleteOptions {
	fn default() -> Self {
		Self {
			timeout: DEFAULT_TIMEOUT,
			retry_interval: DEFAULT_RETRY_INTERVAL,
			remediation_pause: DEFAULT_REMEDIATION_PAUSE,
		}
	}
}

impl DeleteOptions {
	/// Default options with a custom timeout
	pub fn with_timeout(timeout: Duration) -> Self {
		Self { timeout, ..Default::default() }
	}
}

/// A builder for delete options
#[derive(Debug)]
pub struct DeleteOptionsBuilder {
	options: DeleteOptions,
}

impl DeleteOptionsBuilder {
	pub fn new() -> Self {
		Self { options: DeleteOptions::default() }
	}

	/// Set the total time budget
	pub fn timeout(mut self, timeout: Duration) -> Self {
		self.options.timeout = timeout;
		self
	}

	/// Set the pause between failed attempts
	pub fn retry_interval(mut self, interval: Duration) -> Self {
		self.options.retry_interval = interval;
		self
	}

	/// Set the pause used by the sharing-violation remediation
	pub fn remediation_pause(mut self, pause: Duration) -> Self {
		self.options.remediation_pause = pause;
		self
	}

	pub fn build(self) -> DeleteOptions {
		self.options
	}
}

impl Default for DeleteOptionsBuilder {
	fn default() -> Self {
		Self::new()
	}
}

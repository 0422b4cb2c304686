//! Bounded retry driver
//!
//! Repeats single delete attempts until one succeeds or the time budget is
//! spent. The blocking and async entry points share one decision core,
//! [`RetryLoop`], and differ only in how they wait between attempts.

use crate::config::DeleteOptions;
use crate::error::{DeleteError, Result};
use crate::remove::remove_once;
use std::future::Future;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

/// What to do after an attempt
#[derive(Debug)]
pub(crate) enum Step {
	/// Stop and hand this result to the caller
	Finish(Result<()>),
	/// Wait this long, then attempt again
	Pause(Duration),
}

/// Deadline bookkeeping for one top-level call
///
/// The deadline is fixed on the monotonic clock when the call starts and is
/// never extended. An attempt that fails once the deadline has passed is the
/// last one and its error is returned; earlier failures are dropped.
#[derive(Debug)]
pub(crate) struct RetryLoop {
	started: Instant,
	deadline: Instant,
	interval: Duration,
	attempts: u32,
}

impl RetryLoop {
	pub fn start(options: &DeleteOptions) -> Result<Self> {
		let started = Instant::now();
		let deadline = started
			.checked_add(options.timeout)
			.ok_or(DeleteError::InvalidTimeout { timeout: options.timeout })?;

		Ok(Self { started, deadline, interval: options.retry_interval, attempts: 0 })
	}

	/// Whether the first attempt may start at all
	///
	/// Only false for a budget that is already spent, such as a zero timeout.
	/// Such a call makes no attempt and reports success.
	pub fn has_time(&self) -> bool {
		Instant::now() < self.deadline
	}

	/// Decide what follows an attempt with the given outcome
	pub fn settle(&mut self, outcome: Result<()>) -> Step {
		self.attempts += 1;

		let err = match outcome {
			Ok(()) => {
				if self.attempts > 1 {
					debug!(
						"Delete succeeded after {} attempts in {:?}",
						self.attempts,
						self.started.elapsed()
					);
				}
				return Step::Finish(Ok(()));
			}
			Err(err) => err,
		};

		if !err.is_retryable() {
			debug!("Delete failed with non-retryable error: {}", err);
			return Step::Finish(Err(err));
		}

		if Instant::now() > self.deadline {
			warn!(
				"Delete failed after {} attempts over {:?}, giving up: {}",
				self.attempts,
				self.started.elapsed(),
				err
			);
			return Step::Finish(Err(err));
		}

		trace!(
			"Delete attempt {} failed ({}), retrying in {:?}",
			self.attempts,
			err.category(),
			self.interval
		);
		Step::Pause(self.interval)
	}

	#[cfg(test)]
	fn attempts(&self) -> u32 {
		self.attempts
	}
}

/// Drive `attempt` to completion, sleeping the calling thread between tries
pub(crate) fn run_blocking<F>(options: &DeleteOptions, mut attempt: F) -> Result<()>
where F: FnMut() -> Result<()> {
	let mut retry = RetryLoop::start(options)?;
	if !retry.has_time() {
		return Ok(());
	}

	loop {
		match retry.settle(attempt()) {
			Step::Finish(result) => return result,
			Step::Pause(delay) => std::thread::sleep(delay),
		}
	}
}

/// Drive `attempt` to completion, suspending the task between tries
pub(crate) async fn run_async<F, Fut>(options: &DeleteOptions, mut attempt: F) -> Result<()>
where
	F: FnMut() -> Fut,
	Fut: Future<Output = Result<()>>,
{
	let mut retry = RetryLoop::start(options)?;
	if !retry.has_time() {
		return Ok(());
	}

	loop {
		match retry.settle(attempt().await) {
			Step::Finish(result) => return result,
			Step::Pause(delay) => tokio::time::sleep(delay).await,
		}
	}
}

/// Delete a file or directory tree, retrying for up to ten seconds
pub fn delete(path: impl AsRef<Path>) -> Result<()> {
	delete_with_options(path, DeleteOptions::default())
}

/// Delete a file or directory tree, retrying until `timeout` has passed
pub fn delete_with_timeout(path: impl AsRef<Path>, timeout: Duration) -> Result<()> {
	delete_with_options(path, DeleteOptions::with_timeout(timeout))
}

/// Delete a file or directory tree with explicit tuning
///
/// Blocks the calling thread for the whole call, including the pauses
/// between attempts. A path that does not exist is a success.
pub fn delete_with_options(path: impl AsRef<Path>, options: DeleteOptions) -> Result<()> {
	let path = path.as_ref();
	run_blocking(&options, || remove_once(path, options.remediation_pause))
}

/// Async counterpart of [`delete`]
pub async fn delete_async(path: impl AsRef<Path>) -> Result<()> {
	delete_async_with_options(path, DeleteOptions::default()).await
}

/// Async counterpart of [`delete_with_timeout`]
pub async fn delete_async_with_timeout(path: impl AsRef<Path>, timeout: Duration) -> Result<()> {
	delete_async_with_options(path, DeleteOptions::with_timeout(timeout)).await
}

/// Async counterpart of [`delete_with_options`]
///
/// Each attempt runs on tokio's blocking pool and the pauses between
/// attempts are timer waits, so the calling task never blocks its worker
/// thread. Attempts still run one at a time. Requires a tokio runtime.
pub async fn delete_async_with_options(
	path: impl AsRef<Path>, options: DeleteOptions,
) -> Result<()> {
	let path = path.as_ref().to_path_buf();
	let pause = options.remediation_pause;

	run_async(&options, || {
		let path = path.clone();
		async move {
			let task_path = path.clone();
			tokio::task::spawn_blocking(move || remove_once(&task_path, pause))
				.await
				.unwrap_or_else(|err| Err(DeleteError::TaskFailed { path, reason: err.to_string() }))
		}
	})
	.await
}

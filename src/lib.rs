//! Forced deletion of files and directory trees under transient contention
//!
//! A delete is retried for a bounded time budget, and each attempt applies
//! one local remediation (clearing a read-only attribute, or waiting out a
//! brief lock) before giving up on that attempt.

mod config;
mod error;
pub mod remove;
mod retry;

pub use config::{
	DeleteOptions, DeleteOptionsBuilder, DEFAULT_REMEDIATION_PAUSE, DEFAULT_RETRY_INTERVAL,
	DEFAULT_TIMEOUT,
};
pub use error::{DeleteError, FailureKind, Result};
pub use retry::{
	delete, delete_async, delete_async_with_options, delete_async_with_timeout,
	delete_with_options, delete_with_timeout,
};

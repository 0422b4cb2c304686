use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// How a failed filesystem call should be remediated
///
/// The deletion strategies branch on this value rather than on the error
/// message, so every `io::Error` is classified exactly once, at the point it
/// is wrapped into a [`DeleteError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
	/// The entry (or its container) is read-only or otherwise not deletable by us
	AccessDenied,
	/// Another handle briefly holds the entry, or the tree changed underneath us
	SharingViolation,
	/// Anything without a local remediation
	Other,
}

impl FailureKind {
	/// Classify an I/O error by its kind and raw OS code
	pub fn classify(err: &io::Error) -> Self {
		if err.kind() == io::ErrorKind::PermissionDenied {
			return FailureKind::AccessDenied;
		}

		if matches!(err.kind(), io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock) {
			return FailureKind::SharingViolation;
		}

		match err.raw_os_error() {
			Some(code) if platform::is_sharing_violation(code) => FailureKind::SharingViolation,
			Some(code) if platform::is_access_denied(code) => FailureKind::AccessDenied,
			_ => FailureKind::Other,
		}
	}
}

impl std::fmt::Display for FailureKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			FailureKind::AccessDenied => write!(f, "access denied"),
			FailureKind::SharingViolation => write!(f, "sharing violation"),
			FailureKind::Other => write!(f, "other"),
		}
	}
}

/// True when an error means the path does not exist
///
/// A path running through a regular file (`file.txt/child`) is as absent
/// as a path that was never created. Only valid for calls that do not
/// require the path itself to be a directory; there `ENOTDIR` means the
/// entry changed kind, not that it is gone.
pub(crate) fn is_absent(err: &io::Error) -> bool {
	err.kind() == io::ErrorKind::NotFound
		|| err.raw_os_error().is_some_and(platform::is_not_a_directory)
}

#[cfg(unix)]
mod platform {
	use nix::errno::Errno;

	pub fn is_not_a_directory(code: i32) -> bool {
		code == Errno::ENOTDIR as i32
	}

	pub fn is_sharing_violation(code: i32) -> bool {
		// rmdir reports a directory that gained an entry as ENOTEMPTY or EEXIST
		[Errno::EBUSY, Errno::ETXTBSY, Errno::ENOTEMPTY, Errno::EEXIST]
			.iter()
			.any(|errno| *errno as i32 == code)
	}

	pub fn is_access_denied(code: i32) -> bool {
		code == Errno::EACCES as i32 || code == Errno::EPERM as i32
	}
}

#[cfg(windows)]
mod platform {
	const ERROR_ACCESS_DENIED: i32 = 5;
	const ERROR_SHARING_VIOLATION: i32 = 32;
	const ERROR_LOCK_VIOLATION: i32 = 33;
	const ERROR_DIR_NOT_EMPTY: i32 = 145;

	pub fn is_not_a_directory(_code: i32) -> bool {
		false
	}

	pub fn is_sharing_violation(code: i32) -> bool {
		matches!(code, ERROR_SHARING_VIOLATION | ERROR_LOCK_VIOLATION | ERROR_DIR_NOT_EMPTY)
	}

	pub fn is_access_denied(code: i32) -> bool {
		code == ERROR_ACCESS_DENIED
	}
}

#[cfg(not(any(unix, windows)))]
mod platform {
	pub fn is_not_a_directory(_code: i32) -> bool {
		false
	}

	pub fn is_sharing_violation(_code: i32) -> bool {
		false
	}

	pub fn is_access_denied(_code: i32) -> bool {
		false
	}
}

/// Errors surfaced by the deletion routines
///
/// Only the error of the final attempt made after the deadline ever reaches
/// the caller; failures of earlier attempts are absorbed by the retry loop.
#[derive(Error, Debug)]
pub enum DeleteError {
	#[error("Access denied: {operation} on {} - {source}", .path.display())]
	AccessDenied {
		operation: &'static str,
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	#[error("Sharing violation: {operation} on {} - {source}", .path.display())]
	SharingViolation {
		operation: &'static str,
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	#[error("Filesystem error: {operation} failed on {} - {source}", .path.display())]
	Filesystem {
		operation: &'static str,
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	#[error("Invalid timeout: {timeout:?} puts the deadline past the end of the clock")]
	InvalidTimeout { timeout: Duration },

	#[error("Delete task for {} failed: {reason}", .path.display())]
	TaskFailed { path: PathBuf, reason: String },
}

impl DeleteError {
	/// Wrap an I/O error, classifying it for remediation
	pub fn from_io(operation: &'static str, path: &Path, source: io::Error) -> Self {
		let path = path.to_path_buf();
		match FailureKind::classify(&source) {
			FailureKind::AccessDenied => DeleteError::AccessDenied { operation, path, source },
			FailureKind::SharingViolation => {
				DeleteError::SharingViolation { operation, path, source }
			}
			FailureKind::Other => DeleteError::Filesystem { operation, path, source },
		}
	}

	/// Remediation class of this error
	pub fn kind(&self) -> FailureKind {
		match self {
			DeleteError::AccessDenied { .. } => FailureKind::AccessDenied,
			DeleteError::SharingViolation { .. } => FailureKind::SharingViolation,
			DeleteError::Filesystem { .. }
			| DeleteError::InvalidTimeout { .. }
			| DeleteError::TaskFailed { .. } => FailureKind::Other,
		}
	}

	/// Whether the retry loop may try again after this error
	///
	/// Every filesystem failure is retried until the deadline, whatever its
	/// kind; only errors about the call itself are final.
	pub fn is_retryable(&self) -> bool {
		match self {
			DeleteError::AccessDenied { .. }
			| DeleteError::SharingViolation { .. }
			| DeleteError::Filesystem { .. } => true,
			DeleteError::InvalidTimeout { .. } | DeleteError::TaskFailed { .. } => false,
		}
	}

	/// True when the underlying error says the entry is already gone
	pub fn is_not_found(&self) -> bool {
		self.io_error().is_some_and(is_absent)
	}

	/// The path the failing operation was applied to, if any
	pub fn path(&self) -> Option<&Path> {
		match self {
			DeleteError::AccessDenied { path, .. }
			| DeleteError::SharingViolation { path, .. }
			| DeleteError::Filesystem { path, .. }
			| DeleteError::TaskFailed { path, .. } => Some(path),
			DeleteError::InvalidTimeout { .. } => None,
		}
	}

	/// The underlying I/O error, if this error wraps one
	pub fn io_error(&self) -> Option<&io::Error> {
		match self {
			DeleteError::AccessDenied { source, .. }
			| DeleteError::SharingViolation { source, .. }
			| DeleteError::Filesystem { source, .. } => Some(source),
			DeleteError::InvalidTimeout { .. } | DeleteError::TaskFailed { .. } => None,
		}
	}

	/// Get error category for logging
	pub fn category(&self) -> &'static str {
		match self {
			DeleteError::AccessDenied { .. } => "permission",
			DeleteError::SharingViolation { .. } => "sharing",
			DeleteError::Filesystem { .. } => "filesystem",
			DeleteError::InvalidTimeout { .. } => "configuration",
			DeleteError::TaskFailed { .. } => "task",
		}
	}
}

pub type Result<T> = std::result::Result<T, DeleteError>;

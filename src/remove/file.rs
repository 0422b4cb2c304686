use super::attributes::clear_readonly;
use crate::error::{is_absent, DeleteError, FailureKind, Result};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Delete a single file (or symbolic link), remediating once on failure
///
/// The first failure picks the remediation: access denied clears the
/// read-only attribute, a sharing violation waits `pause`. Either way the
/// file gets exactly one more delete, whose result is returned as is.
pub fn remove_file(path: &Path, pause: Duration) -> Result<()> {
	remove_file_with(path, pause, unlink)
}

/// [`remove_file`] over an arbitrary primitive delete
pub(crate) fn remove_file_with<F>(path: &Path, pause: Duration, mut delete: F) -> Result<()>
where F: FnMut(&Path) -> Result<()> {
	let err = match delete(path) {
		Ok(()) => return Ok(()),
		Err(err) => err,
	};

	match err.kind() {
		FailureKind::AccessDenied => {
			debug!("Delete of {:?} denied, clearing read-only attribute", path);
			clear_readonly(path)?;
			delete(path)
		}
		FailureKind::SharingViolation => {
			debug!("Delete of {:?} hit a sharing violation, retrying in {:?}", path, pause);
			std::thread::sleep(pause);
			delete(path)
		}
		FailureKind::Other => Err(err),
	}
}

fn unlink(path: &Path) -> Result<()> {
	match fs::remove_file(path) {
		Ok(()) => Ok(()),
		Err(err) if is_absent(&err) => Ok(()),
		Err(err) => Err(DeleteError::from_io("remove_file", path, err)),
	}
}

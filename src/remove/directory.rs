use super::attributes::clear_readonly;
use crate::error::{DeleteError, FailureKind, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, trace};

/// Delete a directory and everything beneath it, remediating once on failure
///
/// A failed tree delete is usually caused by a single poisoned entry
/// somewhere below. Before this level retries, the same routine runs on
/// every immediate subdirectory, so remediation happens bottom-up and the
/// offending entry is most likely gone by the time the parent tries again.
/// The descent runs whatever the failure kind; then:
///
/// - access denied: clear the read-only attribute of the files directly in
///   this directory and retry the tree delete once;
/// - sharing violation: wait `pause` and retry the tree delete once;
/// - anything else: return the original error.
pub fn remove_directory(path: &Path, pause: Duration) -> Result<()> {
	remove_directory_with(path, pause, &mut remove_tree)
}

/// [`remove_directory`] over an arbitrary primitive tree delete
pub(crate) fn remove_directory_with<F>(path: &Path, pause: Duration, delete: &mut F) -> Result<()>
where F: FnMut(&Path) -> Result<()> {
	let err = match delete(path) {
		Ok(()) => return Ok(()),
		Err(err) => err,
	};

	debug!("Tree delete of {:?} failed ({}), descending into subdirectories", path, err.kind());

	for subdirectory in subdirectories(path) {
		if let Err(sub_err) = remove_directory_with(&subdirectory, pause, delete) {
			trace!("Remediation of {:?} left it in place: {}", subdirectory, sub_err);
		}
	}

	match err.kind() {
		FailureKind::AccessDenied => {
			clear_level(path)?;
			delete(path)
		}
		FailureKind::SharingViolation => {
			debug!("Retrying tree delete of {:?} in {:?}", path, pause);
			std::thread::sleep(pause);
			delete(path)
		}
		FailureKind::Other => Err(err),
	}
}

/// Only a missing path counts as deleted here: `ENOTDIR` means the path is
/// now something other than a directory, and the next attempt must
/// reclassify it.
fn remove_tree(path: &Path) -> Result<()> {
	match fs::remove_dir_all(path) {
		Ok(()) => Ok(()),
		Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
		Err(err) => Err(DeleteError::from_io("remove_dir_all", path, err)),
	}
}

/// Immediate subdirectories, without following symbolic links
///
/// Best effort: an unreadable directory simply has no subdirectories to
/// remediate.
fn subdirectories(path: &Path) -> Vec<PathBuf> {
	let Ok(entries) = fs::read_dir(path) else {
		return Vec::new();
	};

	entries
		.flatten()
		.filter(|entry| entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false))
		.map(|entry| entry.path())
		.collect()
}

/// Clear read-only on the non-directory entries of this level only
///
/// Subdirectories were already handled by the descent. On Unix removal of
/// an entry is governed by its parent's write bit, so the directory itself
/// is cleared first.
fn clear_level(path: &Path) -> Result<()> {
	#[cfg(unix)]
	clear_readonly(path)?;

	let entries = match fs::read_dir(path) {
		Ok(entries) => entries,
		Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
		Err(err) => return Err(DeleteError::from_io("read_dir", path, err)),
	};

	for entry in entries {
		let entry = entry.map_err(|err| DeleteError::from_io("read_dir", path, err))?;
		let is_dir = entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false);
		if !is_dir {
			clear_readonly(&entry.path())?;
		}
	}

	Ok(())
}

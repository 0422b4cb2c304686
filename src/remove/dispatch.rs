use super::{directory, file};
use crate::error::{is_absent, DeleteError, Result};
use std::fs::{self, FileType};
use std::path::Path;
use std::time::Duration;

/// What a path currently points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
	Directory,
	/// A regular file, or any symbolic link that is not a Windows directory link
	File,
	Missing,
}

/// Classify a path by asking the filesystem right now, without following links
///
/// The answer can be stale by the time it is acted on; the retry loop
/// absorbs whatever that race produces.
pub fn classify(path: &Path) -> Result<PathKind> {
	match fs::symlink_metadata(path) {
		Ok(metadata) if is_directory(&metadata.file_type()) => Ok(PathKind::Directory),
		Ok(_) => Ok(PathKind::File),
		Err(err) if is_absent(&err) => Ok(PathKind::Missing),
		Err(err) => Err(DeleteError::from_io("symlink_metadata", path, err)),
	}
}

/// One attempt: classify the path and run the matching strategy
pub fn remove_once(path: &Path, pause: Duration) -> Result<()> {
	match classify(path)? {
		PathKind::Directory => directory::remove_directory(path, pause),
		PathKind::File => file::remove_file(path, pause),
		PathKind::Missing => Ok(()),
	}
}

#[cfg(windows)]
fn is_directory(file_type: &FileType) -> bool {
	use std::os::windows::fs::FileTypeExt;

	// directory links are removed with RemoveDirectory, which deletes the link only
	file_type.is_dir() || file_type.is_symlink_dir()
}

#[cfg(not(windows))]
fn is_directory(file_type: &FileType) -> bool {
	file_type.is_dir()
}

use crate::error::{is_absent, DeleteError, Result};
use std::fs;
use std::path::Path;
use tracing::trace;

/// Clear the read-only attribute of one entry
///
/// Symbolic links are left alone: changing their permissions would change
/// the target's. An entry that no longer exists has nothing to clear.
pub fn clear_readonly(path: &Path) -> Result<()> {
	let metadata = match fs::symlink_metadata(path) {
		Ok(metadata) => metadata,
		Err(err) if is_absent(&err) => return Ok(()),
		Err(err) => return Err(DeleteError::from_io("symlink_metadata", path, err)),
	};

	if metadata.file_type().is_symlink() {
		return Ok(());
	}

	let mut permissions = metadata.permissions();
	if !platform::is_readonly(&permissions) {
		return Ok(());
	}

	platform::make_writable(&mut permissions);
	trace!("Clearing read-only attribute on {:?}", path);

	match fs::set_permissions(path, permissions) {
		Ok(()) => Ok(()),
		Err(err) if is_absent(&err) => Ok(()),
		Err(err) => Err(DeleteError::from_io("set_permissions", path, err)),
	}
}

#[cfg(unix)]
mod platform {
	use std::fs::Permissions;
	use std::os::unix::fs::PermissionsExt;

	const OWNER_WRITE: u32 = 0o200;

	pub fn is_readonly(permissions: &Permissions) -> bool {
		permissions.mode() & OWNER_WRITE == 0
	}

	// Only the owner write bit; group and other stay as they were.
	pub fn make_writable(permissions: &mut Permissions) {
		permissions.set_mode(permissions.mode() | OWNER_WRITE);
	}
}

#[cfg(not(unix))]
mod platform {
	use std::fs::Permissions;

	pub fn is_readonly(permissions: &Permissions) -> bool {
		permissions.readonly()
	}

	#[allow(clippy::permissions_set_readonly_false)]
	pub fn make_writable(permissions: &mut Permissions) {
		permissions.set_readonly(false);
	}
}

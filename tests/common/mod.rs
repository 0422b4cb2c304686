//! Common test utilities for the rust-deleter library

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tempfile::TempDir;

/// Create a temporary directory for testing
pub fn setup_temp_dir() -> TempDir {
	TempDir::new().expect("Failed to create temp directory")
}

/// Create a test file with content
pub fn create_test_file(path: &Path, content: &str) {
	fs::write(path, content).expect("Failed to create test file");
}

/// Create a file and mark it read-only
pub fn create_read_only_file(path: &Path) {
	create_test_file(path, "read-only content");
	let mut permissions = fs::metadata(path).unwrap().permissions();
	permissions.set_readonly(true);
	fs::set_permissions(path, permissions).unwrap();
}

pub fn is_read_only(path: &Path) -> bool {
	fs::metadata(path).unwrap().permissions().readonly()
}

/// Create a directory tree with files at every level
///
/// ```text
/// root/
///   file1.txt
///   subdir/
///     subfile.txt
///     deeper/
///       deep_file.dat
/// ```
pub fn create_tree(root: &Path) {
	let deeper = root.join("subdir").join("deeper");
	fs::create_dir_all(&deeper).unwrap();
	create_test_file(&root.join("file1.txt"), "content1");
	create_test_file(&root.join("subdir").join("subfile.txt"), "sub content");
	create_test_file(&deeper.join("deep_file.dat"), "deep content");
}

/// Another actor keeping an entry undeletable for a while
pub struct Contention {
	thread: JoinHandle<()>,
	/// False when the platform lets us delete through the hold (running as root)
	pub blocks_deletes: bool,
}

impl Contention {
	/// Wait for the hold to be released
	pub fn join(self) {
		self.thread.join().expect("contention thread panicked");
	}
}

/// Create a file that cannot be deleted for `hold`
///
/// On Windows the file is held open without delete sharing. On Unix an open
/// handle does not prevent unlinking, so the file's parent directory is made
/// read-only instead.
pub fn contended_file(root: &Path, hold: Duration) -> (PathBuf, Contention) {
	#[cfg(unix)]
	{
		let guard = root.join("guard");
		fs::create_dir(&guard).unwrap();
		let file = guard.join("held.txt");
		create_test_file(&file, "held");
		(file, hold_directory_read_only(&guard, hold))
	}

	#[cfg(windows)]
	{
		let file = root.join("held.txt");
		let contention = hold_file_exclusively(&file, hold);
		(file, contention)
	}
}

/// Create a populated directory that cannot be deleted for `hold`
pub fn contended_directory(root: &Path, hold: Duration) -> (PathBuf, Contention) {
	#[cfg(unix)]
	{
		let guard = root.join("guard");
		let dir = guard.join("held");
		fs::create_dir_all(&dir).unwrap();
		create_test_file(&dir.join("inside.txt"), "inside");
		(dir, hold_directory_read_only(&guard, hold))
	}

	#[cfg(windows)]
	{
		let dir = root.join("held");
		fs::create_dir(&dir).unwrap();
		let contention = hold_file_exclusively(&dir.join("inside.txt"), hold);
		(dir, contention)
	}
}

#[cfg(unix)]
fn hold_directory_read_only(dir: &Path, hold: Duration) -> Contention {
	use std::os::unix::fs::PermissionsExt;

	fs::set_permissions(dir, fs::Permissions::from_mode(0o555)).unwrap();

	// root ignores the mode, in which case nothing is actually held
	let canary = dir.join(".canary");
	let blocks_deletes = fs::write(&canary, "").is_err();
	if !blocks_deletes {
		let _ = fs::remove_file(&canary);
		eprintln!(
			"note: read-only directory modes are not enforced for this user (root?); \
			 contention tests only check the final deletion, not retrying through a hold"
		);
	}

	let dir = dir.to_path_buf();
	let thread = thread::spawn(move || {
		thread::sleep(hold);
		let _ = fs::set_permissions(&dir, fs::Permissions::from_mode(0o755));
	});

	Contention { thread, blocks_deletes }
}

#[cfg(windows)]
fn hold_file_exclusively(path: &Path, hold: Duration) -> Contention {
	use std::fs::OpenOptions;
	use std::os::windows::fs::OpenOptionsExt;
	use std::sync::mpsc;

	let path = path.to_path_buf();
	let (opened_tx, opened_rx) = mpsc::channel();
	let thread = thread::spawn(move || {
		let file = OpenOptions::new()
			.write(true)
			.create(true)
			.share_mode(0)
			.open(&path)
			.expect("Failed to open held file");
		opened_tx.send(()).unwrap();
		thread::sleep(hold);
		drop(file);
	});
	opened_rx.recv().expect("contention thread exited early");

	Contention { thread, blocks_deletes: true }
}

use clap::Parser;
use rust_deleter::{DeleteOptions, DeleteOptionsBuilder};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info, Level};

#[derive(Parser)]
#[command(name = "rdel")]
#[command(about = "Forcefully delete files and directory trees, retrying through transient locks")]
struct Cli {
	/// Paths to delete
	#[arg(required = true)]
	paths: Vec<PathBuf>,

	/// Time budget per path in milliseconds
	#[arg(short, long, default_value_t = 10_000)]
	timeout_ms: u64,

	/// Pause between failed attempts in milliseconds
	#[arg(short, long, default_value_t = 50)]
	interval_ms: u64,

	/// Use the async driver on a tokio runtime
	#[arg(long = "async")]
	use_async: bool,

	/// Enable verbose logging
	#[arg(short, long)]
	verbose: bool,
}

impl Cli {
	fn options(&self) -> DeleteOptions {
		DeleteOptionsBuilder::new()
			.timeout(Duration::from_millis(self.timeout_ms))
			.retry_interval(Duration::from_millis(self.interval_ms))
			.build()
	}
}

fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();

	let level = if cli.verbose {
		Level::DEBUG
	} else {
		Level::INFO
	};
	tracing_subscriber::fmt().with_max_level(level).init();

	let options = cli.options();
	let failed = if cli.use_async {
		let runtime = tokio::runtime::Runtime::new()?;
		runtime.block_on(delete_all_async(&cli.paths, options))
	} else {
		delete_all(&cli.paths, options)
	};

	if failed > 0 {
		anyhow::bail!("{} of {} paths could not be deleted", failed, cli.paths.len());
	}

	Ok(())
}

fn delete_all(paths: &[PathBuf], options: DeleteOptions) -> usize {
	let mut failed = 0;
	for path in paths {
		let result = rust_deleter::delete_with_options(path, options);
		if report(path, result) {
			failed += 1;
		}
	}
	failed
}

async fn delete_all_async(paths: &[PathBuf], options: DeleteOptions) -> usize {
	let mut failed = 0;
	for path in paths {
		let result = rust_deleter::delete_async_with_options(path, options).await;
		if report(path, result) {
			failed += 1;
		}
	}
	failed
}

/// Log the outcome for one path; true when it failed
fn report(path: &Path, result: rust_deleter::Result<()>) -> bool {
	match result {
		Ok(()) => {
			info!("Deleted {}", path.display());
			false
		}
		Err(err) => {
			error!("Failed to delete {}: {}", path.display(), err);
			true
		}
	}
}

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rust_deleter::{delete, delete_async};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use tokio::runtime::Runtime;

/// A tree of `width` directories, each holding `width` files
fn build_tree(width: usize) -> (TempDir, PathBuf) {
	let temp_dir = TempDir::new().unwrap();
	let root = temp_dir.path().join("tree");
	for d in 0..width {
		let dir = root.join(format!("dir_{d}"));
		fs::create_dir_all(&dir).unwrap();
		for f in 0..width {
			fs::write(dir.join(format!("file_{f}.txt")), "payload").unwrap();
		}
	}
	(temp_dir, root)
}

fn bench_delete_tree(c: &mut Criterion) {
	c.bench_function("delete_tree_10x10", |b| {
		b.iter_batched(
			|| build_tree(10),
			|(_temp_dir, root)| delete(black_box(&root)).unwrap(),
			BatchSize::SmallInput,
		)
	});

	let rt = Runtime::new().unwrap();
	c.bench_function("delete_async_tree_10x10", |b| {
		b.iter_batched(
			|| build_tree(10),
			|(_temp_dir, root)| rt.block_on(delete_async(black_box(&root))).unwrap(),
			BatchSize::SmallInput,
		)
	});
}

fn bench_delete_missing(c: &mut Criterion) {
	let temp_dir = TempDir::new().unwrap();
	let missing = temp_dir.path().join("missing");

	c.bench_function("delete_missing_path", |b| b.iter(|| delete(black_box(&missing)).unwrap()));
}

criterion_group!(benches, bench_delete_tree, bench_delete_missing);
criterion_main!(benches);

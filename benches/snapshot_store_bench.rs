//! Benchmark for SnapshotStore read latency with and without a busy writer.

use cowtrie::store::SnapshotStore;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

fn seeded_store(size: usize) -> Arc<SnapshotStore> {
    let store = Arc::new(SnapshotStore::new());
    for index in 0..size {
        store.put(format!("key/{index:06}"), index);
    }
    store
}

// =============================================================================
// get Benchmark
// =============================================================================

fn benchmark_get(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("store_get");

    for size in [1_000, 10_000] {
        let store = seeded_store(size);
        let key = format!("key/{:06}", size / 2);

        group.bench_with_input(BenchmarkId::new("idle_writer", size), &key, |bencher, key| {
            bencher.iter(|| black_box(store.get::<usize>(black_box(key))));
        });

        let done = Arc::new(AtomicBool::new(false));
        let writer = {
            let store = Arc::clone(&store);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                let mut round = 0_usize;
                while !done.load(Ordering::Relaxed) {
                    store.put(format!("key/{:06}", round % size), round);
                    round += 1;
                }
            })
        };

        group.bench_with_input(BenchmarkId::new("busy_writer", size), &key, |bencher, key| {
            bencher.iter(|| black_box(store.get::<usize>(black_box(key))));
        });

        done.store(true, Ordering::Relaxed);
        writer.join().expect("Writer panicked");
    }

    group.finish();
}

criterion_group!(benches, benchmark_get);
criterion_main!(benches);

/// Record store append and snapshot benchmarks

use cdc_ingest::{BusinessFields, NormalizedRecord, RecordStore, SnapshotOrder, StatsComputer};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::Arc;
use std::thread;

fn record(id: i64) -> NormalizedRecord {
    NormalizedRecord::new(BusinessFields {
        record_id: Some(id),
        creat_usrnbr: Some(id % 7),
        ..BusinessFields::default()
    })
}

fn bench_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_append");

    group.bench_function("single_thread", |b| {
        let store = RecordStore::new();
        let mut id = 0;
        b.iter(|| {
            id += 1;
            store.append(black_box(record(id)))
        });
    });

    group.bench_function("four_threads_x_1000", |b| {
        b.iter(|| {
            let store = Arc::new(RecordStore::new());
            thread::scope(|s| {
                for t in 0..4 {
                    let store = Arc::clone(&store);
                    s.spawn(move || {
                        for i in 0..1000 {
                            store.append(record(t * 1000 + i));
                        }
                    });
                }
            });
            store.current_total()
        });
    });

    group.finish();
}

fn bench_reads(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_reads");
    let store = RecordStore::new();
    for id in 0..10 {
        store.append(record(id));
    }

    group.bench_function("snapshot_newest_first", |b| {
        b.iter(|| store.snapshot(black_box(SnapshotOrder::NewestFirst)))
    });

    group.bench_function("stats", |b| b.iter(|| StatsComputer::from_store(black_box(&store))));

    group.finish();
}

criterion_group!(benches, bench_append, bench_reads);
criterion_main!(benches);

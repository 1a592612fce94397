//! Criterion micro-benchmarks for the remote-state snapshot buffer.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use retrace_sync::{Linear, RemoteStateSync, SnapshotBuffer, SyncConfig};

fn bench_add_in_order_1k(c: &mut Criterion) {
    c.bench_function("buffer_add_in_order_1k", |b| {
        b.iter(|| {
            let mut buf = SnapshotBuffer::new(120).unwrap();
            for i in 0..1000 {
                buf.add(f64::from(i), [f64::from(i); 3]).unwrap();
            }
            black_box(buf.len());
        });
    });
}

fn bench_add_jittered_1k(c: &mut Criterion) {
    // Packets arrive up to three slots late.
    let times: Vec<f64> = (0..1000)
        .map(|i: i32| f64::from(i + [0, 3, -2, 1][(i % 4) as usize]))
        .collect();
    c.bench_function("buffer_add_jittered_1k", |b| {
        b.iter(|| {
            let mut buf = SnapshotBuffer::new(120).unwrap();
            for &t in &times {
                buf.add(t, [t; 3]).unwrap();
            }
            black_box(buf.len());
        });
    });
}

fn bench_sample_interpolated(c: &mut Criterion) {
    let mut sync = RemoteStateSync::with_interpolation(&SyncConfig::default(), Linear).unwrap();
    for i in 0..120 {
        sync.add_snapshot(f64::from(i) * 16.0, (f64::from(i), -f64::from(i))).unwrap();
    }
    c.bench_function("sync_sample_interpolated_1k", |b| {
        b.iter(|| {
            let mut acc = 0.0;
            for i in 0..1000 {
                if let Some((x, _)) = sync.sample(f64::from(i) * 1.9).unwrap() {
                    acc += x;
                }
            }
            black_box(acc);
        });
    });
}

criterion_group!(
    benches,
    bench_add_in_order_1k,
    bench_add_jittered_1k,
    bench_sample_interpolated,
);
criterion_main!(benches);

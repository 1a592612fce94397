//! Criterion micro-benchmarks for tape draws, run serialization, payload
//! validation and end-to-end playback.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use retrace_bench::{reference_run, TapeDrawSim};
use retrace_core::RandomSource;
use retrace_rand::{RandSlot, SeededRand, TapePlayer};
use retrace_replay::{
    build_payload, hydrate_payload, PlayOptions, ReplayConfig, ReplayEngine, ReplayLimits,
    ReplayPayload, ReplayRun,
};

/// One minute of play at 120 Hz.
const MINUTE_TICKS: usize = 7200;

fn bench_seeded_draw_10k(c: &mut Criterion) {
    c.bench_function("seeded_draw_10k", |b| {
        b.iter(|| {
            let mut rng = SeededRand::new("bench");
            let mut acc = 0.0;
            for _ in 0..10_000 {
                acc += rng.draw();
            }
            black_box(acc);
        });
    });
}

fn bench_tape_player_10k(c: &mut Criterion) {
    let run = reference_run("bench", 10_000, 1);
    let values = run.rng_tape.to_vec();
    c.bench_function("tape_player_10k", |b| {
        b.iter(|| {
            let mut player = TapePlayer::new(values.clone());
            let mut acc = 0.0;
            while let Ok(v) = player.next_f64() {
                acc += v;
            }
            black_box(acc);
        });
    });
}

fn bench_run_json_minute(c: &mut Criterion) {
    let run = reference_run("bench", MINUTE_TICKS, 2);
    let json = run.to_json().unwrap();

    c.bench_function("run_to_json_minute", |b| {
        b.iter(|| black_box(run.to_json().unwrap()));
    });
    c.bench_function("run_from_json_minute", |b| {
        b.iter(|| black_box(ReplayRun::from_json(black_box(&json)).unwrap()));
    });
}

fn bench_payload_minute(c: &mut Criterion) {
    let run = reference_run("bench", MINUTE_TICKS, 2);
    let limits = ReplayLimits::default();
    let payload = build_payload(&run, 1000, 0, &limits).unwrap();
    let json = payload.to_json().unwrap();

    c.bench_function("payload_build_minute", |b| {
        b.iter(|| black_box(build_payload(&run, 1000, 0, &limits)));
    });
    c.bench_function("payload_hydrate_minute", |b| {
        b.iter(|| {
            let received = ReplayPayload::from_json(&json).unwrap();
            black_box(hydrate_payload(&received, &limits));
        });
    });
}

fn bench_playback_minute(c: &mut Criterion) {
    let slot = RandSlot::default();
    let mut engine = ReplayEngine::new(
        ReplayConfig {
            timer_yield: false,
            ..ReplayConfig::default()
        },
        slot.clone(),
    )
    .unwrap();
    let mut sim = TapeDrawSim::new(slot, 2);
    let run = reference_run("bench", MINUTE_TICKS, 2);

    c.bench_function("playback_minute", |b| {
        b.iter(|| {
            let report = engine
                .play(&mut sim, PlayOptions::new().run(&run))
                .unwrap()
                .unwrap();
            black_box(report.ticks_processed);
        });
    });
}

criterion_group!(
    benches,
    bench_seeded_draw_10k,
    bench_tape_player_10k,
    bench_run_json_minute,
    bench_payload_minute,
    bench_playback_minute,
);
criterion_main!(benches);

// Sequencer Benchmarks
//
// Measures the per-arrival cost of:
// - In-order ids (hot path, no allocation)
// - Gap detection and fetch dispatch
// - Ring-order slicing across the wrap point
// - Shuffled arrival windows

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::time::Duration;
use underverse_core::{Ring, Sequencer};

// ============================================================================
// IN-ORDER ARRIVALS
// ============================================================================

fn bench_in_order(c: &mut Criterion) {
    let mut group = c.benchmark_group("in_order");
    group.measurement_time(Duration::from_secs(2));

    group.bench_function("received_successor", |b| {
        let mut seq = Sequencer::new(1_000_000);
        seq.start();
        let mut id = 0u64;
        b.iter(|| {
            black_box(seq.received(black_box(id)));
            id = if id == 1_000_000 { 0 } else { id + 1 };
        })
    });

    group.finish();
}

// ============================================================================
// GAP DETECTION
// ============================================================================

fn bench_gap_detection(c: &mut Criterion) {
    let mut group = c.benchmark_group("gap_detection");
    group.measurement_time(Duration::from_secs(2));

    for gap in [10u64, 100, 1_000] {
        group.bench_with_input(BenchmarkId::new("detect_and_mark", gap), &gap, |b, &gap| {
            b.iter(|| {
                let mut seq = Sequencer::new(10_000);
                seq.start();
                seq.on_fetch(|fetch| fetch.mark_pending());
                seq.received(0);
                black_box(seq.received(black_box(gap + 1)));
            })
        });
    }

    group.finish();
}

// ============================================================================
// RING SLICING
// ============================================================================

fn bench_slicing(c: &mut Criterion) {
    let mut group = c.benchmark_group("ring_slice");
    group.measurement_time(Duration::from_secs(2));

    let ring = Ring::new(10_000);

    group.bench_function("linear_1000", |b| {
        b.iter(|| black_box(ring.positions_between(black_box(1_000), black_box(2_000))))
    });

    group.bench_function("wrapping_1000", |b| {
        b.iter(|| black_box(ring.positions_between(black_box(9_500), black_box(499))))
    });

    group.finish();
}

// ============================================================================
// REORDERED STREAMS
// ============================================================================

fn bench_reordered_window(c: &mut Criterion) {
    let mut group = c.benchmark_group("reordered");
    group.measurement_time(Duration::from_secs(2));

    let mut rng = rand::rngs::StdRng::seed_from_u64(7);
    let mut ids: Vec<u64> = (0..5_000).collect();
    // Shuffle inside small windows, like packets reordered in flight
    for window in ids.chunks_mut(8) {
        window.shuffle(&mut rng);
    }

    group.bench_function("shuffled_windows_5000", |b| {
        b.iter(|| {
            let mut seq = Sequencer::new(10_000);
            seq.start();
            seq.on_fetch(|fetch| fetch.mark_pending());
            for &id in &ids {
                black_box(seq.received(id));
            }
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_in_order,
    bench_gap_detection,
    bench_slicing,
    bench_reordered_window
);
criterion_main!(benches);

//! # Particle Field Benchmark
//!
//! Measures initialization and the dispatch loop at frame-sized steps.
//!
//! Run with: `cargo bench --package backdrop_field`

// Benchmarks don't need docs
#![allow(missing_docs)]

use backdrop_core::{SimDuration, SimInstant};
use backdrop_field::{container_html, FieldConfig, ParticleField};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

/// One 60 Hz frame.
const FRAME: SimDuration = SimDuration::from_micros(16_667);

fn config(target_count: usize) -> FieldConfig {
    FieldConfig::default()
        .with_target_count(target_count)
        .with_seed(0xDEAD_BEEF)
}

/// Benchmark: build and fill a field.
fn bench_initialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("initialize");

    for count in [50, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| black_box(ParticleField::from_config(config(count))));
        });
    }

    group.finish();
}

/// Benchmark: one minute of simulated frames.
fn bench_advance_one_minute(c: &mut Criterion) {
    let mut group = c.benchmark_group("advance_60s_frames");

    for count in [50, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter_batched(
                || ParticleField::from_config(config(count)).expect("valid config"),
                |mut field| {
                    let mut respawns = 0;
                    for _ in 0..3_600 {
                        respawns += black_box(field.advance_by(FRAME).len());
                    }
                    (respawns, field.live_count())
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

/// Benchmark: a single long jump that forces many generations.
fn bench_catch_up(c: &mut Criterion) {
    c.bench_function("catch_up_1h_50_particles", |b| {
        b.iter_batched(
            || ParticleField::from_config(config(50)).expect("valid config"),
            |mut field| {
                field
                    .advance_to(SimInstant::ZERO + SimDuration::from_secs(3_600))
                    .len()
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

/// Benchmark: render the default container.
fn bench_render(c: &mut Criterion) {
    let field = ParticleField::from_config(config(50)).expect("valid config");
    c.bench_function("container_html_50", |b| {
        b.iter(|| black_box(container_html(&field)));
    });
}

criterion_group!(
    benches,
    bench_initialize,
    bench_advance_one_minute,
    bench_catch_up,
    bench_render,
);
criterion_main!(benches);

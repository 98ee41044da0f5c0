// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
//! Benchmark: one full step of the automaton at several frontier sizes.
//!
//! Each case pre-evolves a seed for a fixed number of generations (setup,
//! not timed) and then measures a single `step()`. Throughput "elements" are
//! the canonical cells swept by that step (slices `0..=max_v + 1`).
use aether_core::grid::slice_len;
use aether_core::Aether5D;
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use std::time::Duration;

fn warmed(seed: i64, generations: u32) -> Aether5D<i64> {
    let mut aether = Aether5D::new(seed).unwrap_or_else(|err| panic!("bench seed: {err}"));
    for _ in 0..generations {
        aether.step();
    }
    aether
}

fn swept_cells(aether: &Aether5D<i64>) -> u64 {
    (0..=aether.max_v() + 1).map(|v| slice_len(v) as u64).sum()
}

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("step_throughput");
    group
        .warm_up_time(Duration::from_secs(2))
        .measurement_time(Duration::from_secs(8))
        .sample_size(40);
    for &generations in &[4u32, 16, 32] {
        let template = warmed(-1_000_000, generations);
        group.throughput(Throughput::Elements(swept_cells(&template)));
        group.bench_with_input(
            BenchmarkId::new("negative_seed", generations),
            &template,
            |b, template| {
                b.iter_batched(
                    || template.clone(),
                    |mut aether| criterion::black_box(aether.step()),
                    BatchSize::LargeInput,
                );
            },
        );
    }
    group.finish();
}

fn bench_state_hash(c: &mut Criterion) {
    let mut group = c.benchmark_group("state_hash");
    for &generations in &[8u32, 32] {
        let aether = warmed(-1_000_000, generations);
        group.throughput(Throughput::Elements(swept_cells(&aether)));
        group.bench_with_input(
            BenchmarkId::from_parameter(generations),
            &aether,
            |b, aether| b.iter(|| criterion::black_box(aether.state_hash())),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_step, bench_state_hash);
criterion_main!(benches);

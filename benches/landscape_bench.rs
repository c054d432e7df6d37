// Benchmark suite for landscape excavation
//
// Covers the two workloads the structure is built for:
// - construct-and-drain: every valley excavated until empty
// - churn: alternating remove/insert at a fixed landscape size

use criterion::{
    black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use numerica::landscape::Landscape;

/// Distinct heights in random order, deterministic per seed.
fn random_heights(count: usize, seed: u64) -> Vec<i64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut heights: Vec<i64> = (0..count as i64).collect();
    heights.shuffle(&mut rng);
    return heights;
}

fn bench_construct(c: &mut Criterion) {
    let mut group = c.benchmark_group("construct");
    for size in [100usize, 1_000, 10_000] {
        let heights = random_heights(size, 42);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &heights, |b, heights| {
            b.iter(|| black_box(Landscape::new(heights)));
        });
    }
    group.finish();
}

fn bench_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("drain");
    for size in [100usize, 1_000, 10_000] {
        let heights = random_heights(size, 42);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &heights, |b, heights| {
            b.iter(|| {
                let mut landscape = Landscape::new(heights);
                while let Some(treasure) = landscape.remove() {
                    black_box(treasure);
                }
                return landscape.total_treasure();
            });
        });
    }
    group.finish();
}

/// Remove/insert pairs per churn iteration.
const CHURN_OPS: usize = 1_000;

fn bench_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("churn");
    for size in [100usize, 1_000, 10_000] {
        let heights = random_heights(size, 42);
        group.throughput(Throughput::Elements(CHURN_OPS as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &heights, |b, heights| {
            b.iter(|| {
                let mut landscape = Landscape::new(heights);
                // Fresh heights above the initial range keep everything
                // ever present distinct.
                let mut next_height = size as i64;
                for _ in 0..CHURN_OPS {
                    black_box(landscape.remove());
                    landscape.insert(next_height);
                    next_height += 1;
                }
                return landscape.total_treasure();
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_construct, bench_drain, bench_churn);
criterion_main!(benches);

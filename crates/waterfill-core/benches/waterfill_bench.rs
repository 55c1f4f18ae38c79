//! Water-filling allocator benchmarks
//!
//! Run with: cargo bench -p waterfill-core --bench waterfill_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use waterfill_core::waterfilling::waterfill;

/// Gains spread over several orders of magnitude, as a distance-based
/// propagation model would produce.
fn gain_vector(n: usize) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(0x57a7);
    (0..n).map(|_| 10.0_f64.powf(rng.gen_range(-6.0..-1.0))).collect()
}

fn bench_waterfill(c: &mut Criterion) {
    let mut group = c.benchmark_group("waterfill");

    for &n in &[3usize, 16, 64, 256, 1024, 4096] {
        let gains = gain_vector(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("channels", n), &gains, |b, gains| {
            b.iter(|| waterfill(black_box(gains), 1000.0, 1e-8).unwrap())
        });
    }

    group.finish();
}

fn bench_waterfill_tight_budget(c: &mut Criterion) {
    let mut group = c.benchmark_group("waterfill_tight_budget");

    // A budget small enough to mute most channels exercises the removal
    // loop rather than the no-removal fast path.
    for &n in &[64usize, 1024] {
        let gains = gain_vector(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("channels", n), &gains, |b, gains| {
            b.iter(|| waterfill(black_box(gains), 1e-4, 1e-8).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_waterfill, bench_waterfill_tight_budget);
criterion_main!(benches);

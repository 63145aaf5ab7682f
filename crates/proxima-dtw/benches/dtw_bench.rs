//! Criterion benchmarks for proxima-dtw: exact and bounded DTW distance.

use criterion::{Criterion, criterion_group, criterion_main};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use proxima_dtw::{Dtw, Series};

fn make_series(len: usize, seed: u64) -> Series {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut value = 0.0;
    let values: Vec<f64> = (0..len)
        .map(|_| {
            value += rng.gen_range(-1.0..1.0);
            value
        })
        .collect();
    Series::new(values).expect("random walk values are finite")
}

fn bench_distance_full(c: &mut Criterion) {
    let a = make_series(256, 1);
    let b = make_series(256, 2);
    let dtw = Dtw::full();

    c.bench_function("dtw_full_256", |bench| {
        bench.iter(|| dtw.distance(&a, &b));
    });
}

fn bench_distance_banded(c: &mut Criterion) {
    let a = make_series(256, 1);
    let b = make_series(256, 2);
    let dtw = Dtw::banded(16);

    c.bench_function("dtw_banded16_256", |bench| {
        bench.iter(|| dtw.distance(&a, &b));
    });
}

fn bench_distance_bounded(c: &mut Criterion) {
    let a = make_series(256, 1);
    let b = make_series(256, 2);
    let dtw = Dtw::full();
    let cutoff = dtw.distance(&a, &b) / 2.0;

    c.bench_function("dtw_full_256_bounded", |bench| {
        bench.iter(|| dtw.distance_bounded(&a, &b, cutoff));
    });
}

criterion_group!(
    benches,
    bench_distance_full,
    bench_distance_banded,
    bench_distance_bounded
);
criterion_main!(benches);

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use orrery::kepler::solve_kepler_fixed_point;

/// Uniform random in [0, 2π)
#[inline]
fn rand_angle(rng: &mut StdRng) -> f64 {
    rng.random::<f64>() * std::f64::consts::TAU
}

fn bench_regime(c: &mut Criterion, name: &str, seed: u64, eccentricity: std::ops::Range<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let samples = 10_000usize;

    c.bench_function(name, |b| {
        b.iter_batched(
            || {
                // Pre-generate inputs to avoid RNG cost in the timed section
                (0..samples)
                    .map(|_| (rand_angle(&mut rng), rng.random_range(eccentricity.clone())))
                    .collect::<Vec<_>>()
            },
            |cases| {
                for (m, e) in cases {
                    let _ = black_box(solve_kepler_fixed_point(black_box(m), black_box(e)));
                }
            },
            BatchSize::LargeInput,
        )
    });
}

/// Planets and most asteroids: e ∈ [0, 0.2)
fn bench_low_e(c: &mut Criterion) {
    bench_regime(c, "solve_kepler_fixed_point/low_e<0.2", 0xDEADBEEF, 0.0..0.2);
}

/// Densified orbit traces: e ∈ [0.2, 0.7)
fn bench_mid_e(c: &mut Criterion) {
    bench_regime(c, "solve_kepler_fixed_point/mid_e_0.2..0.7", 0xBADF00D, 0.2..0.7);
}

/// Slow fixed-point convergence: e ∈ [0.7, 0.9)
fn bench_high_e(c: &mut Criterion) {
    bench_regime(c, "solve_kepler_fixed_point/high_e_0.7..0.9", 0xFEEDFACE, 0.7..0.9);
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_low_e, bench_mid_e, bench_high_e
);
criterion_main!(benches);

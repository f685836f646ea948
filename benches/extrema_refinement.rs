use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use apsis::prelude::*;

/// Batch of radial orbits `r = a + b sin(ω t + φ)` with random parameters.
fn random_radial_batch(rng: &mut StdRng, norbits: usize, ntimes: usize, dt: f64) -> Orbit {
    let orbits: Vec<(f64, f64, f64, f64)> = (0..norbits)
        .map(|_| {
            (
                rng.random_range(2.0..4.0),
                rng.random_range(0.2..1.0),
                rng.random_range(0.5..2.0),
                rng.random::<f64>() * std::f64::consts::TAU,
            )
        })
        .collect();

    let t: Vec<f64> = (0..ntimes).map(|i| i as f64 * dt).collect();
    let mut pos = Vec::with_capacity(ntimes * norbits);
    let mut vel = Vec::with_capacity(ntimes * norbits);
    for &ti in &t {
        for &(a, b, omega, phase) in &orbits {
            let arg = omega * ti + phase;
            pos.push(Vec3::new(a + b * arg.sin(), 0.0, 0.0));
            vel.push(Vec3::new(b * omega * arg.cos(), 0.0, 0.0));
        }
    }
    Orbit::batch(pos, vel, Some(t), norbits).unwrap()
}

fn bench_pericenter(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let orbit = random_radial_batch(&mut rng, 32, 5000, 0.01);

    let mut group = c.benchmark_group("pericenter");
    for (name, method) in [
        ("brent", RefineMethod::Brent),
        ("golden", RefineMethod::GoldenSection),
        ("derivative_root", RefineMethod::DerivativeRoot),
    ] {
        let params = ExtremaParams::builder()
            .refine_method(method)
            .build()
            .unwrap();
        let request = ExtremaRequest::default().with_params(params);
        group.bench_function(name, |b| {
            b.iter(|| black_box(orbit.pericenter(black_box(&request)).unwrap()))
        });
    }
    group.bench_function("approximate", |b| {
        let request = ExtremaRequest::default().approximate(true);
        b.iter(|| black_box(orbit.pericenter(black_box(&request)).unwrap()))
    });
    group.finish();
}

fn bench_period_and_circulation(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(7);
    c.bench_function("estimate_period", |b| {
        b.iter_batched(
            || random_radial_batch(&mut rng, 8, 5000, 0.01),
            |orbit| black_box(orbit.estimate_period(&PeriodParams::default()).unwrap()),
            BatchSize::LargeInput,
        )
    });

    let orbit = random_radial_batch(&mut StdRng::seed_from_u64(9), 32, 5000, 0.01);
    c.bench_function("circulation", |b| {
        b.iter(|| black_box(orbit.circulation().unwrap()))
    });
}

criterion_group!(benches, bench_pericenter, bench_period_and_circulation);
criterion_main!(benches);

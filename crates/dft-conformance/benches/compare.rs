use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dft_conformance::{compare, TolerancePolicy};
use dft_core::{Complex32, ComplexMatrix, Shape};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_matrix(shape: Shape, seed: u64) -> ComplexMatrix {
    let mut rng = StdRng::seed_from_u64(seed);
    ComplexMatrix::from_fn(shape, |_, _| Complex32::new(rng.random(), rng.random()))
}

fn bench_compare(c: &mut Criterion) {
    let mut group = c.benchmark_group("compare");
    let policy = TolerancePolicy::default();

    for &n in &[64usize, 256, 512] {
        let shape = Shape::new(n, n).unwrap();
        let reference = random_matrix(shape, 42);
        // Perturb every 7th element so the ranking path is exercised.
        let candidate = ComplexMatrix::from_fn(shape, |r, col| {
            let v = reference.get(r, col).unwrap();
            if (r * n + col) % 7 == 0 {
                v * 1.01
            } else {
                v
            }
        });

        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_with_input(BenchmarkId::new("square", n), &n, |b, _| {
            b.iter(|| compare(&candidate, &reference, &policy).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_compare);
criterion_main!(benches);

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use euclidean_vector::{dot, norm, unit, Vector};
use rand::Rng;

const DIMENSIONS: [usize; 3] = [3, 128, 4096];

fn random_vector(dimensions: usize) -> Vector {
    let mut rng = rand::thread_rng();
    (0..dimensions).map(|_| rng.gen_range(-1.0..1.0_f64)).collect()
}

pub fn bench_norm(c: &mut Criterion) {
    let mut group = c.benchmark_group("norm");
    for dimensions in DIMENSIONS {
        let vector = random_vector(dimensions);
        group.bench_with_input(BenchmarkId::new("cached", dimensions), &vector, |b, v| {
            b.iter(|| norm(black_box(v)))
        });
        group.bench_with_input(BenchmarkId::new("uncached", dimensions), &vector, |b, v| {
            b.iter_batched_ref(
                || v.clone(),
                |v| norm(black_box(v)),
                criterion::BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

pub fn bench_unit_and_dot(c: &mut Criterion) {
    for dimensions in DIMENSIONS {
        let x = random_vector(dimensions);
        let y = random_vector(dimensions);
        c.bench_function(&format!("unit_{dimensions}"), |b| {
            b.iter(|| unit(black_box(&x)))
        });
        c.bench_function(&format!("dot_{dimensions}"), |b| {
            b.iter(|| dot(black_box(&x), black_box(&y)))
        });
    }
}

pub fn bench_arithmetic(c: &mut Criterion) {
    let x = random_vector(128);
    let y = random_vector(128);

    c.bench_function("add_128", |b| b.iter(|| black_box(&x) + black_box(&y)));
    c.bench_function("scale_128", |b| b.iter(|| black_box(&x) * 2.5));
    c.bench_function("add_assign_128", |b| {
        let mut accumulator = Vector::zeros(128);
        b.iter(|| accumulator += black_box(&y))
    });
}

criterion_group!(benches, bench_norm, bench_unit_and_dot, bench_arithmetic);
criterion_main!(benches);

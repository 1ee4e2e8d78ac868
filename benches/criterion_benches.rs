#[macro_use]
extern crate criterion;

use criterion::{Benchmark, Criterion};

use vexed_solver::{LoadLevel, Solve};

fn bench_classic_01(c: &mut Criterion) {
    bench_level(c, "levels/classic-01.txt", 20);
}

fn bench_level(c: &mut Criterion, level_path: &str, samples: usize) {
    let level = level_path.load_level().unwrap();

    c.bench(
        "solve",
        Benchmark::new(level_path, move |b| {
            b.iter(|| {
                criterion::black_box(level.solve(criterion::black_box(None), false))
            })
        })
        .sample_size(samples),
    );
}

criterion_group!(benches, bench_classic_01);
criterion_main!(benches);

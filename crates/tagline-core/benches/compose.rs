//! Benchmarks for caption composition.
//!
//! Run with: cargo bench -p tagline-core

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tagline_core::{categorize, Composer};

fn benchmark_categorize(c: &mut Criterion) {
    c.bench_function("categorize_default_path", |b| {
        b.iter(|| categorize(black_box("some_unlisted_subject_folder")))
    });
}

fn benchmark_compose(c: &mut Criterion) {
    let mut composer = Composer::seeded(None, 0);

    c.bench_function("compose_fallback", |b| {
        b.iter(|| composer.compose(black_box("sigiriya_fort"), None))
    });

    c.bench_function("compose_enriched", |b| {
        b.iter(|| {
            composer.compose(
                black_box("kottu"),
                black_box(Some("a plate of food on a table")),
            )
        })
    });
}

criterion_group!(benches, benchmark_categorize, benchmark_compose);
criterion_main!(benches);

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;
use simrec::topk::{top_k, top_k_by_sort};
use simrec::{Catalog, ItemId, Recommender, SimilarityMatrix};
use std::sync::Arc;

fn random_row(n: usize) -> Vec<f32> {
    let mut rng = rand::rng();
    (0..n).map(|_| rng.random::<f32>()).collect()
}

fn bench_selection(c: &mut Criterion) {
    let mut group = c.benchmark_group("top_k");

    for n in [1_000, 10_000, 100_000] {
        let row = random_row(n);
        group.bench_with_input(BenchmarkId::new("heap", n), &row, |b, row| {
            b.iter(|| top_k(black_box(row), 0, 5));
        });
        group.bench_with_input(BenchmarkId::new("sort", n), &row, |b, row| {
            b.iter(|| top_k_by_sort(black_box(row), 0, 5));
        });
    }

    group.finish();
}

fn bench_rank(c: &mut Criterion) {
    let n = 5_000;
    let catalog = Catalog::new(
        (0..n)
            .map(|i| (ItemId::Integer(i as u64), format!("Movie {}", i)))
            .collect(),
    )
    .unwrap();

    let mut rng = rand::rng();
    let mut data = vec![0.0f32; n * n];
    for i in 0..n {
        for j in i..n {
            let v = if i == j { 1.0 } else { rng.random::<f32>() };
            data[i * n + j] = v;
            data[j * n + i] = v;
        }
    }
    let matrix = SimilarityMatrix::new(n, data).unwrap();
    let recommender = Recommender::new(Arc::new(catalog), Arc::new(matrix)).unwrap();

    c.bench_function("rank_5000", |b| {
        b.iter(|| recommender.rank(black_box("Movie 2500"), 5).unwrap());
    });
}

criterion_group!(benches, bench_selection, bench_rank);
criterion_main!(benches);

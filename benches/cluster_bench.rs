use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use kwcluster::cluster::{DEFAULT_SIMILARITY_THRESHOLD, cluster_keywords, cosine_similarity};

const DIM: usize = 768;

/// Deterministic pseudo-embeddings drawn around `topics` directions so the
/// clusterer sees a realistic mix of joins and new seeds.
fn synthetic(n: usize, topics: usize) -> (Vec<String>, Vec<Vec<f32>>) {
    let mut state = 0x9E37_79B9_7F4A_7C15u64;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state >> 40) as f32 / (1u64 << 24) as f32 - 0.5
    };

    let centers: Vec<Vec<f32>> = (0..topics)
        .map(|_| (0..DIM).map(|_| next()).collect())
        .collect();
    let keywords = (0..n).map(|i| format!("keyword {i}")).collect();
    let embeddings = (0..n)
        .map(|i| {
            centers[i % topics]
                .iter()
                .map(|c| c + 0.3 * next())
                .collect()
        })
        .collect();
    (keywords, embeddings)
}

fn bench_cosine(c: &mut Criterion) {
    let (_, embeddings) = synthetic(2, 2);
    c.bench_function("cosine_similarity_768", |b| {
        b.iter(|| cosine_similarity(black_box(&embeddings[0]), black_box(&embeddings[1])))
    });
}

fn bench_cluster(c: &mut Criterion) {
    let mut group = c.benchmark_group("cluster_keywords");
    group.sample_size(20);

    for size in [100usize, 500, 1000] {
        let (keywords, embeddings) = synthetic(size, size / 10);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                cluster_keywords(
                    black_box(&keywords),
                    black_box(&embeddings),
                    DEFAULT_SIMILARITY_THRESHOLD,
                )
                .expect("cluster")
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_cosine, bench_cluster);
criterion_main!(benches);

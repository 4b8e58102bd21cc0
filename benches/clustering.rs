use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::prelude::*;
use tessera::cluster::{Clustering, Dbscan, Kmeans};
use tessera::{ItemRecord, Pipeline, RatingEvent, TagEvent};

const GENRES: &[&str] = &["Action", "Comedy", "Drama", "Horror", "Romance", "Sci-Fi", "Thriller"];

fn synthetic_catalog(n_items: u64, rng: &mut StdRng) -> (Vec<ItemRecord>, Vec<RatingEvent>, Vec<TagEvent>) {
    let items = (0..n_items)
        .map(|id| {
            let genres: Vec<&str> = GENRES
                .iter()
                .copied()
                .filter(|_| rng.random::<f32>() < 0.3)
                .collect();
            ItemRecord::new(id, format!("Item {id} ({})", rng.random_range(1950..2020)), genres.join("|"))
        })
        .collect();
    let ratings = (0..n_items * 10)
        .map(|_| RatingEvent::new(rng.random_range(0..n_items), f64::from(rng.random_range(1u8..=10)) * 0.5))
        .collect();
    let tags = (0..n_items * 2)
        .map(|_| TagEvent::new(rng.random_range(0..n_items), format!("tag{}", rng.random_range(0..50))))
        .collect();
    (items, ratings, tags)
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    let mut rng = StdRng::seed_from_u64(42);
    let (items, ratings, tags) = synthetic_catalog(1000, &mut rng);
    let pipeline = Pipeline::default();

    group.bench_function("build_features_n1000", |b| {
        b.iter(|| {
            pipeline
                .build_features(black_box(&items), black_box(&ratings), black_box(&tags))
                .unwrap()
        })
    });

    let rows = pipeline
        .build_features(&items, &ratings, &tags)
        .unwrap()
        .to_rows();

    group.bench_function("kmeans_k4_n1000", |b| {
        b.iter(|| {
            let model = Kmeans::new(4).with_max_iter(20).with_seed(42);
            model.fit_predict(black_box(&rows)).unwrap()
        })
    });

    group.bench_function("dbscan_eps3_n1000", |b| {
        b.iter(|| Dbscan::new(3.0, 2).fit_predict(black_box(&rows)).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);

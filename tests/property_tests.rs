use std::collections::BTreeMap;

use proptest::prelude::*;
use tessera::cluster::{Clustering, Dbscan, DbscanExt, Kmeans, NOISE};
use tessera::features::Column;
use tessera::{ItemRecord, Pipeline, RatingEvent, TagEvent};

const GENRES: &[&str] = &["Action", "Comedy", "Drama", "Sci-Fi", "Film-Noir", "(no genres listed)"];
const TAGS: &[&str] = &["funny", "Funny", "dark", "twist ending", "pixar", ""];

fn catalog_strategy() -> impl Strategy<Value = (Vec<ItemRecord>, Vec<RatingEvent>, Vec<TagEvent>)> {
    let items = prop::collection::vec(
        (
            prop::option::of(1900i32..2025),
            prop::collection::vec(0..GENRES.len(), 0..4),
        ),
        1..15,
    );
    let ratings = prop::collection::vec((0u64..20, 0u8..11), 0..40);
    let tags = prop::collection::vec((0u64..20, 0..TAGS.len()), 0..40);

    (items, ratings, tags).prop_map(|(items, ratings, tags)| {
        let items = items
            .into_iter()
            .enumerate()
            .map(|(id, (year, genres))| {
                let title = match year {
                    Some(y) => format!("Item {id} ({y})"),
                    None => format!("Item {id}"),
                };
                let genres: Vec<&str> = genres.into_iter().map(|g| GENRES[g]).collect();
                ItemRecord::new(id as u64, title, genres.join("|"))
            })
            .collect();
        let ratings = ratings
            .into_iter()
            .map(|(item, half_stars)| RatingEvent::new(item, f64::from(half_stars) * 0.5))
            .collect();
        let tags = tags
            .into_iter()
            .map(|(item, t)| TagEvent::new(item, TAGS[t]))
            .collect();
        (items, ratings, tags)
    })
}

proptest! {
    #[test]
    fn prop_kmeans_all_assigned(
        data in prop::collection::vec(prop::collection::vec(-10.0f32..10.0, 2), 1..20),
        k in 1usize..5
    ) {
        if k <= data.len() {
            let model = Kmeans::new(k).with_seed(42);
            let labels = model.fit_predict(&data).unwrap();

            prop_assert_eq!(labels.len(), data.len());
            for &l in &labels {
                prop_assert!(l < k);
            }
        }
    }

    #[test]
    fn prop_dbscan_noise_iff_not_reachable(
        data in prop::collection::vec(prop::collection::vec(-5.0f32..5.0, 2), 1..25),
        eps in 0.5f32..3.0,
        min_pts in 1usize..4,
    ) {
        let labels = Dbscan::new(eps, min_pts).fit_predict_with_noise(&data).unwrap();
        let neighbors = |i: usize| -> usize {
            data.iter()
                .enumerate()
                .filter(|(j, other)| {
                    *j != i
                        && data[i].iter().zip(other.iter()).map(|(a, b)| (a - b).powi(2)).sum::<f32>()
                            <= eps * eps
                })
                .count()
        };

        for (i, label) in labels.iter().enumerate() {
            let core = neighbors(i) + 1 >= min_pts;
            if core {
                // Core rows always belong to a cluster.
                prop_assert!(label.is_some());
            }
            if label.is_none() {
                prop_assert!(!core);
            }
        }

        let flat = Dbscan::new(eps, min_pts).fit_predict(&data).unwrap();
        for (a, b) in labels.iter().zip(flat.iter()) {
            prop_assert_eq!(a.unwrap_or(NOISE), *b);
        }
    }

    #[test]
    fn prop_matrix_width_and_tag_counts((items, ratings, tags) in catalog_strategy()) {
        let matrix = Pipeline::default().build_features(&items, &ratings, &tags).unwrap();

        let vocab = matrix
            .columns()
            .iter()
            .filter(|c| matches!(c, Column::Genre(_) | Column::Tag(_)))
            .count();
        prop_assert_eq!(matrix.n_columns(), 2 + vocab);
        prop_assert!(matrix.values().iter().all(|v| v.is_finite()));

        let mut per_item: BTreeMap<u64, f32> = BTreeMap::new();
        for t in tags.iter().filter(|t| !t.tag.is_empty()) {
            *per_item.entry(t.item).or_insert(0.0) += 1.0;
        }
        for (&item, &count) in &per_item {
            prop_assert_eq!(matrix.tag_total(item), Some(count));
        }
        for item in &items {
            prop_assert!(matrix.row(item.id).is_some());
        }
        prop_assert!(matrix.column_index(&Column::Tag(String::new())).is_none());
    }

    #[test]
    fn prop_input_order_does_not_change_matrix((items, ratings, tags) in catalog_strategy()) {
        let forward = Pipeline::default().build_features(&items, &ratings, &tags).unwrap();

        let mut items_rev = items.clone();
        items_rev.reverse();
        let mut ratings_rev = ratings.clone();
        ratings_rev.reverse();
        let mut tags_rev = tags.clone();
        tags_rev.reverse();
        let backward = Pipeline::default()
            .build_features(&items_rev, &ratings_rev, &tags_rev)
            .unwrap();

        prop_assert_eq!(forward.columns(), backward.columns());
        prop_assert_eq!(forward.item_ids(), backward.item_ids());
        for (a, b) in forward.values().iter().zip(backward.values().iter()) {
            prop_assert!((a - b).abs() < 1e-4);
        }
    }
}

//! End-to-end batch run: records → feature matrix → two cluster assignments.
//!
//! The run either completes with a matrix and both label sets or fails as a
//! whole; there is no partial result.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info, instrument, warn};

use crate::cluster::{ClusterAssignment, Clustering, DbscanExt, NOISE};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::features::{
    aggregate_ratings, count_tags, genre_counts, parse_year, Assembler, BagOfWords,
    FeatureMatrix, ItemId, ItemRecord, RatingEvent, TagEvent,
};

/// Labels from both clustering strategies over the same matrix.
#[derive(Debug, Clone)]
pub struct Clusters {
    /// k-means labels, all in `[0, k)`.
    pub partition: ClusterAssignment,
    /// DBSCAN labels, [`NOISE`] for unclustered items.
    pub density: ClusterAssignment,
    /// k-means within-cluster sum of squares.
    pub inertia: f64,
}

/// Result of [`Pipeline::run`].
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Assembled features.
    pub matrix: FeatureMatrix,
    /// Cluster labels.
    pub clusters: Clusters,
}

/// Batch feature-engineering and clustering pipeline.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a pipeline with the given configuration.
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Build the feature matrix.
    ///
    /// Every metadata item gets a row. Items that only appear in tag events get
    /// a row too (outer join); items that only appear in rating events do not.
    #[instrument(skip_all, fields(items = items.len(), ratings = ratings.len(), tags = tags.len()))]
    pub fn build_features(
        &self,
        items: &[ItemRecord],
        ratings: &[RatingEvent],
        tags: &[TagEvent],
    ) -> Result<FeatureMatrix> {
        let mut years: BTreeMap<ItemId, i32> = BTreeMap::new();
        let mut without_year = 0usize;
        for item in items {
            match parse_year(&item.title) {
                Some(year) => {
                    let _ = years.insert(item.id, year);
                }
                None => without_year += 1,
            }
        }
        if without_year > 0 {
            debug!(without_year, "titles without an extractable year");
        }

        let distinct: BTreeSet<ItemId> = items.iter().map(|i| i.id).collect();
        let duplicates = items.len() - distinct.len();
        if duplicates > 0 {
            warn!(
                duplicates,
                "duplicate item ids in metadata; genres are unioned, last parsed year wins"
            );
        }

        let means = aggregate_ratings(ratings);
        debug!(rated_items = means.len(), "aggregated ratings");

        let genre_table = genre_counts(items);
        let genre_block = BagOfWords::new()
            .with_denylist(self.config.genre_denylist.iter().cloned())
            .build(&genre_table, items.iter().map(|i| i.id));

        let tag_table = count_tags(tags);
        let tag_block = BagOfWords::new().build(&tag_table, []);

        let matrix = Assembler::new(self.config.encoding).assemble(
            &years,
            &means,
            &genre_block,
            &tag_block,
        )?;

        info!(
            rows = matrix.n_items(),
            columns = matrix.n_columns(),
            genres = genre_block.n_columns(),
            tags = tag_block.n_columns(),
            "assembled feature matrix"
        );

        Ok(matrix)
    }

    /// Run both clustering algorithms over `matrix`.
    ///
    /// Fails on an empty matrix or invalid hyperparameters.
    #[instrument(skip_all, fields(rows = matrix.n_items(), columns = matrix.n_columns()))]
    pub fn cluster(&self, matrix: &FeatureMatrix) -> Result<Clusters> {
        let rows = matrix.to_rows();

        let kmeans = self.config.kmeans.build();
        let fit = kmeans.fit(&rows)?;
        info!(
            k = kmeans.n_clusters(),
            inertia = fit.inertia,
            n_iter = fit.n_iter,
            "k-means finished"
        );

        let density_labels: Vec<usize> = self
            .config
            .dbscan
            .build()
            .fit_predict_with_noise(&rows)?
            .into_iter()
            .map(|l| l.unwrap_or(NOISE))
            .collect();

        let partition = ClusterAssignment::new(matrix.item_ids().to_vec(), fit.labels)?;
        let density = ClusterAssignment::new(matrix.item_ids().to_vec(), density_labels)?;
        info!(
            clusters = density.n_clusters(),
            noise = density.noise_count(),
            "dbscan finished"
        );

        Ok(Clusters {
            partition,
            density,
            inertia: fit.inertia,
        })
    }

    /// Build the matrix and cluster it.
    pub fn run(
        &self,
        items: &[ItemRecord],
        ratings: &[RatingEvent],
        tags: &[TagEvent],
    ) -> Result<PipelineOutput> {
        let matrix = self.build_features(items, ratings, tags)?;
        let clusters = self.cluster(&matrix)?;
        Ok(PipelineOutput { matrix, clusters })
    }
}

//! DBSCAN: Density-Based Spatial Clustering of Applications with Noise.
//!
//! # The Algorithm (Ester et al., 1996)
//!
//! Groups rows by neighborhood density. Unlike k-means it discovers the number of
//! clusters itself and labels sparse rows as noise instead of forcing them into a
//! group.
//!
//! ## Core Concepts
//!
//! - **Epsilon (ε)**: maximum Euclidean distance (inclusive) for two rows to be
//!   neighbors.
//! - **MinPts**: minimum neighborhood size for a row to be "core". The row itself
//!   counts toward it, so `min_pts = 2` means one other row within ε.
//! - **Core point**: has at least MinPts rows within ε.
//! - **Border point**: within ε of a core point but not core itself.
//! - **Noise point**: neither core nor border. Labelled [`NOISE`].
//!
//! ## Algorithm Steps
//!
//! 1. Compute every ε-neighborhood (independent per row, parallel under the
//!    `parallel` feature).
//! 2. For each unvisited core row, start a new cluster and expand it through the
//!    neighborhoods of every core row reached. Border rows join the first cluster
//!    that reaches them.
//!
//! ## Complexity
//!
//! - **Time**: O(n²) distance evaluations.
//! - **Space**: O(n + Σ|neighborhood|).
//!
//! ## Limitations
//!
//! ε is an absolute distance, so on unscaled features (raw years, tag counts) it is
//! dominated by the widest columns.

use super::traits::Clustering;
use super::util::{squared_euclidean, validate_points};
use crate::error::{Error, Result};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// DBSCAN clustering algorithm.
#[derive(Debug, Clone)]
pub struct Dbscan {
    /// Epsilon: maximum distance for neighborhood.
    epsilon: f32,
    /// Minimum points for core point classification, the point itself included.
    min_pts: usize,
}

/// Label assigned to rows that belong to no dense region.
pub const NOISE: usize = usize::MAX;

impl Dbscan {
    /// Create a new DBSCAN clusterer.
    ///
    /// # Arguments
    ///
    /// * `epsilon` - Maximum distance between two rows to be neighbors.
    /// * `min_pts` - Minimum neighborhood size (including the row) to be core.
    pub fn new(epsilon: f32, min_pts: usize) -> Self {
        Self { epsilon, min_pts }
    }

    /// Set epsilon (neighborhood radius).
    pub fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set minimum points for core classification.
    pub fn with_min_pts(mut self, min_pts: usize) -> Self {
        self.min_pts = min_pts;
        self
    }

    fn validate(&self, data: &[Vec<f32>]) -> Result<()> {
        validate_points(data)?;

        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(Error::InvalidParameter {
                name: "epsilon",
                message: "must be positive and finite",
            });
        }

        if self.min_pts == 0 {
            return Err(Error::InvalidParameter {
                name: "min_pts",
                message: "must be at least 1",
            });
        }

        Ok(())
    }

    /// Find all other rows within epsilon of `point_idx`.
    fn region_query(&self, data: &[Vec<f32>], point_idx: usize) -> Vec<usize> {
        let point = &data[point_idx];
        let eps_sq = self.epsilon * self.epsilon;
        data.iter()
            .enumerate()
            .filter(|(idx, other)| *idx != point_idx && squared_euclidean(point, other) <= eps_sq)
            .map(|(idx, _)| idx)
            .collect()
    }

    fn neighborhoods(&self, data: &[Vec<f32>]) -> Vec<Vec<usize>> {
        #[cfg(feature = "parallel")]
        {
            (0..data.len())
                .into_par_iter()
                .map(|i| self.region_query(data, i))
                .collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            (0..data.len()).map(|i| self.region_query(data, i)).collect()
        }
    }

    /// Run DBSCAN, returning `None` for noise rows.
    fn run(&self, data: &[Vec<f32>]) -> Result<Vec<Option<usize>>> {
        self.validate(data)?;

        let neighbors = self.neighborhoods(data);
        // MinPts includes the point itself.
        let is_core: Vec<bool> = neighbors
            .iter()
            .map(|nb| nb.len() + 1 >= self.min_pts)
            .collect();

        let n = data.len();
        let mut labels: Vec<Option<usize>> = vec![None; n];
        let mut cluster_id = 0;

        for seed in 0..n {
            if labels[seed].is_some() || !is_core[seed] {
                continue;
            }

            labels[seed] = Some(cluster_id);
            let mut to_process: Vec<usize> = neighbors[seed].clone();

            while let Some(idx) = to_process.pop() {
                if labels[idx].is_some() {
                    continue;
                }
                labels[idx] = Some(cluster_id);

                // Only core rows extend the cluster; border rows stop here.
                if is_core[idx] {
                    to_process.extend(neighbors[idx].iter().filter(|&&nb| labels[nb].is_none()));
                }
            }

            cluster_id += 1;
        }

        tracing::debug!(
            n_clusters = cluster_id,
            n_noise = labels.iter().filter(|l| l.is_none()).count(),
            "dbscan finished"
        );

        Ok(labels)
    }
}

impl Default for Dbscan {
    /// `eps = 3`, `min_pts = 2`.
    fn default() -> Self {
        Self::new(3.0, 2)
    }
}

impl Clustering for Dbscan {
    /// Noise rows are labelled [`NOISE`].
    fn fit_predict(&self, data: &[Vec<f32>]) -> Result<Vec<usize>> {
        Ok(self
            .run(data)?
            .into_iter()
            .map(|l| l.unwrap_or(NOISE))
            .collect())
    }

    /// DBSCAN discovers clusters dynamically, so this returns 0.
    fn n_clusters(&self) -> usize {
        0
    }
}

/// Extended DBSCAN interface with noise detection.
pub trait DbscanExt {
    /// Fit and predict, returning labels where noise is marked as `None`.
    fn fit_predict_with_noise(&self, data: &[Vec<f32>]) -> Result<Vec<Option<usize>>>;

    /// Check if a label represents noise.
    fn is_noise(label: usize) -> bool {
        label == NOISE
    }
}

impl DbscanExt for Dbscan {
    fn fit_predict_with_noise(&self, data: &[Vec<f32>]) -> Result<Vec<Option<usize>>> {
        self.run(data)
    }
}

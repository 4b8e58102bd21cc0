//! Clustering traits.

use crate::error::Result;

/// Trait for hard clustering algorithms over a dense feature matrix.
pub trait Clustering {
    /// Fit the model to data and return cluster assignments.
    ///
    /// Returns a vector of cluster labels, one per input row. Density-based
    /// algorithms may return [`NOISE`](super::NOISE) for rows outside every
    /// dense region.
    fn fit_predict(&self, data: &[Vec<f32>]) -> Result<Vec<usize>>;

    /// Get the number of clusters, or 0 when it is discovered during fitting.
    fn n_clusters(&self) -> usize;
}

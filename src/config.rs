//! Pipeline hyperparameters.
//!
//! Defaults match the usual catalog run: k-means with `k = 4` and DBSCAN with
//! `eps = 3`, `min_samples = 2`, over truncated scalars.

use crate::cluster::{Dbscan, Kmeans};
use crate::features::{BagOfWords, ScalarEncoding};

/// Partition clustering parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct KmeansParams {
    /// Number of clusters.
    pub k: usize,
    /// Iteration cap per restart.
    pub max_iter: usize,
    /// Convergence tolerance on the squared centroid shift.
    pub tol: f64,
    /// Seeded restarts; the lowest-inertia run wins.
    pub n_init: usize,
    /// Seed for k-means++ initialization. `None` draws from the thread RNG.
    pub seed: Option<u64>,
}

impl Default for KmeansParams {
    fn default() -> Self {
        Self {
            k: 4,
            max_iter: 300,
            tol: 1e-4,
            n_init: 10,
            seed: None,
        }
    }
}

impl KmeansParams {
    /// Build the configured clusterer.
    pub fn build(&self) -> Kmeans {
        let kmeans = Kmeans::new(self.k)
            .with_max_iter(self.max_iter)
            .with_tol(self.tol)
            .with_n_init(self.n_init);
        match self.seed {
            Some(seed) => kmeans.with_seed(seed),
            None => kmeans,
        }
    }
}

/// Density clustering parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct DbscanParams {
    /// Neighborhood radius.
    pub epsilon: f32,
    /// Minimum neighborhood size, the row itself included.
    pub min_pts: usize,
}

impl Default for DbscanParams {
    fn default() -> Self {
        Self {
            epsilon: 3.0,
            min_pts: 2,
        }
    }
}

impl DbscanParams {
    /// Build the configured clusterer.
    pub fn build(&self) -> Dbscan {
        Dbscan::new(self.epsilon, self.min_pts)
    }
}

/// Everything tunable in one batch run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Partition clustering.
    pub kmeans: KmeansParams,
    /// Density clustering.
    pub dbscan: DbscanParams,
    /// Year/rating encoding.
    pub encoding: ScalarEncoding,
    /// Genre tokens dropped before the vocabulary is built.
    pub genre_denylist: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            kmeans: KmeansParams::default(),
            dbscan: DbscanParams::default(),
            encoding: ScalarEncoding::default(),
            genre_denylist: BagOfWords::for_genres().denylist().iter().cloned().collect(),
        }
    }
}

impl PipelineConfig {
    /// Set the k-means cluster count.
    pub fn with_k(mut self, k: usize) -> Self {
        self.kmeans.k = k;
        self
    }

    /// Set the k-means seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.kmeans.seed = Some(seed);
        self
    }

    /// Set the number of k-means restarts.
    pub fn with_n_init(mut self, n_init: usize) -> Self {
        self.kmeans.n_init = n_init;
        self
    }

    /// Set the DBSCAN radius.
    pub fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.dbscan.epsilon = epsilon;
        self
    }

    /// Set the DBSCAN minimum neighborhood size.
    pub fn with_min_pts(mut self, min_pts: usize) -> Self {
        self.dbscan.min_pts = min_pts;
        self
    }

    /// Set the scalar encoding.
    pub fn with_encoding(mut self, encoding: ScalarEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Replace the genre denylist.
    pub fn with_genre_denylist<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genre_denylist = values.into_iter().map(Into::into).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::Clustering;
    use crate::features::GENRE_ARTIFACTS;

    #[test]
    fn test_defaults_match_reference_run() {
        let config = PipelineConfig::default();
        assert_eq!(config.kmeans.k, 4);
        assert_eq!(config.dbscan.epsilon, 3.0);
        assert_eq!(config.dbscan.min_pts, 2);
        assert_eq!(config.encoding, ScalarEncoding::Truncate);
        for token in GENRE_ARTIFACTS {
            assert!(config.genre_denylist.iter().any(|t| t == token));
        }
    }

    #[test]
    fn test_builders() {
        let config = PipelineConfig::default()
            .with_k(2)
            .with_seed(9)
            .with_epsilon(0.5)
            .with_min_pts(4)
            .with_genre_denylist(["x"]);
        assert_eq!(config.kmeans.build().n_clusters(), 2);
        assert_eq!(config.kmeans.seed, Some(9));
        assert_eq!(config.dbscan, DbscanParams { epsilon: 0.5, min_pts: 4 });
        assert_eq!(config.genre_denylist, vec!["x".to_string()]);
    }
}

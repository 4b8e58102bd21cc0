//! K-means clustering.
//!
//! Partitions items into k clusters by minimizing **within-cluster sum of squares**
//! (WCSS, reported as `inertia`).
//!
//! ```text
//! WCSS = Σₖ Σᵢ∈Cₖ ||xᵢ - μₖ||²
//! ```
//!
//! # Lloyd's Algorithm
//!
//! 1. Initialize k centroids via k-means++
//! 2. **Assign**: each row → nearest centroid (Euclidean)
//! 3. **Update**: each centroid → mean of assigned rows
//! 4. Repeat until the centroid shift drops below `tol` or `max_iter` is hit
//!
//! A final assignment pass against the converged centroids makes `labels` and
//! `inertia` consistent with the returned centroids.
//!
//! # Failure Modes
//!
//! - **Local optima**: Lloyd finds a local minimum only; `with_n_init` runs several
//!   seeded restarts and keeps the best.
//! - **Unscaled input**: columns with a large numeric range (tag counts, raw years)
//!   dominate the distance. No scaling is applied here.
//! - **Initialization sensitivity**: fix `with_seed` for reproducible labels.

use super::traits::Clustering;
use super::util::{squared_euclidean, validate_points};
use crate::error::{Error, Result};
use ndarray::{Array2, ArrayView1};
use rand::prelude::*;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// K-means clustering algorithm.
#[derive(Debug, Clone)]
pub struct Kmeans {
    /// Number of clusters.
    k: usize,
    /// Maximum iterations per run.
    max_iter: usize,
    /// Convergence tolerance on the squared centroid shift.
    tol: f64,
    /// Number of seeded restarts.
    n_init: usize,
    /// Random seed.
    seed: Option<u64>,
}

/// Result of a k-means fit.
#[derive(Debug, Clone)]
pub struct KmeansFit {
    /// Cluster label per row, in `[0, k)`.
    pub labels: Vec<usize>,
    /// Final centroids, shape `(k, d)`.
    pub centroids: Array2<f32>,
    /// Sum of squared distances from each row to its centroid.
    pub inertia: f64,
    /// Lloyd iterations used by the winning run.
    pub n_iter: usize,
}

impl Kmeans {
    /// Create a new K-means clusterer.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iter: 300,
            tol: 1e-4,
            n_init: 1,
            seed: None,
        }
    }

    /// Set maximum iterations.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set convergence tolerance.
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Set the number of restarts; the run with the lowest inertia wins.
    pub fn with_n_init(mut self, n_init: usize) -> Self {
        self.n_init = n_init;
        self
    }

    /// Set random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Fit the model and return labels, centroids and inertia.
    pub fn fit(&self, data: &[Vec<f32>]) -> Result<KmeansFit> {
        let d = validate_points(data)?;
        let n = data.len();

        if self.k == 0 || self.k > n {
            return Err(Error::InvalidClusterCount {
                requested: self.k,
                n_items: n,
            });
        }
        if self.max_iter == 0 {
            return Err(Error::InvalidParameter {
                name: "max_iter",
                message: "must be at least 1",
            });
        }
        if self.n_init == 0 {
            return Err(Error::InvalidParameter {
                name: "n_init",
                message: "must be at least 1",
            });
        }

        let flat: Vec<f32> = data.iter().flatten().copied().collect();
        let data_arr =
            Array2::from_shape_vec((n, d), flat).map_err(|e| Error::Other(e.to_string()))?;

        let mut rng: Box<dyn RngCore> = match self.seed {
            Some(s) => Box::new(StdRng::seed_from_u64(s)),
            None => Box::new(rand::rng()),
        };

        let mut best: Option<KmeansFit> = None;
        for run in 0..self.n_init {
            let fit = self.lloyd(&data_arr, &mut rng);
            tracing::debug!(run, inertia = fit.inertia, n_iter = fit.n_iter, "k-means run");
            let improved = match &best {
                Some(b) => fit.inertia < b.inertia,
                None => true,
            };
            if improved {
                best = Some(fit);
            }
        }

        best.ok_or(Error::EmptyInput)
    }

    /// One k-means++ seeded Lloyd run.
    fn lloyd(&self, data: &Array2<f32>, rng: &mut impl Rng) -> KmeansFit {
        let n = data.nrows();
        let d = data.ncols();

        let mut centroids = self.init_centroids(data, rng);
        let mut labels = vec![0usize; n];
        let mut n_iter = 0;

        for _ in 0..self.max_iter {
            n_iter += 1;
            assign(data, &centroids, &mut labels);

            // Update step
            let mut new_centroids = Array2::<f32>::zeros((self.k, d));
            let mut counts = vec![0usize; self.k];

            for (i, &k) in labels.iter().enumerate() {
                let mut row = new_centroids.row_mut(k);
                row += &data.row(i);
                counts[k] += 1;
            }

            for (k, &count) in counts.iter().enumerate() {
                if count > 0 {
                    new_centroids
                        .row_mut(k)
                        .mapv_inplace(|x| x / count as f32);
                } else {
                    // Empty cluster: reseed from a random row
                    let idx = rng.random_range(0..n);
                    new_centroids.row_mut(k).assign(&data.row(idx));
                }
            }

            let shift: f32 = centroids
                .iter()
                .zip(new_centroids.iter())
                .map(|(a, b)| (a - b).powi(2))
                .sum();

            centroids = new_centroids;

            if f64::from(shift) < self.tol {
                break;
            }
        }

        let inertia = assign(data, &centroids, &mut labels);

        KmeansFit {
            labels,
            centroids,
            inertia,
            n_iter,
        }
    }

    /// Initialize centroids using the k-means++ algorithm.
    fn init_centroids(&self, data: &Array2<f32>, rng: &mut impl Rng) -> Array2<f32> {
        let n = data.nrows();
        let d = data.ncols();
        let mut centroids = Array2::zeros((self.k, d));

        let first = rng.random_range(0..n);
        centroids.row_mut(0).assign(&data.row(first));

        // Distance from each row to its nearest chosen centroid so far.
        let mut nearest: Vec<f32> = (0..n)
            .map(|j| row_distance(&data.row(j), &centroids.row(0)))
            .collect();

        for i in 1..self.k {
            let total: f32 = nearest.iter().sum();
            let selected = if total <= 0.0 {
                rng.random_range(0..n)
            } else {
                let threshold = rng.random::<f32>() * total;
                let mut cumsum = 0.0;
                let mut selected = n - 1;
                for (j, &dist) in nearest.iter().enumerate() {
                    cumsum += dist;
                    if cumsum >= threshold {
                        selected = j;
                        break;
                    }
                }
                selected
            };

            centroids.row_mut(i).assign(&data.row(selected));
            for (j, dist) in nearest.iter_mut().enumerate() {
                *dist = dist.min(row_distance(&data.row(j), &centroids.row(i)));
            }
        }

        centroids
    }
}

#[inline]
fn row_distance(a: &ArrayView1<'_, f32>, b: &ArrayView1<'_, f32>) -> f32 {
    match (a.as_slice(), b.as_slice()) {
        (Some(a), Some(b)) => squared_euclidean(a, b),
        _ => a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum(),
    }
}

/// Index and squared distance of the centroid nearest to `point`. Ties go to
/// the lowest index.
#[inline]
fn nearest_centroid(point: &ArrayView1<'_, f32>, centroids: &Array2<f32>) -> (usize, f32) {
    let mut best_cluster = 0;
    let mut best_dist = f32::MAX;
    for (k, centroid) in centroids.rows().into_iter().enumerate() {
        let dist = row_distance(point, &centroid);
        if dist < best_dist {
            best_dist = dist;
            best_cluster = k;
        }
    }
    (best_cluster, best_dist)
}

/// Assignment step. Writes labels and returns the inertia.
///
/// Distances are summed in row order so the inertia, and with it the choice
/// between restarts, does not depend on thread scheduling.
fn assign(data: &Array2<f32>, centroids: &Array2<f32>, labels: &mut [usize]) -> f64 {
    #[cfg(feature = "parallel")]
    let nearest: Vec<(usize, f32)> = (0..data.nrows())
        .into_par_iter()
        .map(|i| nearest_centroid(&data.row(i), centroids))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let nearest: Vec<(usize, f32)> = (0..data.nrows())
        .map(|i| nearest_centroid(&data.row(i), centroids))
        .collect();

    let mut inertia = 0.0;
    for (label, (k, dist)) in labels.iter_mut().zip(nearest) {
        *label = k;
        inertia += f64::from(dist);
    }
    inertia
}

impl Clustering for Kmeans {
    fn fit_predict(&self, data: &[Vec<f32>]) -> Result<Vec<usize>> {
        Ok(self.fit(data)?.labels)
    }

    fn n_clusters(&self) -> usize {
        self.k
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kmeans_basic() {
        let data = vec![
            vec![0.0, 0.0],
            vec![0.1, 0.1],
            vec![10.0, 10.0],
            vec![10.1, 10.1],
        ];

        let kmeans = Kmeans::new(2).with_seed(42);
        let labels = kmeans.fit_predict(&data).unwrap();

        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[2], labels[3]);
        assert_ne!(labels[0], labels[2]);
    }

    #[test]
    fn test_kmeans_all_points_assigned() {
        let data: Vec<Vec<f32>> = (0..50)
            .map(|i| vec![i as f32 * 0.1, (i % 5) as f32])
            .collect();

        let kmeans = Kmeans::new(4).with_seed(123);
        let labels = kmeans.fit_predict(&data).unwrap();

        assert_eq!(labels.len(), data.len());
        for &label in &labels {
            assert!(label < 4, "label {} out of range", label);
        }
    }

    #[test]
    fn test_kmeans_k_equals_n() {
        let data = vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![0.0, 1.0]];

        let kmeans = Kmeans::new(3).with_seed(42);
        let labels = kmeans.fit_predict(&data).unwrap();

        let unique: std::collections::HashSet<_> = labels.iter().collect();
        assert_eq!(unique.len(), 3);
    }

    #[test]
    fn test_kmeans_deterministic_with_seed() {
        let data: Vec<Vec<f32>> = (0..30)
            .map(|i| vec![(i % 7) as f32, (i / 7) as f32 * 2.5, (i % 3) as f32])
            .collect();

        let a = Kmeans::new(4).with_seed(7).with_n_init(3).fit(&data).unwrap();
        let b = Kmeans::new(4).with_seed(7).with_n_init(3).fit(&data).unwrap();

        assert_eq!(a.labels, b.labels, "same seed should give same result");
        assert_eq!(a.centroids, b.centroids);
    }

    #[test]
    fn test_kmeans_identical_rows_share_label() {
        let data = vec![
            vec![1995.0, 3.0, 1.0, 0.0],
            vec![1995.0, 3.0, 1.0, 0.0],
            vec![2010.0, 4.0, 0.0, 1.0],
        ];
        for seed in 0..10 {
            let labels = Kmeans::new(2).with_seed(seed).fit_predict(&data).unwrap();
            assert_eq!(labels[0], labels[1], "seed {seed}");
        }
    }

    #[test]
    fn test_kmeans_inertia_matches_labels() {
        let data = vec![
            vec![0.0, 0.0],
            vec![0.0, 2.0],
            vec![10.0, 0.0],
            vec![10.0, 2.0],
        ];
        let fit = Kmeans::new(2).with_seed(1).with_n_init(5).fit(&data).unwrap();

        // Optimal partition: two pairs, each point 1.0 from its centroid.
        assert!((fit.inertia - 4.0).abs() < 1e-6, "inertia {}", fit.inertia);
        assert_eq!(fit.centroids.dim(), (2, 2));
        assert!(fit.n_iter >= 1);
    }

    #[test]
    fn test_kmeans_more_restarts_never_worse() {
        let data: Vec<Vec<f32>> = (0..40)
            .map(|i| vec![((i * 37) % 11) as f32, ((i * 13) % 17) as f32])
            .collect();
        let one = Kmeans::new(4).with_seed(3).fit(&data).unwrap();
        let many = Kmeans::new(4).with_seed(3).with_n_init(8).fit(&data).unwrap();
        assert!(many.inertia <= one.inertia + 1e-9);
    }

    #[test]
    fn test_kmeans_empty_input_error() {
        let data: Vec<Vec<f32>> = vec![];
        let result = Kmeans::new(2).fit_predict(&data);
        assert!(matches!(result, Err(Error::EmptyInput)));
    }

    #[test]
    fn test_kmeans_non_finite_error() {
        let data = vec![vec![0.0, 1.0], vec![f32::NAN, 1.0]];
        let result = Kmeans::new(1).fit_predict(&data);
        assert!(matches!(result, Err(Error::NonFiniteValue { row: 1, column: 0 })));
    }

    #[test]
    fn test_kmeans_invalid_k_error() {
        let data = vec![vec![0.0, 0.0], vec![1.0, 1.0]];
        assert!(matches!(
            Kmeans::new(5).fit_predict(&data),
            Err(Error::InvalidClusterCount { .. })
        ));
        assert!(matches!(
            Kmeans::new(0).fit_predict(&data),
            Err(Error::InvalidClusterCount { .. })
        ));
    }
}

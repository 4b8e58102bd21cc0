//! Clustering algorithms over the assembled feature matrix.
//!
//! Two independent strategies, each producing one label per item:
//!
//! ### K-means (partition)
//!
//! Assign each row to the nearest centroid, then update centroids to the mean of
//! their rows. Repeat.
//!
//! ```text
//! J = Σ_k Σ_{x ∈ C_k} ||x - μ_k||²
//! ```
//!
//! Every row gets a label in `[0, k)`; there is no unclustered outcome.
//!
//! ### DBSCAN (density)
//!
//! Rows in dense regions (core rows and rows reachable from them) share a label;
//! everything else is [`NOISE`]. The number of clusters is discovered, not given.
//!
//! Neither algorithm rescales its input. Both reject empty, ragged or non-finite
//! matrices with an error instead of producing labels.
//!
//! ## Usage
//!
//! ```rust
//! use tessera::cluster::{Clustering, Dbscan, Kmeans, NOISE};
//!
//! let data = vec![
//!     vec![0.0, 0.0],
//!     vec![0.1, 0.1],
//!     vec![10.0, 10.0],
//!     vec![10.1, 10.1],
//!     vec![50.0, 50.0],
//! ];
//!
//! let labels = Kmeans::new(2).with_seed(42).fit_predict(&data).unwrap();
//! assert_eq!(labels[0], labels[1]);
//! assert_ne!(labels[0], labels[2]);
//!
//! let labels = Dbscan::new(0.5, 2).fit_predict(&data).unwrap();
//! assert_eq!(labels[0], labels[1]);
//! assert_eq!(labels[4], NOISE);
//! ```

mod assignment;
mod dbscan;
mod kmeans;
mod traits;
mod util;

pub use assignment::ClusterAssignment;
pub use dbscan::{Dbscan, DbscanExt, NOISE};
pub use kmeans::{Kmeans, KmeansFit};
pub use traits::Clustering;

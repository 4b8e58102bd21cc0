//! # tessera
//!
//! Per-item feature matrices from catalog data, and two unsupervised groupings of
//! the items.
//!
//! Three record sets (item metadata, rating events, tag events) are reduced to one
//! dense, zero-filled bag-of-words matrix with columns
//! `[year, rating, genres…, tags…]`, which is then clustered with k-means and
//! DBSCAN.
//!
//! - [`features`]: title parsing, rating means, tag and genre counting, the
//!   bag-of-words pivot and matrix assembly.
//! - [`cluster`]: k-means (k-means++ seeding, Lloyd iterations) and DBSCAN.
//! - [`pipeline`]: the batch run tying both together.
//! - [`io`]: CSV readers and writers around the core.
//!
//! The `parallel` feature (default) spreads the counting reductions, the k-means
//! assignment step and DBSCAN neighborhood queries over rayon's pool.

#![forbid(unsafe_code)]

pub mod cluster;
pub mod config;
/// Error types used across `tessera`.
pub mod error;
pub mod features;
pub mod io;
pub mod pipeline;

pub use cluster::{ClusterAssignment, Clustering, Dbscan, DbscanExt, Kmeans, KmeansFit, NOISE};
pub use config::{DbscanParams, KmeansParams, PipelineConfig};
pub use error::{Error, Result};
pub use features::{Column, FeatureMatrix, ItemId, ItemRecord, RatingEvent, ScalarEncoding, TagEvent};
pub use pipeline::{Clusters, Pipeline, PipelineOutput};

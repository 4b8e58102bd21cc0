//! Feature matrix and clustering tool.
//!
//! Reads `movies.csv`, `ratings.csv` and `tags.csv`, writes the feature matrix and
//! the k-means / DBSCAN labels as CSV.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tessera::io::{read_items, read_ratings, read_tags, write_assignments, write_matrix};
use tessera::{Pipeline, PipelineConfig, ScalarEncoding};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Encoding {
    /// Truncate year and mean rating to integers
    Truncate,
    /// Keep the fractional mean rating
    Fractional,
}

impl From<Encoding> for ScalarEncoding {
    fn from(value: Encoding) -> Self {
        match value {
            Encoding::Truncate => ScalarEncoding::Truncate,
            Encoding::Fractional => ScalarEncoding::Fractional,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "tessera")]
#[command(about = "Build a bag-of-words feature matrix from catalog data and cluster it")]
struct Args {
    /// Item metadata CSV (movieId,title,genres)
    #[arg(long, value_name = "PATH")]
    items: PathBuf,

    /// Rating events CSV (movieId,rating,...)
    #[arg(long, value_name = "PATH")]
    ratings: PathBuf,

    /// Tag events CSV (movieId,tag,...)
    #[arg(long, value_name = "PATH")]
    tags: PathBuf,

    /// Where to write the feature matrix
    #[arg(long, value_name = "PATH", default_value = "diction.csv")]
    matrix_out: PathBuf,

    /// Where to write the cluster labels
    #[arg(long, value_name = "PATH", default_value = "clusters.csv")]
    clusters_out: PathBuf,

    /// Number of k-means clusters
    #[arg(short, long, default_value_t = 4)]
    k: usize,

    /// k-means restarts
    #[arg(long, default_value_t = 10)]
    n_init: usize,

    /// k-means seed; omit for a random initialization
    #[arg(long)]
    seed: Option<u64>,

    /// DBSCAN neighborhood radius
    #[arg(long, default_value_t = 3.0)]
    eps: f32,

    /// DBSCAN minimum neighborhood size, the item itself included
    #[arg(long, default_value_t = 2)]
    min_samples: usize,

    /// Year/rating encoding
    #[arg(long, value_enum, default_value_t = Encoding::Truncate)]
    encoding: Encoding,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let items = read_items(&args.items)
        .with_context(|| format!("loading items from {}", args.items.display()))?;
    let ratings = read_ratings(&args.ratings)
        .with_context(|| format!("loading ratings from {}", args.ratings.display()))?;
    let tags = read_tags(&args.tags)
        .with_context(|| format!("loading tags from {}", args.tags.display()))?;
    info!(
        items = items.len(),
        ratings = ratings.len(),
        tags = tags.len(),
        "loaded input records"
    );

    let mut config = PipelineConfig::default()
        .with_k(args.k)
        .with_n_init(args.n_init)
        .with_epsilon(args.eps)
        .with_min_pts(args.min_samples)
        .with_encoding(args.encoding.into());
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let output = Pipeline::new(config)
        .run(&items, &ratings, &tags)
        .context("pipeline run failed")?;

    write_matrix(&args.matrix_out, &output.matrix).context("writing feature matrix")?;
    write_assignments(
        &args.clusters_out,
        &output.clusters.partition,
        &output.clusters.density,
    )
    .context("writing cluster labels")?;

    info!(
        kmeans_clusters = output.clusters.partition.n_clusters(),
        dbscan_clusters = output.clusters.density.n_clusters(),
        dbscan_noise = output.clusters.density.noise_count(),
        "done"
    );

    Ok(())
}

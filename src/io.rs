//! CSV ingestion and flat-file output.
//!
//! Inputs follow the MovieLens layout (`movies.csv`, `ratings.csv`, `tags.csv`);
//! columns the pipeline does not consume (`userId`, `timestamp`) are ignored.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::cluster::{ClusterAssignment, NOISE};
use crate::error::{Error, Result};
use crate::features::{FeatureMatrix, ItemRecord, RatingEvent, TagEvent};

fn csv_err(path: &Path) -> impl FnOnce(csv::Error) -> Error + '_ {
    move |source| Error::Csv {
        path: path.to_path_buf(),
        source,
    }
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn create(path: &Path) -> Result<File> {
    File::create(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Deserialize every record of a headed CSV stream. `origin` names the source in
/// errors.
pub fn read_records<T: DeserializeOwned>(reader: impl Read, origin: &Path) -> Result<Vec<T>> {
    let mut reader = csv::Reader::from_reader(reader);
    reader
        .deserialize::<T>()
        .map(|record| record.map_err(csv_err(origin)))
        .collect()
}

/// Read item metadata (`movieId,title,genres`).
pub fn read_items(path: impl AsRef<Path>) -> Result<Vec<ItemRecord>> {
    let path = path.as_ref();
    let records = read_records(open(path)?, path)?;
    tracing::debug!(path = %path.display(), records = records.len(), "read items");
    Ok(records)
}

/// Read rating events (`movieId,rating`, other columns ignored).
pub fn read_ratings(path: impl AsRef<Path>) -> Result<Vec<RatingEvent>> {
    let path = path.as_ref();
    let records = read_records(open(path)?, path)?;
    tracing::debug!(path = %path.display(), records = records.len(), "read ratings");
    Ok(records)
}

/// Read tag events (`movieId,tag`, other columns ignored).
pub fn read_tags(path: impl AsRef<Path>) -> Result<Vec<TagEvent>> {
    let path = path.as_ref();
    let records = read_records(open(path)?, path)?;
    tracing::debug!(path = %path.display(), records = records.len(), "read tags");
    Ok(records)
}

/// Write the matrix with a `movieId` key column and one header label per column.
pub fn write_matrix_to(writer: impl Write, matrix: &FeatureMatrix, origin: &Path) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);

    let mut header = Vec::with_capacity(matrix.n_columns() + 1);
    header.push("movieId".to_string());
    header.extend(matrix.column_names());
    out.write_record(&header).map_err(csv_err(origin))?;

    for (item, row) in matrix.item_ids().iter().zip(matrix.values().rows()) {
        let mut record = Vec::with_capacity(row.len() + 1);
        record.push(item.to_string());
        record.extend(row.iter().map(|v| v.to_string()));
        out.write_record(&record).map_err(csv_err(origin))?;
    }

    out.flush().map_err(|source| Error::Io {
        path: origin.to_path_buf(),
        source,
    })
}

/// Write the matrix to `path`.
pub fn write_matrix(path: impl AsRef<Path>, matrix: &FeatureMatrix) -> Result<()> {
    let path = path.as_ref();
    write_matrix_to(create(path)?, matrix, path)?;
    tracing::info!(path = %path.display(), rows = matrix.n_items(), "wrote feature matrix");
    Ok(())
}

/// Write `movieId,kmeans,dbscan`; noise is written as `-1`.
pub fn write_assignments_to(
    writer: impl Write,
    partition: &ClusterAssignment,
    density: &ClusterAssignment,
    origin: &Path,
) -> Result<()> {
    if partition.item_ids() != density.item_ids() {
        return Err(Error::Other(
            "assignments cover different items".to_string(),
        ));
    }

    let mut out = csv::Writer::from_writer(writer);
    out.write_record(["movieId", "kmeans", "dbscan"])
        .map_err(csv_err(origin))?;

    for ((item, k), (_, d)) in partition.iter().zip(density.iter()) {
        let d = if d == NOISE { -1 } else { d as i64 };
        out.write_record([item.to_string(), k.to_string(), d.to_string()])
            .map_err(csv_err(origin))?;
    }

    out.flush().map_err(|source| Error::Io {
        path: origin.to_path_buf(),
        source,
    })
}

/// Write both assignments to `path`.
pub fn write_assignments(
    path: impl AsRef<Path>,
    partition: &ClusterAssignment,
    density: &ClusterAssignment,
) -> Result<()> {
    let path = path.as_ref();
    write_assignments_to(create(path)?, partition, density, path)?;
    tracing::info!(path = %path.display(), "wrote cluster assignments");
    Ok(())
}

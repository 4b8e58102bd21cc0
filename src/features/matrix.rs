//! Feature matrix assembly.
//!
//! Column layout is fixed: `year`, `rating`, the genre block in label order, then
//! the tag block in label order. Rows are items in ascending id order.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use ndarray::{Array2, ArrayView1};

use super::bow::CountBlock;
use super::records::ItemId;
use crate::error::{Error, Result};

/// Identity of one feature column.
///
/// Genre and tag columns are distinct variants, so a genre and a tag with the
/// same text never share a column.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    /// Release year.
    Year,
    /// Mean rating.
    Rating,
    /// Genre token count.
    Genre(String),
    /// Tag occurrence count.
    Tag(String),
}

impl Column {
    /// Bare label without the kind qualifier.
    pub fn label(&self) -> &str {
        match self {
            Column::Year => "year",
            Column::Rating => "rating",
            Column::Genre(label) | Column::Tag(label) => label,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Column::Year | Column::Rating => f.write_str(self.label()),
            Column::Genre(label) => write!(f, "genre:{label}"),
            Column::Tag(label) => write!(f, "tag:{label}"),
        }
    }
}

/// How the year and rating scalars are encoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScalarEncoding {
    /// Truncate year and mean rating toward zero (a 3.8 mean becomes 3).
    /// Missing values are 0.
    #[default]
    Truncate,
    /// Keep the fractional mean rating. Missing values are still 0.
    Fractional,
}

/// Dense, fully populated item × feature matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    item_ids: Vec<ItemId>,
    columns: Vec<Column>,
    values: Array2<f32>,
}

impl FeatureMatrix {
    /// Number of rows.
    pub fn n_items(&self) -> usize {
        self.item_ids.len()
    }

    /// Number of columns: 2 + genre vocabulary + tag vocabulary.
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Row keys, ascending.
    pub fn item_ids(&self) -> &[ItemId] {
        &self.item_ids
    }

    /// Column identities in order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Header labels for flat-file output.
    ///
    /// Labels are bare unless a genre and a tag (or a reserved scalar name) share
    /// the same text, in which case the colliding columns are written qualified
    /// (`genre:Comedy`, `tag:Comedy`).
    pub fn column_names(&self) -> Vec<String> {
        let mut seen: BTreeMap<&str, usize> = BTreeMap::new();
        for column in &self.columns {
            *seen.entry(column.label()).or_insert(0) += 1;
        }
        self.columns
            .iter()
            .map(|column| match column {
                Column::Genre(_) | Column::Tag(_) if seen[column.label()] > 1 => column.to_string(),
                _ => column.label().to_owned(),
            })
            .collect()
    }

    /// The underlying `(n_items, n_columns)` array.
    pub fn values(&self) -> &Array2<f32> {
        &self.values
    }

    /// Position of `column`.
    pub fn column_index(&self, column: &Column) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Feature row of `item`.
    pub fn row(&self, item: ItemId) -> Option<ArrayView1<'_, f32>> {
        self.item_ids
            .binary_search(&item)
            .ok()
            .map(|idx| self.values.row(idx))
    }

    /// Value of one cell.
    pub fn get(&self, item: ItemId, column: &Column) -> Option<f32> {
        let col = self.column_index(column)?;
        self.row(item).map(|row| row[col])
    }

    /// Sum of the tag columns of `item`.
    pub fn tag_total(&self, item: ItemId) -> Option<f32> {
        let row = self.row(item)?;
        Some(
            self.columns
                .iter()
                .zip(row.iter())
                .filter(|(c, _)| matches!(c, Column::Tag(_)))
                .map(|(_, v)| *v)
                .sum(),
        )
    }

    /// Copy out as one `Vec` per row, the input shape of the clustering engine.
    pub fn to_rows(&self) -> Vec<Vec<f32>> {
        self.values.rows().into_iter().map(|r| r.to_vec()).collect()
    }
}

/// Joins the scalar features and both count blocks into a [`FeatureMatrix`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Assembler {
    encoding: ScalarEncoding,
}

impl Assembler {
    /// Create an assembler with the given scalar encoding.
    pub fn new(encoding: ScalarEncoding) -> Self {
        Self { encoding }
    }

    /// Outer-join `genres` and `tags` on item id and prepend year and rating.
    ///
    /// Items present in only one block get zeros in the other. Items without a
    /// year or a rating get 0 in that column.
    pub fn assemble(
        &self,
        years: &BTreeMap<ItemId, i32>,
        ratings: &BTreeMap<ItemId, f64>,
        genres: &CountBlock,
        tags: &CountBlock,
    ) -> Result<FeatureMatrix> {
        let item_ids: Vec<ItemId> = genres
            .item_ids()
            .chain(tags.item_ids())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let n_genres = genres.n_columns();
        let n_tags = tags.n_columns();
        let width = 2 + n_genres + n_tags;

        let mut columns = Vec::with_capacity(width);
        columns.push(Column::Year);
        columns.push(Column::Rating);
        columns.extend(genres.vocabulary().labels().iter().cloned().map(Column::Genre));
        columns.extend(tags.vocabulary().labels().iter().cloned().map(Column::Tag));

        let mut flat: Vec<f32> = Vec::with_capacity(item_ids.len() * width);
        for &item in &item_ids {
            flat.push(years.get(&item).map_or(0.0, |&y| y as f32));
            flat.push(ratings.get(&item).map_or(0.0, |&r| self.encode_rating(r)));
            push_counts(&mut flat, genres.row(item), n_genres);
            push_counts(&mut flat, tags.row(item), n_tags);
        }

        let values = Array2::from_shape_vec((item_ids.len(), width), flat)
            .map_err(|e| Error::Other(e.to_string()))?;

        Ok(FeatureMatrix {
            item_ids,
            columns,
            values,
        })
    }

    fn encode_rating(&self, mean: f64) -> f32 {
        match self.encoding {
            ScalarEncoding::Truncate => mean.trunc() as f32,
            ScalarEncoding::Fractional => mean as f32,
        }
    }
}

fn push_counts(flat: &mut Vec<f32>, row: Option<&[u32]>, width: usize) {
    match row {
        Some(counts) => flat.extend(counts.iter().map(|&c| c as f32)),
        None => flat.resize(flat.len() + width, 0.0),
    }
}

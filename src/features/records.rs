//! Input records and the long-form count table shared by the counting stages.

use serde::{Deserialize, Serialize};

/// Stable item key (`movieId` in the MovieLens layout).
pub type ItemId = u64;

/// One row of item metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    /// Item key.
    #[serde(rename = "movieId")]
    pub id: ItemId,
    /// Title with a trailing parenthesized year, e.g. `Heat (1995)`.
    pub title: String,
    /// Delimited genre field, e.g. `Action|Crime|Thriller`.
    pub genres: String,
}

impl ItemRecord {
    /// Build a record from its three fields.
    pub fn new(id: ItemId, title: impl Into<String>, genres: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            genres: genres.into(),
        }
    }
}

/// A single rating of one item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingEvent {
    /// Rated item.
    #[serde(rename = "movieId")]
    pub item: ItemId,
    /// Rating value.
    pub rating: f64,
}

impl RatingEvent {
    /// Build a rating event.
    pub fn new(item: ItemId, rating: f64) -> Self {
        Self { item, rating }
    }
}

/// A single free-text tag applied to one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagEvent {
    /// Tagged item.
    #[serde(rename = "movieId")]
    pub item: ItemId,
    /// Tag text, kept verbatim.
    pub tag: String,
}

impl TagEvent {
    /// Build a tag event.
    pub fn new(item: ItemId, tag: impl Into<String>) -> Self {
        Self {
            item,
            tag: tag.into(),
        }
    }
}

/// One `(item, category value, count)` triple of a long-form table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CategoryCount {
    /// Item key.
    pub item: ItemId,
    /// Category value (a genre token or a tag string).
    pub value: String,
    /// Occurrences of `value` for `item`.
    pub count: u32,
}

impl CategoryCount {
    /// Build a triple.
    pub fn new(item: ItemId, value: impl Into<String>, count: u32) -> Self {
        Self {
            item,
            value: value.into(),
            count,
        }
    }
}

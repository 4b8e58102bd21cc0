//! Per-item cluster labels.

use std::collections::BTreeSet;

use super::dbscan::NOISE;
use crate::error::{Error, Result};
use crate::features::ItemId;

/// Mapping from item id to the label one clustering algorithm gave it.
///
/// Labels from different algorithms live in different label spaces and must not
/// be compared. Density clustering uses [`NOISE`] for unclustered items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterAssignment {
    item_ids: Vec<ItemId>,
    labels: Vec<usize>,
}

impl ClusterAssignment {
    /// Pair each item id with the label at the same row.
    pub fn new(item_ids: Vec<ItemId>, labels: Vec<usize>) -> Result<Self> {
        if item_ids.len() != labels.len() {
            return Err(Error::DimensionMismatch {
                expected: item_ids.len(),
                found: labels.len(),
            });
        }
        Ok(Self { item_ids, labels })
    }

    /// Label of `item`, or `None` if the item was not clustered.
    pub fn label_of(&self, item: ItemId) -> Option<usize> {
        self.item_ids
            .binary_search(&item)
            .ok()
            .or_else(|| self.item_ids.iter().position(|&id| id == item))
            .map(|row| self.labels[row])
    }

    /// Labels in row order.
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Item ids in row order.
    pub fn item_ids(&self) -> &[ItemId] {
        &self.item_ids
    }

    /// Number of distinct non-noise labels.
    pub fn n_clusters(&self) -> usize {
        self.labels
            .iter()
            .filter(|&&l| l != NOISE)
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Number of items labelled [`NOISE`].
    pub fn noise_count(&self) -> usize {
        self.labels.iter().filter(|&&l| l == NOISE).count()
    }

    /// Iterate `(item, label)` pairs in row order.
    pub fn iter(&self) -> impl Iterator<Item = (ItemId, usize)> + '_ {
        self.item_ids.iter().copied().zip(self.labels.iter().copied())
    }

    /// Number of labelled items.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// True when no item is labelled.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

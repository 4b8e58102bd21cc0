//! Bag-of-words pivot: long-form `(item, value, count)` triples to a dense,
//! zero-filled count block.
//!
//! Construction is two-pass. The vocabulary is computed first as a pure
//! reduction over the whole table (sorted distinct values, minus the denylist),
//! then rows are built as a mapping-of-mappings `item → {value: count}` and
//! materialized against that fixed column index. Column order therefore depends
//! only on the set of values observed, never on row order.

use std::collections::{BTreeMap, BTreeSet};

use super::records::{CategoryCount, ItemId};

/// Tokens the genre splitter produces from separator text rather than real
/// genres: the empty string and the words of the `(no genres listed)` marker.
pub const GENRE_ARTIFACTS: &[&str] = &["", "genres", "listed", "no"];

/// Sorted, deduplicated category labels defining the columns of one block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    labels: Vec<String>,
}

impl Vocabulary {
    /// Collect the distinct values of `table`, dropping any in `denylist`.
    pub fn from_counts<'a>(
        table: impl IntoIterator<Item = &'a CategoryCount>,
        denylist: &BTreeSet<String>,
    ) -> Self {
        let labels: BTreeSet<&str> = table
            .into_iter()
            .map(|c| c.value.as_str())
            .filter(|v| !denylist.contains(*v))
            .collect();
        Self {
            labels: labels.into_iter().map(str::to_owned).collect(),
        }
    }

    /// Column index of `label`.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.labels
            .binary_search_by(|probe| probe.as_str().cmp(label))
            .ok()
    }

    /// True if `label` is a column.
    pub fn contains(&self, label: &str) -> bool {
        self.index_of(label).is_some()
    }

    /// Labels in column order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// True when there are no columns.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Dense count matrix for one category kind (genres or tags).
///
/// Rows are keyed by item id in ascending order; columns follow the vocabulary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CountBlock {
    vocabulary: Vocabulary,
    rows: BTreeMap<ItemId, Vec<u32>>,
}

impl CountBlock {
    /// Column labels.
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Counts for `item`, or `None` if the item has no row in this block.
    pub fn row(&self, item: ItemId) -> Option<&[u32]> {
        self.rows.get(&item).map(Vec::as_slice)
    }

    /// Count of `label` for `item`, 0 when either is absent.
    pub fn count(&self, item: ItemId, label: &str) -> u32 {
        match (self.rows.get(&item), self.vocabulary.index_of(label)) {
            (Some(row), Some(col)) => row[col],
            _ => 0,
        }
    }

    /// Item ids with a row, ascending.
    pub fn item_ids(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.rows.keys().copied()
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn n_columns(&self) -> usize {
        self.vocabulary.len()
    }
}

/// Builder for [`CountBlock`]s.
#[derive(Debug, Clone, Default)]
pub struct BagOfWords {
    denylist: BTreeSet<String>,
}

impl BagOfWords {
    /// A builder with an empty denylist.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder preconfigured with [`GENRE_ARTIFACTS`].
    pub fn for_genres() -> Self {
        Self::new().with_denylist(GENRE_ARTIFACTS.iter().copied())
    }

    /// Drop these values before they reach the vocabulary.
    pub fn with_denylist<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.denylist.extend(values.into_iter().map(Into::into));
        self
    }

    /// Values this builder drops.
    pub fn denylist(&self) -> &BTreeSet<String> {
        &self.denylist
    }

    /// Pivot `table` into a dense block.
    ///
    /// Every item appearing in `table` gets a row, even if all of its values are
    /// denylisted; `row_keys` adds rows for further items (all zeros unless they
    /// also appear in `table`). Duplicate triples for the same `(item, value)`
    /// are summed.
    pub fn build(
        &self,
        table: &[CategoryCount],
        row_keys: impl IntoIterator<Item = ItemId>,
    ) -> CountBlock {
        let vocabulary = Vocabulary::from_counts(table, &self.denylist);

        let mut wide: BTreeMap<ItemId, BTreeMap<&str, u32>> = BTreeMap::new();
        for key in row_keys {
            wide.entry(key).or_default();
        }
        for entry in table {
            let cells = wide.entry(entry.item).or_default();
            if vocabulary.contains(&entry.value) {
                *cells.entry(entry.value.as_str()).or_insert(0) += entry.count;
            }
        }

        let rows = wide
            .into_iter()
            .map(|(item, cells)| {
                let mut dense = vec![0u32; vocabulary.len()];
                for (label, count) in cells {
                    if let Some(col) = vocabulary.index_of(label) {
                        dense[col] = count;
                    }
                }
                (item, dense)
            })
            .collect();

        tracing::debug!(
            columns = vocabulary.len(),
            denylisted = self.denylist.len(),
            "built count block"
        );

        CountBlock { vocabulary, rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Vec<CategoryCount> {
        vec![
            CategoryCount::new(2, "Comedy", 1),
            CategoryCount::new(1, "Drama", 1),
            CategoryCount::new(1, "Comedy", 1),
            CategoryCount::new(3, "", 1),
            CategoryCount::new(3, "no", 1),
            CategoryCount::new(3, "genres", 1),
            CategoryCount::new(3, "listed", 1),
        ]
    }

    #[test]
    fn test_vocabulary_sorted_and_filtered() {
        let block = BagOfWords::for_genres().build(&table(), []);
        assert_eq!(block.vocabulary().labels(), ["Comedy", "Drama"]);
        assert!(!block.vocabulary().contains(""));
        assert!(!block.vocabulary().contains("no"));
    }

    #[test]
    fn test_zero_fill_and_rows() {
        let block = BagOfWords::for_genres().build(&table(), []);
        assert_eq!(block.row(1), Some(&[1, 1][..]));
        assert_eq!(block.row(2), Some(&[1, 0][..]));
        // Item 3 only had artifacts: it keeps an all-zero row.
        assert_eq!(block.row(3), Some(&[0, 0][..]));
        assert_eq!(block.count(2, "Drama"), 0);
        assert_eq!(block.count(99, "Drama"), 0);
    }

    #[test]
    fn test_row_keys_add_empty_rows() {
        let block = BagOfWords::new().build(&[CategoryCount::new(1, "a", 2)], [1, 5]);
        assert_eq!(block.item_ids().collect::<Vec<_>>(), vec![1, 5]);
        assert_eq!(block.row(5), Some(&[0][..]));
    }

    #[test]
    fn test_duplicate_triples_sum() {
        let t = vec![CategoryCount::new(1, "x", 2), CategoryCount::new(1, "x", 3)];
        let block = BagOfWords::new().build(&t, []);
        assert_eq!(block.count(1, "x"), 5);
    }

    #[test]
    fn test_column_order_independent_of_row_order() {
        let mut t = table();
        let a = BagOfWords::for_genres().build(&t, []);
        t.reverse();
        let b = BagOfWords::for_genres().build(&t, []);
        assert_eq!(a, b);
    }

    #[test]
    fn test_without_denylist_artifacts_survive() {
        let block = BagOfWords::new().build(&table(), []);
        assert!(block.vocabulary().contains(""));
        assert_eq!(block.n_columns(), 6);
    }
}

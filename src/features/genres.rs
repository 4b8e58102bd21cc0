//! Genre field tokenization.
//!
//! The genre field is split on every run of characters outside `[A-Za-z-]`. The
//! rule is deliberately naive: the `(no genres listed)` marker yields the tokens
//! `no`, `genres` and `listed`, and a leading separator yields an empty token.
//! Those artifacts are left in place here and removed by the bag-of-words
//! denylist ([`GENRE_ARTIFACTS`](super::GENRE_ARTIFACTS)).

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::Regex;

use super::records::{CategoryCount, ItemId, ItemRecord};

static GENRE_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z-]+").expect("separator pattern is valid"));

/// Split a raw genre field into its distinct tokens.
pub fn tokenize_genres(raw: &str) -> BTreeSet<String> {
    GENRE_SEPARATOR
        .split(raw.trim())
        .map(str::to_owned)
        .collect()
}

/// Long-form genre table: one `(item, genre, 1)` triple per distinct token.
///
/// Repeated tokens within one item collapse to a single occurrence. Records
/// sharing an id contribute the union of their tokens. Sorted by item, then genre.
pub fn genre_counts(items: &[ItemRecord]) -> Vec<CategoryCount> {
    let mut by_item: BTreeMap<ItemId, BTreeSet<String>> = BTreeMap::new();
    for item in items {
        by_item
            .entry(item.id)
            .or_default()
            .extend(tokenize_genres(&item.genres));
    }

    by_item
        .into_iter()
        .flat_map(|(id, genres)| {
            genres
                .into_iter()
                .map(move |genre| CategoryCount::new(id, genre, 1))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(tokens: &[&str]) -> BTreeSet<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_pipe_delimited() {
        assert_eq!(
            tokenize_genres("Adventure|Animation|Children|Comedy|Fantasy"),
            set(&["Adventure", "Animation", "Children", "Comedy", "Fantasy"])
        );
    }

    #[test]
    fn test_hyphen_kept() {
        assert_eq!(tokenize_genres("Film-Noir|Sci-Fi"), set(&["Film-Noir", "Sci-Fi"]));
    }

    #[test]
    fn test_no_genres_marker_emits_artifacts() {
        assert_eq!(
            tokenize_genres("(no genres listed)"),
            set(&["", "no", "genres", "listed"])
        );
    }

    #[test]
    fn test_duplicates_collapse() {
        let items = vec![ItemRecord::new(9, "X (2000)", "Drama|Drama|War")];
        let counts = genre_counts(&items);
        assert_eq!(
            counts,
            vec![
                CategoryCount::new(9, "Drama", 1),
                CategoryCount::new(9, "War", 1),
            ]
        );
    }

    #[test]
    fn test_duplicate_ids_union() {
        let items = vec![
            ItemRecord::new(4, "A (2000)", "Drama|War"),
            ItemRecord::new(4, "A (2000)", "Drama|Romance"),
        ];
        let counts = genre_counts(&items);
        assert_eq!(
            counts,
            vec![
                CategoryCount::new(4, "Drama", 1),
                CategoryCount::new(4, "Romance", 1),
                CategoryCount::new(4, "War", 1),
            ]
        );
    }

    #[test]
    fn test_empty_field() {
        assert_eq!(tokenize_genres(""), set(&[""]));
        assert_eq!(tokenize_genres("   "), set(&[""]));
    }
}

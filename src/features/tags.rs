//! Tag occurrence counts per `(item, tag)` pair.

use std::collections::BTreeMap;

use super::records::{CategoryCount, ItemId, TagEvent};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

type Counts<'a> = BTreeMap<(ItemId, &'a str), u32>;

fn fold_event<'a>(mut acc: Counts<'a>, event: &'a TagEvent) -> Counts<'a> {
    *acc.entry((event.item, event.tag.as_str())).or_insert(0) += 1;
    acc
}

fn merge_counts<'a>(mut left: Counts<'a>, right: Counts<'a>) -> Counts<'a> {
    for (key, count) in right {
        *left.entry(key).or_insert(0) += count;
    }
    left
}

/// Count tag events by `(item, tag)`.
///
/// Tag text is not normalized: `"Funny"`, `"funny"` and `"funny "` are three
/// different tags. Events with an empty tag are dropped. The result is sorted by
/// item, then tag.
pub fn count_tags(events: &[TagEvent]) -> Vec<CategoryCount> {
    #[cfg(feature = "parallel")]
    let counts = events
        .par_iter()
        .filter(|event| !event.tag.is_empty())
        .fold(Counts::new, fold_event)
        .reduce(Counts::new, merge_counts);

    #[cfg(not(feature = "parallel"))]
    let counts = events
        .iter()
        .filter(|event| !event.tag.is_empty())
        .fold(Counts::new(), fold_event);

    counts
        .into_iter()
        .map(|((item, tag), count)| CategoryCount::new(item, tag, count))
        .collect()
}

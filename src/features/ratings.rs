//! Mean rating per item.
//!
//! Partial results are `(sum, count)` pairs, which merge associatively, so the
//! reduction can be split across threads and combined in any order. Averaging
//! partial means would not have this property.

use std::collections::BTreeMap;

use super::records::{ItemId, RatingEvent};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Accumulator {
    sum: f64,
    count: u64,
}

impl Accumulator {
    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn merge(&mut self, other: Accumulator) {
        self.sum += other.sum;
        self.count += other.count;
    }

    fn mean(self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

type Partial = BTreeMap<ItemId, Accumulator>;

fn fold_event(mut acc: Partial, event: &RatingEvent) -> Partial {
    if event.rating.is_finite() {
        acc.entry(event.item).or_default().push(event.rating);
    }
    acc
}

fn merge_partials(mut left: Partial, right: Partial) -> Partial {
    for (item, acc) in right {
        left.entry(item).or_default().merge(acc);
    }
    left
}

/// Reduce rating events to one arithmetic mean per item.
///
/// Items without events are absent from the result. Duplicate events count with
/// full multiplicity. Non-finite ratings are dropped and reported with a warning.
pub fn aggregate_ratings(events: &[RatingEvent]) -> BTreeMap<ItemId, f64> {
    #[cfg(feature = "parallel")]
    let partial = events
        .par_iter()
        .fold(Partial::new, fold_event)
        .reduce(Partial::new, merge_partials);

    #[cfg(not(feature = "parallel"))]
    let partial = events.iter().fold(Partial::new(), fold_event);

    let skipped = events.iter().filter(|e| !e.rating.is_finite()).count();
    if skipped > 0 {
        tracing::warn!(skipped, "ignored non-finite rating values");
    }

    partial
        .into_iter()
        .filter_map(|(item, acc)| acc.mean().map(|mean| (item, mean)))
        .collect()
}

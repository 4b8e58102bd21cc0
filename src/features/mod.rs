//! Feature engineering: three record sets in, one aligned bag-of-words matrix out.
//!
//! ```text
//! items ──► title::parse_year ───────────────┐
//!       └─► genres::genre_counts ─► bow ──┐  │
//! ratings ► ratings::aggregate_ratings ───┼──┼─► matrix::Assembler ─► FeatureMatrix
//! tags ───► tags::count_tags ──────► bow ─┘  │
//! ```
//!
//! Every stage borrows its inputs and returns a fresh owned table.
//!
//! ## Usage
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use tessera::features::{
//!     aggregate_ratings, count_tags, genre_counts, parse_year, Assembler, BagOfWords,
//!     ItemRecord, RatingEvent, TagEvent,
//! };
//!
//! let items = vec![
//!     ItemRecord::new(1, "Toy Story (1995)", "Animation|Comedy"),
//!     ItemRecord::new(2, "Heat (1995)", "Action|Crime"),
//! ];
//! let ratings = vec![RatingEvent::new(1, 4.0), RatingEvent::new(1, 3.5)];
//! let tags = vec![TagEvent::new(2, "heist")];
//!
//! let years: BTreeMap<_, _> = items
//!     .iter()
//!     .filter_map(|i| parse_year(&i.title).map(|y| (i.id, y)))
//!     .collect();
//! let genres = BagOfWords::for_genres().build(&genre_counts(&items), items.iter().map(|i| i.id));
//! let tag_block = BagOfWords::new().build(&count_tags(&tags), []);
//!
//! let matrix = Assembler::default()
//!     .assemble(&years, &aggregate_ratings(&ratings), &genres, &tag_block)
//!     .unwrap();
//! assert_eq!(matrix.n_items(), 2);
//! assert_eq!(matrix.n_columns(), 2 + 4 + 1);
//! ```

mod bow;
mod genres;
mod matrix;
mod ratings;
mod records;
mod tags;
mod title;

pub use bow::{BagOfWords, CountBlock, Vocabulary, GENRE_ARTIFACTS};
pub use genres::{genre_counts, tokenize_genres};
pub use matrix::{Assembler, Column, FeatureMatrix, ScalarEncoding};
pub use ratings::aggregate_ratings;
pub use records::{CategoryCount, ItemId, ItemRecord, RatingEvent, TagEvent};
pub use tags::count_tags;
pub use title::{parse_year, split_title};

//! Release-year extraction from `Title (Year)` strings.
//!
//! Extraction is best effort per row: anything that does not end in a
//! parenthesized run of digits yields `None`, never an error.

use std::sync::LazyLock;

use regex::Regex;

static TITLE_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<title>.*\S)\s*\((?P<year>[0-9]*)\)\s*$").expect("title pattern is valid")
});

/// Split a raw title into the bare title and the release year.
///
/// Returns `None` when the string has no trailing `(<digits>)` group. The year is
/// `None` when the group is empty or does not fit in an `i32`.
///
/// ```rust
/// use tessera::features::split_title;
///
/// assert_eq!(split_title("Heat (1995)"), Some(("Heat", Some(1995))));
/// assert_eq!(split_title("Hyena Road"), None);
/// ```
pub fn split_title(raw: &str) -> Option<(&str, Option<i32>)> {
    let caps = TITLE_YEAR.captures(raw)?;
    let title = caps.name("title")?.as_str().trim();
    let year = caps.name("year").and_then(|m| m.as_str().parse().ok());
    Some((title, year))
}

/// Extract the release year of a raw title.
pub fn parse_year(raw: &str) -> Option<i32> {
    split_title(raw).and_then(|(_, year)| year)
}

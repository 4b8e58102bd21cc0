use std::path::PathBuf;

use thiserror::Error;

/// Result alias for `tessera`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the feature pipeline and the clustering engine.
///
/// Recoverable data gaps (unparseable titles, unrated or untagged items) never
/// surface here; they are resolved to zero during assembly.
#[derive(Debug, Error)]
pub enum Error {
    /// Input was empty.
    #[error("empty input provided")]
    EmptyInput,

    /// Rows of a matrix have inconsistent width.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Found dimension.
        found: usize,
    },

    /// A matrix cell is NaN or infinite.
    #[error("non-finite value at row {row}, column {column}")]
    NonFiniteValue {
        /// Row index.
        row: usize,
        /// Column index.
        column: usize,
    },

    /// Invalid number of clusters requested.
    #[error("cannot create {requested} clusters from {n_items} items")]
    InvalidClusterCount {
        /// Requested count.
        requested: usize,
        /// Number of items.
        n_items: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: &'static str,
    },

    /// Reading or writing a file failed.
    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A CSV record could not be read, decoded or written.
    #[error("csv error on {}: {source}", .path.display())]
    Csv {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: csv::Error,
    },

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// True for errors caused by a malformed matrix handed to a clustering algorithm.
    pub fn is_precondition_violation(&self) -> bool {
        matches!(
            self,
            Error::EmptyInput | Error::DimensionMismatch { .. } | Error::NonFiniteValue { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let e = Error::InvalidClusterCount {
            requested: 5,
            n_items: 2,
        };
        assert_eq!(e.to_string(), "cannot create 5 clusters from 2 items");

        let e = Error::NonFiniteValue { row: 3, column: 1 };
        assert_eq!(e.to_string(), "non-finite value at row 3, column 1");
    }

    #[test]
    fn test_precondition_classification() {
        assert!(Error::EmptyInput.is_precondition_violation());
        assert!(Error::NonFiniteValue { row: 0, column: 0 }.is_precondition_violation());
        assert!(!Error::InvalidParameter {
            name: "epsilon",
            message: "must be positive"
        }
        .is_precondition_violation());
    }
}

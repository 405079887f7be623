//! Error taxonomy for the ranking core.
//!
//! Three families of failure exist:
//! - bounds errors: out-of-range matrix row/column or document index
//! - argument errors: negative matrix dimensions, invalid tuning values
//! - format errors: malformed or unrepresentable persisted index
//!
//! All of them are reported synchronously; nothing here is retryable.

use thiserror::Error;

/// Result alias used throughout the Okapi crates.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the ranking core.
#[derive(Debug, Error)]
pub enum Error {
    /// Row index outside `[0, rows)`
    #[error("row index {row} out of bounds for matrix with {rows} rows")]
    RowOutOfBounds {
        /// Requested row
        row: usize,
        /// Number of rows in the matrix
        rows: usize,
    },

    /// Column index outside `[0, cols)`
    #[error("column index {col} out of bounds for matrix with {cols} columns")]
    ColumnOutOfBounds {
        /// Requested column
        col: usize,
        /// Number of columns in the matrix
        cols: usize,
    },

    /// Document index outside `[0, num_docs)`
    #[error("document index {index} out of bounds for index with {num_docs} documents")]
    DocumentOutOfBounds {
        /// Requested document
        index: usize,
        /// Number of documents in the index
        num_docs: usize,
    },

    /// Matrix dimensions must be non-negative
    #[error("invalid matrix dimensions {rows}x{cols}: dimensions must be non-negative")]
    InvalidDimensions {
        /// Requested row count
        rows: i64,
        /// Requested column count
        cols: i64,
    },

    /// Corpus and document-name lists disagree in length
    #[error("corpus has {documents} documents but {names} document names were given")]
    CorpusMismatch {
        /// Number of tokenized documents
        documents: usize,
        /// Number of document names
        names: usize,
    },

    /// Vocabulary lists the same term at two columns
    #[error("vocabulary repeats term {term:?} at columns {first} and {second}")]
    DuplicateTerm {
        /// The repeated term
        term: String,
        /// Column of the first occurrence
        first: usize,
        /// Column of the repeat
        second: usize,
    },

    /// BM25 tuning values out of range
    #[error("invalid BM25 parameters: {0}")]
    InvalidParams(String),

    /// A header line did not match the expected field
    #[error("ill-formatted index at line {line}: expected {expected}, found {found:?}")]
    UnexpectedLine {
        /// 1-based line number
        line: usize,
        /// Name of the expected field
        expected: String,
        /// The line actually read
        found: String,
    },

    /// The input ended before an expected line
    #[error("ill-formatted index at line {line}: expected {expected}, found end of input")]
    MissingLine {
        /// 1-based line number
        line: usize,
        /// Name of the expected field
        expected: String,
    },

    /// Persisted content is syntactically or structurally invalid
    #[error("ill-formatted index: {0}")]
    Format(String),

    /// JSON form could not be parsed or produced
    #[error("invalid index json: {0}")]
    Json(#[from] serde_json::Error),

    /// A value cannot be represented in the chosen persisted form
    #[error("cannot encode index: {0}")]
    Unencodable(String),

    /// Ranking requested before any index was built or loaded
    #[error("no index: build or load an index before querying")]
    EmptyEngine,
}

impl Error {
    /// True for out-of-range access errors.
    pub fn is_bounds(&self) -> bool {
        matches!(
            self,
            Error::RowOutOfBounds { .. }
                | Error::ColumnOutOfBounds { .. }
                | Error::DocumentOutOfBounds { .. }
        )
    }

    /// True for malformed persisted input.
    pub fn is_format(&self) -> bool {
        matches!(
            self,
            Error::UnexpectedLine { .. }
                | Error::MissingLine { .. }
                | Error::Format(_)
                | Error::Json(_)
        )
    }
}

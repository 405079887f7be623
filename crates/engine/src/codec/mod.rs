//! Persisted index formats
//!
//! Encoding lives here, outside `Index` and `SparseScoreMatrix`, so the data
//! model stays unaware of its wire representation.
//!
//! - `text`: line-oriented form with fixed headers (canonical)
//! - `json`: structured form with `documentNames`, `vocabulary`, `matrix`
//!
//! `decode(encode(index))` reproduces the vocabulary, the document names
//! and every stored `(row, col, value)` triple in both forms.

pub mod json;
pub mod text;

use crate::index::Index;
use okapi_core::Result;

pub use json::{decode_index_json, decode_matrix_json, encode_index_json, encode_matrix_json};
pub use text::{decode_index_text, decode_matrix_text, encode_index_text, encode_matrix_text};

/// Persisted representation of an index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PersistFormat {
    /// Line-oriented text form
    #[default]
    Text,
    /// JSON object form
    Json,
}

impl PersistFormat {
    /// Guess the format of persisted content: JSON starts with `{`.
    pub fn detect(input: &str) -> Self {
        if input.trim_start().starts_with('{') {
            PersistFormat::Json
        } else {
            PersistFormat::Text
        }
    }
}

/// Encode an index in the given format.
pub fn encode_index(index: &Index, format: PersistFormat) -> Result<String> {
    match format {
        PersistFormat::Text => encode_index_text(index),
        PersistFormat::Json => encode_index_json(index),
    }
}

/// Decode an index from the given format.
pub fn decode_index(input: &str, format: PersistFormat) -> Result<Index> {
    match format {
        PersistFormat::Text => decode_index_text(input),
        PersistFormat::Json => decode_index_json(input),
    }
}

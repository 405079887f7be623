//! Okapi: a small BM25 document-ranking engine.
//!
//! This crate re-exports the public API of the internal crates.

// Errors and shared value types
pub use okapi_core::{Bm25Params, Error, RankingResult, Result};

// Tokenization
pub use okapi_engine::search::{is_stopword, tokenize, tokenize_corpus, tokenize_unique};

// Data model
pub use okapi_engine::{Index, SparseScoreMatrix};

// Ranking
pub use okapi_engine::{idf, Bm25Engine};

// Persisted forms
pub use okapi_engine::codec::{
    decode_index, decode_index_json, decode_index_text, decode_matrix_json, decode_matrix_text,
    encode_index, encode_index_json, encode_index_text, encode_matrix_json, encode_matrix_text,
    PersistFormat,
};

//! Text normalization for indexing and querying
//!
//! This module contains:
//! - `tokenizer`: lowercase, word extraction, stopword removal, stemming
//! - `stemmer`: Porter stemmer used by the tokenizer

pub mod stemmer;
pub mod tokenizer;

pub use tokenizer::{is_stopword, tokenize, tokenize_corpus, tokenize_unique, STOPWORDS};

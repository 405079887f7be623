//! Okapi ranking engine
//!
//! Tokenize a corpus, build a BM25 term-score index over it, persist the
//! index, and rank documents against free-text queries.
//!
//! - `search`: tokenizer and Porter stemmer
//! - `matrix`: row-sparse document × term score matrix
//! - `index`: vocabulary + document names + score matrix
//! - `bm25`: index construction and top-K ranking
//! - `codec`: text and JSON persisted forms
//!
//! # Example
//!
//! ```
//! use okapi_engine::{tokenize_corpus, Bm25Engine};
//!
//! let corpus = ["a cat likes birds", "a dog likes people"];
//! let names = vec!["cat.txt".to_string(), "dog.txt".to_string()];
//!
//! let mut engine = Bm25Engine::new();
//! engine.build_index(&tokenize_corpus(&corpus), names).unwrap();
//!
//! let hits = engine.search("dogs", 3).unwrap();
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].doc_index, 1);
//! ```

#![warn(missing_docs)]

pub mod bm25;
pub mod codec;
pub mod index;
pub mod matrix;
pub mod search;

pub use bm25::{idf, Bm25Engine};
pub use codec::{decode_index, encode_index, PersistFormat};
pub use index::Index;
pub use matrix::SparseScoreMatrix;
pub use search::{tokenize, tokenize_corpus, tokenize_unique};

pub use okapi_core::{Bm25Params, Error, RankingResult, Result};

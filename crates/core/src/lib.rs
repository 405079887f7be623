//! Core types for the Okapi ranking engine
//!
//! This crate defines the value types shared by every other crate:
//! - `Error` / `Result`: the error taxonomy (bounds, argument, format)
//! - `Bm25Params`: BM25 tuning constants
//! - `RankingResult`: a (document index, score) pair

#![warn(missing_docs)]

pub mod error;
pub mod params;
pub mod types;

pub use error::{Error, Result};
pub use params::Bm25Params;
pub use types::RankingResult;

//! Ranking output

use serde::{Deserialize, Serialize};

/// A ranked document: its row in the index and its accumulated score.
///
/// Scores produced by ranking are strictly positive; documents without
/// overlap with the query are never reported.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankingResult {
    /// Row of the document in the index
    pub doc_index: usize,
    /// Sum of the document's scores over the query terms
    pub score: f64,
}

impl RankingResult {
    /// Create a new ranking entry
    pub fn new(doc_index: usize, score: f64) -> Self {
        RankingResult { doc_index, score }
    }
}

//! BM25 index construction and top-K ranking
//!
//! # Build
//!
//! For a tokenized corpus of N documents:
//!
//! ```text
//! idf(t)     = ln((N - df(t) + 0.5) / (df(t) + 0.5) + 1)
//! tf_norm    = tf / (k1 * (1 - b + b * doc_len / avg_doc_len) + tf)
//! score(d,t) = tf_norm * idf(t)
//! ```
//!
//! Every strictly positive score is written into the index matrix; all
//! other cells stay implicit zeros.
//!
//! # Query
//!
//! A document's score is the sum of its stored scores over the columns of
//! the query terms. Documents scoring `<= 0` are dropped and the rest are
//! sorted by descending score.
//!
//! # State
//!
//! The engine is either empty (no index) or built. Querying an empty engine
//! fails with `Error::EmptyEngine`.

use crate::index::Index;
use crate::search::tokenizer::tokenize;
use okapi_core::{Bm25Params, Error, RankingResult, Result};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// Robertson/Sparck Jones IDF with the `+1` smoothing used by Lucene.
///
/// Strictly positive for every `df <= num_docs`.
pub fn idf(df: usize, num_docs: usize) -> f64 {
    let n = num_docs as f64;
    let df = df as f64;
    ((n - df + 0.5) / (df + 0.5) + 1.0).ln()
}

/// BM25 search engine over one in-memory `Index`.
#[derive(Debug, Clone, Default)]
pub struct Bm25Engine {
    params: Bm25Params,
    index: Option<Index>,
}

impl Bm25Engine {
    /// Create an empty engine with default parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty engine with alternate tuning
    pub fn with_params(params: Bm25Params) -> Self {
        Bm25Engine {
            params,
            index: None,
        }
    }

    /// Create a query-ready engine over a restored index
    pub fn from_index(index: Index) -> Self {
        Bm25Engine {
            params: Bm25Params::default(),
            index: Some(index),
        }
    }

    /// Replace the tuning used by later builds
    pub fn set_params(&mut self, params: Bm25Params) {
        self.params = params;
    }

    /// Tuning used when building
    pub fn params(&self) -> &Bm25Params {
        &self.params
    }

    /// Current index, if one was built or loaded
    pub fn index(&self) -> Option<&Index> {
        self.index.as_ref()
    }

    /// Take the current index out of the engine
    pub fn into_index(self) -> Option<Index> {
        self.index
    }

    /// True once an index is present
    pub fn is_built(&self) -> bool {
        self.index.is_some()
    }

    // ========================================================================
    // Build
    // ========================================================================

    /// Build a new index from a tokenized corpus, replacing any previous one.
    ///
    /// `corpus_tokens[i]` is the token sequence of the document named
    /// `document_names[i]`. Vocabulary columns follow first occurrence across
    /// the corpus, so the same corpus always yields the same index.
    pub fn build_index(
        &mut self,
        corpus_tokens: &[Vec<String>],
        document_names: Vec<String>,
    ) -> Result<()> {
        if corpus_tokens.len() != document_names.len() {
            return Err(Error::CorpusMismatch {
                documents: corpus_tokens.len(),
                names: document_names.len(),
            });
        }
        self.params.validate()?;

        let vocabulary = build_vocabulary(corpus_tokens);
        let mut index = Index::new(vocabulary, document_names)?;
        let num_docs = corpus_tokens.len();

        if num_docs > 0 {
            let avg_doc_len = average_doc_length(corpus_tokens);
            let doc_freqs = document_frequencies(corpus_tokens, &index);
            let idfs: Vec<f64> = doc_freqs.iter().map(|&df| idf(df, num_docs)).collect();

            for (row, doc) in corpus_tokens.iter().enumerate() {
                let doc_len = doc.len() as f64;
                for (col, tf) in term_frequencies(doc, &index) {
                    let tf_norm = self.params.term_freq_score(tf as f64, doc_len, avg_doc_len);
                    let score = tf_norm * idfs[col];
                    if score > 0.0 {
                        index.set_score(row, col, score)?;
                    }
                }
            }

            debug!(
                target: "okapi::engine",
                num_docs,
                vocab_size = index.vocab_size(),
                avg_doc_len,
                stored = index.matrix().nnz(),
                "built BM25 index"
            );
        }

        self.index = Some(index);
        Ok(())
    }

    // ========================================================================
    // Query
    // ========================================================================

    /// Rank documents against already-tokenized query terms.
    ///
    /// Returns at most `k` results, highest score first. Equal scores keep
    /// ascending document order. `k == 0` yields nothing; `k` above the
    /// number of matches yields every match.
    pub fn retrieve_top_k<S: AsRef<str>>(
        &self,
        query_tokens: &[S],
        k: usize,
    ) -> Result<Vec<RankingResult>> {
        let index = self.index.as_ref().ok_or(Error::EmptyEngine)?;
        if k == 0 {
            return Ok(Vec::new());
        }

        let mut query_columns = vec![false; index.vocab_size()];
        for token in query_tokens {
            if let Some(col) = index.term_index(token.as_ref()) {
                query_columns[col] = true;
            }
        }

        let mut results = Vec::new();
        for (row, (cols, scores)) in index.matrix().rows().enumerate() {
            let doc_score: f64 = cols
                .iter()
                .zip(scores)
                .filter(|(col, _)| query_columns[**col])
                .map(|(_, &score)| score)
                .sum();
            if doc_score > 0.0 {
                results.push(RankingResult::new(row, doc_score));
            }
        }

        // Stable: ties stay in document order
        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results.truncate(k);

        debug!(
            target: "okapi::engine",
            query_terms = query_tokens.len(),
            matches = results.len(),
            k,
            "ranked documents"
        );
        Ok(results)
    }

    /// Tokenize free text and rank it.
    pub fn search(&self, query: &str, k: usize) -> Result<Vec<RankingResult>> {
        self.retrieve_top_k(&tokenize(query), k)
    }
}

// ============================================================================
// Corpus statistics
// ============================================================================

/// Distinct tokens of the corpus in first-occurrence order.
fn build_vocabulary(corpus_tokens: &[Vec<String>]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut vocabulary = Vec::new();
    for token in corpus_tokens.iter().flatten() {
        if seen.insert(token.as_str()) {
            vocabulary.push(token.clone());
        }
    }
    vocabulary
}

fn average_doc_length(corpus_tokens: &[Vec<String>]) -> f64 {
    let total: usize = corpus_tokens.iter().map(Vec::len).sum();
    total as f64 / corpus_tokens.len() as f64
}

/// Per-column count of documents containing the term.
///
/// Each document contributes once per distinct term it holds.
fn document_frequencies(corpus_tokens: &[Vec<String>], index: &Index) -> Vec<usize> {
    let mut doc_freqs = vec![0usize; index.vocab_size()];
    for doc in corpus_tokens {
        let distinct: HashSet<&str> = doc.iter().map(String::as_str).collect();
        for term in distinct {
            if let Some(col) = index.term_index(term) {
                doc_freqs[col] += 1;
            }
        }
    }
    doc_freqs
}

/// Raw count of each term of one document, keyed by column.
fn term_frequencies(doc: &[String], index: &Index) -> BTreeMap<usize, u32> {
    let mut tf = BTreeMap::new();
    for token in doc {
        if let Some(col) = index.term_index(token) {
            *tf.entry(col).or_insert(0) += 1;
        }
    }
    tf
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::tokenizer::tokenize_corpus;
    use proptest::prelude::*;

    const CORPUS: [&str; 3] = [
        "a cat is a feline and likes to eat bird",
        "a dog is the human's best friend and likes to play",
        "a bird is a beautiful animal that can fly",
    ];

    fn names(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("file{}.txt", i)).collect()
    }

    fn built_engine() -> Bm25Engine {
        let mut engine = Bm25Engine::new();
        engine
            .build_index(&tokenize_corpus(&CORPUS), names(3))
            .unwrap();
        engine
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_engine() {
        let engine = Bm25Engine::new();
        assert!(engine.index().is_none());
        assert!(!engine.is_built());
        assert!(matches!(
            engine.retrieve_top_k(&["cat"], 3),
            Err(Error::EmptyEngine)
        ));
    }

    #[test]
    fn test_build_index() {
        let engine = built_engine();
        let index = engine.index().unwrap();
        assert_eq!(index.num_docs(), 3);
        assert_eq!(index.vocab_size(), 14);
        assert_eq!(index.document_name(2).unwrap(), "file3.txt");
        // first-occurrence vocabulary order
        assert_eq!(&index.vocabulary()[..5], &strings(&["cat", "felin", "like", "eat", "bird"])[..]);
    }

    #[test]
    fn test_build_scores_match_formula() {
        let engine = built_engine();
        let index = engine.index().unwrap();
        let avg = 16.0 / 3.0;
        let p = Bm25Params::default();

        // "cat": only in doc 0 (5 tokens), tf 1
        let cat = index.term_index("cat").unwrap();
        let expected = p.term_freq_score(1.0, 5.0, avg) * idf(1, 3);
        assert!((index.score(0, cat).unwrap() - expected).abs() < 1e-12);
        assert_eq!(index.score(1, cat).unwrap(), 0.0);

        // "bird": in docs 0 and 2
        let bird = index.term_index("bird").unwrap();
        let expected = p.term_freq_score(1.0, 5.0, avg) * idf(2, 3);
        assert!((index.score(2, bird).unwrap() - expected).abs() < 1e-12);
        assert!(index.score(0, bird).unwrap() < index.score(0, cat).unwrap());
    }

    #[test]
    fn test_only_present_terms_are_stored() {
        let engine = built_engine();
        let m = engine.index().unwrap().matrix();
        assert_eq!(m.row_density(0).unwrap(), 5);
        assert_eq!(m.row_density(1).unwrap(), 6);
        assert_eq!(m.row_density(2).unwrap(), 5);
    }

    #[test]
    fn test_idf_positive() {
        assert!(idf(1, 1) > 0.0);
        assert!(idf(10, 10) > 0.0);
        assert!(idf(1, 10) > idf(9, 10));
    }

    #[test]
    fn test_build_rejects_mismatched_names() {
        let mut engine = Bm25Engine::new();
        let err = engine.build_index(&tokenize_corpus(&CORPUS), names(2));
        assert!(matches!(
            err,
            Err(Error::CorpusMismatch {
                documents: 3,
                names: 2
            })
        ));
        assert!(engine.index().is_none());
    }

    #[test]
    fn test_rebuild_replaces_index() {
        let mut engine = built_engine();
        engine
            .build_index(&[strings(&["solo"])], strings(&["only.txt"]))
            .unwrap();
        let index = engine.index().unwrap();
        assert_eq!(index.num_docs(), 1);
        assert_eq!(index.vocabulary(), strings(&["solo"]).as_slice());
    }

    #[test]
    fn test_retrieve_top_k_reference_query() {
        let engine = built_engine();
        let res = engine
            .retrieve_top_k(&["anim", "human", "best", "friend"], 3)
            .unwrap();
        assert_eq!(res.len(), 2);
        assert_eq!(res[0].doc_index, 1);
        assert_eq!(res[1].doc_index, 2);
        assert!(res[0].score > res[1].score);
        assert!(res.iter().all(|r| r.score > 0.0));
    }

    #[test]
    fn test_retrieve_top_k_handset_matrix() {
        let vocab = strings(&[
            "like", "best", "plai", "can", "fly", "beauti", "cat", "bird", "friend", "eat",
            "anim", "dog", "human", "felin",
        ]);
        let mut index = Index::new(vocab, names(3)).unwrap();
        for &(row, col, v) in &[
            (0, 0, 0.2192),
            (0, 6, 0.4575),
            (0, 7, 0.2192),
            (0, 9, 0.4575),
            (0, 13, 0.4575),
            (1, 0, 0.2032),
            (1, 1, 0.4241),
            (1, 2, 0.4241),
            (1, 8, 0.4241),
            (1, 11, 0.4241),
            (1, 12, 0.4241),
            (2, 3, 0.4575),
            (2, 4, 0.4575),
            (2, 5, 0.4575),
            (2, 7, 0.2192),
            (2, 10, 0.4575),
        ] {
            index.set_score(row, col, v).unwrap();
        }

        let engine = Bm25Engine::from_index(index);
        let res = engine
            .retrieve_top_k(&["anim", "human", "best", "friend"], 3)
            .unwrap();
        assert_eq!(res.len(), 2);
        assert_eq!(res[0].doc_index, 1);
        assert_eq!(res[1].doc_index, 2);
    }

    #[test]
    fn test_retrieve_k_bounds() {
        let engine = built_engine();
        let query = ["anim", "human"];
        assert!(engine.retrieve_top_k(&query, 0).unwrap().is_empty());
        assert_eq!(engine.retrieve_top_k(&query, 1000).unwrap().len(), 2);
        assert_eq!(engine.retrieve_top_k(&query, 1).unwrap().len(), 1);
    }

    #[test]
    fn test_retrieve_no_overlap() {
        let engine = built_engine();
        assert!(engine.retrieve_top_k(&["zebra"], 3).unwrap().is_empty());
        let empty: [&str; 0] = [];
        assert!(engine.retrieve_top_k(&empty, 3).unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_query_terms_count_once() {
        let engine = built_engine();
        let once = engine.retrieve_top_k(&["cat"], 3).unwrap();
        let twice = engine.retrieve_top_k(&["cat", "cat"], 3).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_ties_keep_document_order() {
        let mut engine = Bm25Engine::new();
        let corpus = vec![
            strings(&["apple", "pear"]),
            strings(&["grape", "lime"]),
            strings(&["apple", "pear"]),
        ];
        engine.build_index(&corpus, names(3)).unwrap();
        let res = engine.retrieve_top_k(&["apple"], 3).unwrap();
        assert_eq!(res.len(), 2);
        assert_eq!(res[0].doc_index, 0);
        assert_eq!(res[1].doc_index, 2);
        assert_eq!(res[0].score, res[1].score);
    }

    /// Two documents of length `len` that differ only in how many of their
    /// tokens are "rust" (the rest is "pad"), plus an unrelated document.
    fn rust_corpus(len: usize, more: usize, fewer: usize, more_first: bool) -> Vec<Vec<String>> {
        let doc = |rust: usize| {
            let mut tokens = vec!["rust".to_string(); rust];
            tokens.resize(len, "pad".to_string());
            tokens
        };
        let (first, second) = if more_first {
            (doc(more), doc(fewer))
        } else {
            (doc(fewer), doc(more))
        };
        vec![first, second, vec!["other".to_string(); len]]
    }

    #[test]
    fn test_more_occurrences_rank_higher() {
        let mut engine = Bm25Engine::new();
        engine
            .build_index(&rust_corpus(4, 3, 1, false), names(3))
            .unwrap();
        let res = engine.retrieve_top_k(&["rust"], 3).unwrap();
        assert_eq!(res.len(), 2);
        assert_eq!(res[0].doc_index, 1);
        assert_eq!(res[1].doc_index, 0);
    }

    /// `(len, more, fewer)` with `1 <= fewer < more <= len`
    fn occurrence_counts() -> impl Strategy<Value = (usize, usize, usize)> {
        (2usize..12).prop_flat_map(|len| {
            (1..len).prop_flat_map(move |fewer| (Just(len), (fewer + 1)..=len, Just(fewer)))
        })
    }

    proptest! {
        #[test]
        fn prop_more_occurrences_never_rank_lower(
            (len, more, fewer) in occurrence_counts(),
            more_first in any::<bool>(),
        ) {
            let mut engine = Bm25Engine::new();
            engine
                .build_index(&rust_corpus(len, more, fewer, more_first), names(3))
                .unwrap();
            let res = engine.retrieve_top_k(&["rust"], 3).unwrap();

            let more_row = if more_first { 0 } else { 1 };
            prop_assert_eq!(res.len(), 2);
            prop_assert_eq!(res[0].doc_index, more_row);
            prop_assert!(res[0].score > res[1].score);
        }
    }

    #[test]
    fn test_search_tokenizes_query() {
        let engine = built_engine();
        let res = engine.search("Human friends!", 3).unwrap();
        assert_eq!(res.len(), 1);
        assert_eq!(res[0].doc_index, 1);
    }

    #[test]
    fn test_alternate_params_change_scores() {
        let corpus = tokenize_corpus(&CORPUS);
        let mut default_engine = Bm25Engine::new();
        default_engine.build_index(&corpus, names(3)).unwrap();

        let mut tuned = Bm25Engine::with_params(Bm25Params::new(2.0, 0.0).unwrap());
        tuned.build_index(&corpus, names(3)).unwrap();

        let a = default_engine.retrieve_top_k(&["dog"], 1).unwrap();
        let b = tuned.retrieve_top_k(&["dog"], 1).unwrap();
        assert_eq!(a[0].doc_index, b[0].doc_index);
        assert_ne!(a[0].score, b[0].score);
    }

    #[test]
    fn test_invalid_params_rejected_at_build() {
        let mut engine = Bm25Engine::with_params(Bm25Params { k1: 1.2, b: 2.0 });
        let err = engine.build_index(&tokenize_corpus(&CORPUS), names(3));
        assert!(matches!(err, Err(Error::InvalidParams(_))));
    }

    #[test]
    fn test_empty_corpus_builds_empty_index() {
        let mut engine = Bm25Engine::new();
        engine.build_index(&[], Vec::new()).unwrap();
        let index = engine.index().unwrap();
        assert_eq!(index.num_docs(), 0);
        assert_eq!(index.vocab_size(), 0);
        assert!(engine.retrieve_top_k(&["cat"], 3).unwrap().is_empty());
    }

    #[test]
    fn test_document_with_no_tokens() {
        let mut engine = Bm25Engine::new();
        let corpus = tokenize_corpus(&["the and of", "cats purr"]);
        engine.build_index(&corpus, names(2)).unwrap();
        let m = engine.index().unwrap().matrix();
        assert_eq!(m.row_density(0).unwrap(), 0);
        let res = engine.search("cats", 5).unwrap();
        assert_eq!(res.len(), 1);
        assert_eq!(res[0].doc_index, 1);
    }
}

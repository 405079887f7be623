//! Text tokenizer for indexing and querying
//!
//! Pipeline: lowercase → extract runs of Unicode word characters → drop runs
//!           shorter than 2 characters → remove stopwords → Porter stem

use super::stemmer;
use once_cell::sync::Lazy;
use regex::Regex;

/// English stopwords (Lucene's default set).
///
/// High-frequency function words carry no discriminative value for BM25
/// and are removed before stemming.
pub const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is", "it",
    "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there", "these",
    "they", "this", "to", "was", "will", "with",
];

/// Check if a lowercase word is a stopword.
#[inline]
pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(&word)
}

/// Maximal run of Unicode word characters (Alphabetic, Mark,
/// Decimal_Number, Connector_Punctuation, Join_Control).
static WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\w+").unwrap_or_else(|err| panic!("invalid WORD regex: {err}")));

/// Tokenize text into index terms.
///
/// Pipeline:
/// 1. Lowercase
/// 2. Extract maximal runs of word characters
/// 3. Drop runs shorter than 2 characters
/// 4. Remove stopwords
/// 5. Porter-stem each remaining word
///
/// Empty or punctuation-only input yields an empty sequence.
///
/// # Example
///
/// ```
/// use okapi_engine::search::tokenizer::tokenize;
///
/// let tokens = tokenize("a cat is a feline and likes to eat bird");
/// assert_eq!(tokens, vec!["cat", "felin", "like", "eat", "bird"]);
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    WORD.find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|w| w.chars().count() >= 2)
        .filter(|w| !is_stopword(w))
        .map(stemmer::stem)
        .collect()
}

/// Tokenize every document of a corpus, preserving document order.
///
/// The position of a document in the output is its row in the index.
pub fn tokenize_corpus<S: AsRef<str>>(corpus: &[S]) -> Vec<Vec<String>> {
    corpus.iter().map(|doc| tokenize(doc.as_ref())).collect()
}

/// Tokenize and deduplicate, keeping first-occurrence order.
///
/// # Example
///
/// ```
/// use okapi_engine::search::tokenizer::tokenize_unique;
///
/// let tokens = tokenize_unique("testing tests TESTS");
/// assert_eq!(tokens, vec!["test"]);
/// ```
pub fn tokenize_unique(text: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    tokenize(text)
        .into_iter()
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

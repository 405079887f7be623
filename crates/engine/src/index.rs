//! Term-score index
//!
//! An `Index` ties together the vocabulary (column identity), the document
//! names (row identity) and the `SparseScoreMatrix` holding the BM25 weight
//! of every (document, term) pair. It knows nothing about how it is
//! persisted; see `crate::codec` for that.
//!
//! Invariant: `matrix.n_rows() == document_names.len()` and
//! `matrix.n_cols() == vocabulary.len()`.

use crate::matrix::SparseScoreMatrix;
use okapi_core::{Error, Result};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Vocabulary, document names and the score matrix built over them.
#[derive(Debug, Clone, PartialEq)]
pub struct Index {
    vocabulary: Vec<String>,
    document_names: Vec<String>,
    /// term -> column, built once from `vocabulary`
    term_columns: HashMap<String, usize>,
    matrix: SparseScoreMatrix,
}

impl Index {
    /// Create an index with an empty `|document_names| × |vocabulary|` matrix.
    ///
    /// Fails with `DuplicateTerm` if the vocabulary lists a term twice.
    pub fn new(vocabulary: Vec<String>, document_names: Vec<String>) -> Result<Self> {
        let term_columns = column_map(&vocabulary)?;
        let matrix = SparseScoreMatrix::new(document_names.len(), vocabulary.len());
        Ok(Index {
            vocabulary,
            document_names,
            term_columns,
            matrix,
        })
    }

    /// Assemble an index from restored parts.
    ///
    /// Fails if the matrix dimensions disagree with the name and vocabulary
    /// lists, or if the vocabulary repeats a term.
    pub fn from_parts(
        vocabulary: Vec<String>,
        document_names: Vec<String>,
        matrix: SparseScoreMatrix,
    ) -> Result<Self> {
        if matrix.n_rows() != document_names.len() || matrix.n_cols() != vocabulary.len() {
            return Err(Error::Format(format!(
                "matrix is {}x{} but index has {} documents and {} terms",
                matrix.n_rows(),
                matrix.n_cols(),
                document_names.len(),
                vocabulary.len()
            )));
        }
        let term_columns = column_map(&vocabulary).map_err(|e| Error::Format(e.to_string()))?;
        Ok(Index {
            vocabulary,
            document_names,
            term_columns,
            matrix,
        })
    }

    /// Name of document `doc_index`
    pub fn document_name(&self, doc_index: usize) -> Result<&str> {
        self.document_names
            .get(doc_index)
            .map(String::as_str)
            .ok_or(Error::DocumentOutOfBounds {
                index: doc_index,
                num_docs: self.document_names.len(),
            })
    }

    /// All document names, in row order
    pub fn document_names(&self) -> &[String] {
        &self.document_names
    }

    /// Vocabulary, in column order
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// Number of documents (matrix rows)
    pub fn num_docs(&self) -> usize {
        self.document_names.len()
    }

    /// Number of distinct terms (matrix columns)
    pub fn vocab_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Column of `term`, if it is part of the vocabulary
    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.term_columns.get(term).copied()
    }

    /// Read-only view of the score matrix
    pub fn matrix(&self) -> &SparseScoreMatrix {
        &self.matrix
    }

    /// Score of document `doc_index` for the term at column `term_index`
    pub fn score(&self, doc_index: usize, term_index: usize) -> Result<f64> {
        self.matrix.get(doc_index, term_index)
    }

    /// Write a score during the build phase. Zero is a no-op.
    pub fn set_score(&mut self, doc_index: usize, term_index: usize, value: f64) -> Result<()> {
        self.matrix.set(doc_index, term_index, value)
    }
}

fn column_map(vocabulary: &[String]) -> Result<HashMap<String, usize>> {
    let mut map = HashMap::with_capacity(vocabulary.len());
    for (col, term) in vocabulary.iter().enumerate() {
        match map.entry(term.clone()) {
            Entry::Occupied(first) => {
                return Err(Error::DuplicateTerm {
                    term: term.clone(),
                    first: *first.get(),
                    second: col,
                });
            }
            Entry::Vacant(slot) => {
                slot.insert(col);
            }
        }
    }
    Ok(map)
}

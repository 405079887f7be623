//! JSON form of the index
//!
//! ```json
//! {
//!   "documentNames": ["file1.txt", "file2.txt"],
//!   "vocabulary": ["like", "best", "plai", "can"],
//!   "matrix": {
//!     "nRows": 2,
//!     "nCols": 4,
//!     "indices": [[0, 1], [2, 3]],
//!     "data": [[0.21, 0.45], [0.1, 0.32]]
//!   }
//! }
//! ```

use crate::index::Index;
use crate::matrix::SparseScoreMatrix;
use okapi_core::{Error, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IndexRepr {
    document_names: Vec<String>,
    vocabulary: Vec<String>,
    matrix: MatrixRepr,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatrixRepr {
    n_rows: i64,
    n_cols: i64,
    indices: Vec<Vec<usize>>,
    data: Vec<Vec<f64>>,
}

impl MatrixRepr {
    fn from_matrix(matrix: &SparseScoreMatrix) -> Self {
        let (indices, data): (Vec<_>, Vec<_>) = matrix
            .rows()
            .map(|(cols, scores)| (cols.to_vec(), scores.to_vec()))
            .unzip();
        MatrixRepr {
            n_rows: matrix.n_rows() as i64,
            n_cols: matrix.n_cols() as i64,
            indices,
            data,
        }
    }

    fn into_matrix(self) -> Result<SparseScoreMatrix> {
        let (n_rows, n_cols) = SparseScoreMatrix::check_dimensions(self.n_rows, self.n_cols)?;
        SparseScoreMatrix::from_rows(n_rows, n_cols, self.indices, self.data)
    }
}

/// JSON has no NaN or infinity.
fn check_finite(matrix: &SparseScoreMatrix) -> Result<()> {
    if let Some((row, col, _)) = matrix.entries().find(|(_, _, v)| !v.is_finite()) {
        return Err(Error::Unencodable(format!(
            "non-finite score at ({}, {}) cannot be written as JSON",
            row, col
        )));
    }
    Ok(())
}

/// Encode a matrix as a JSON object with `nRows`, `nCols`, `indices`, `data`.
pub fn encode_matrix_json(matrix: &SparseScoreMatrix) -> Result<String> {
    check_finite(matrix)?;
    Ok(serde_json::to_string(&MatrixRepr::from_matrix(matrix))?)
}

/// Decode a matrix produced by `encode_matrix_json`.
pub fn decode_matrix_json(input: &str) -> Result<SparseScoreMatrix> {
    let repr: MatrixRepr = serde_json::from_str(input)?;
    repr.into_matrix()
}

/// Encode an index as a JSON object.
pub fn encode_index_json(index: &Index) -> Result<String> {
    check_finite(index.matrix())?;
    let repr = IndexRepr {
        document_names: index.document_names().to_vec(),
        vocabulary: index.vocabulary().to_vec(),
        matrix: MatrixRepr::from_matrix(index.matrix()),
    };
    Ok(serde_json::to_string_pretty(&repr)?)
}

/// Decode an index produced by `encode_index_json`.
pub fn decode_index_json(input: &str) -> Result<Index> {
    let repr: IndexRepr = serde_json::from_str(input)?;
    let matrix = repr.matrix.into_matrix()?;
    Index::from_parts(repr.vocabulary, repr.document_names, matrix)
}

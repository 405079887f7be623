//! Row-sparse (document × term) score storage
//!
//! List-of-lists layout: each row keeps two parallel vectors, the columns
//! that hold a score and the scores themselves. A cell missing from its row
//! reads as `0.0`; zero is never materialized, so `set(.., 0.0)` is a no-op.
//!
//! Columns within a row are kept in insertion order, not sorted. Lookup is
//! linear in the density of the requested row and never touches other rows.

use okapi_core::{Error, Result};

// ============================================================================
// ScoreRow
// ============================================================================

/// Stored entries of one matrix row
#[derive(Debug, Clone, Default, PartialEq)]
struct ScoreRow {
    /// Columns holding a score, in insertion order
    indices: Vec<usize>,
    /// Scores aligned with `indices`
    scores: Vec<f64>,
}

impl ScoreRow {
    fn position(&self, col: usize) -> Option<usize> {
        self.indices.iter().position(|&c| c == col)
    }

    fn len(&self) -> usize {
        self.indices.len()
    }
}

// ============================================================================
// SparseScoreMatrix
// ============================================================================

/// Fixed-size `n_rows × n_cols` sparse matrix of `f64` scores.
///
/// Rows are documents, columns are vocabulary terms. Dimensions are fixed
/// at construction; every access is bounds-checked before it reads or
/// mutates anything.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseScoreMatrix {
    n_rows: usize,
    n_cols: usize,
    rows: Vec<ScoreRow>,
}

impl SparseScoreMatrix {
    /// Create an empty matrix with `n_rows` independent empty rows.
    pub fn new(n_rows: usize, n_cols: usize) -> Self {
        SparseScoreMatrix {
            n_rows,
            n_cols,
            rows: vec![ScoreRow::default(); n_rows],
        }
    }

    /// Create an empty matrix from signed dimensions.
    ///
    /// Fails with `InvalidDimensions` if either dimension is negative.
    pub fn try_new(n_rows: i64, n_cols: i64) -> Result<Self> {
        let (rows, cols) = Self::check_dimensions(n_rows, n_cols)?;
        Ok(Self::new(rows, cols))
    }

    /// Convert signed dimensions without allocating anything.
    pub fn check_dimensions(n_rows: i64, n_cols: i64) -> Result<(usize, usize)> {
        match (usize::try_from(n_rows), usize::try_from(n_cols)) {
            (Ok(rows), Ok(cols)) => Ok((rows, cols)),
            _ => Err(Error::InvalidDimensions {
                rows: n_rows,
                cols: n_cols,
            }),
        }
    }

    /// Restore a matrix wholesale from per-row column and score lists.
    ///
    /// The lists must describe a matrix this type could have produced:
    /// exactly `n_rows` rows, aligned lengths, in-range and unique columns
    /// within a row, and no stored zeros. Nothing is returned unless all of
    /// it holds.
    pub fn from_rows(
        n_rows: usize,
        n_cols: usize,
        indices: Vec<Vec<usize>>,
        scores: Vec<Vec<f64>>,
    ) -> Result<Self> {
        if indices.len() != n_rows || scores.len() != n_rows {
            return Err(Error::Format(format!(
                "expected {} rows, found {} index rows and {} data rows",
                n_rows,
                indices.len(),
                scores.len()
            )));
        }

        let mut rows = Vec::with_capacity(n_rows);
        for (row, (row_indices, row_scores)) in indices.into_iter().zip(scores).enumerate() {
            if row_indices.len() != row_scores.len() {
                return Err(Error::Format(format!(
                    "row {} has {} columns but {} scores",
                    row,
                    row_indices.len(),
                    row_scores.len()
                )));
            }
            for (i, &col) in row_indices.iter().enumerate() {
                if col >= n_cols {
                    return Err(Error::Format(format!(
                        "row {} references column {} of {}",
                        row, col, n_cols
                    )));
                }
                if row_indices[..i].contains(&col) {
                    return Err(Error::Format(format!(
                        "row {} stores column {} twice",
                        row, col
                    )));
                }
            }
            if let Some(pos) = row_scores.iter().position(|&s| s == 0.0) {
                return Err(Error::Format(format!(
                    "row {} stores an explicit zero at column {}",
                    row, row_indices[pos]
                )));
            }
            rows.push(ScoreRow {
                indices: row_indices,
                scores: row_scores,
            });
        }

        Ok(SparseScoreMatrix {
            n_rows,
            n_cols,
            rows,
        })
    }

    // ========================================================================
    // Dimensions
    // ========================================================================

    /// Number of rows (documents)
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns (terms)
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// Total number of stored entries
    pub fn nnz(&self) -> usize {
        self.rows.iter().map(ScoreRow::len).sum()
    }

    fn check_row(&self, row: usize) -> Result<()> {
        if row >= self.n_rows {
            return Err(Error::RowOutOfBounds {
                row,
                rows: self.n_rows,
            });
        }
        Ok(())
    }

    fn check_cell(&self, row: usize, col: usize) -> Result<()> {
        self.check_row(row)?;
        if col >= self.n_cols {
            return Err(Error::ColumnOutOfBounds {
                col,
                cols: self.n_cols,
            });
        }
        Ok(())
    }

    // ========================================================================
    // Cell access
    // ========================================================================

    /// Score at `(row, col)`, or `0.0` if nothing is stored there.
    pub fn get(&self, row: usize, col: usize) -> Result<f64> {
        self.check_cell(row, col)?;
        let r = &self.rows[row];
        Ok(r.position(col).map_or(0.0, |pos| r.scores[pos]))
    }

    /// Store `value` at `(row, col)`.
    ///
    /// Zero is a no-op. An existing entry is overwritten in place; otherwise
    /// the column and value are appended to the row.
    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        self.check_cell(row, col)?;
        if value == 0.0 {
            return Ok(());
        }
        let r = &mut self.rows[row];
        match r.position(col) {
            Some(pos) => r.scores[pos] = value,
            None => {
                r.indices.push(col);
                r.scores.push(value);
            }
        }
        Ok(())
    }

    // ========================================================================
    // Row access
    // ========================================================================

    /// Stored columns and their scores for one row, in insertion order.
    pub fn row(&self, row: usize) -> Result<(&[usize], &[f64])> {
        self.check_row(row)?;
        let r = &self.rows[row];
        Ok((r.indices.as_slice(), r.scores.as_slice()))
    }

    /// Number of stored entries in one row
    pub fn row_density(&self, row: usize) -> Result<usize> {
        self.check_row(row)?;
        Ok(self.rows[row].len())
    }

    /// Iterate rows in order as `(columns, scores)` slices.
    pub fn rows(&self) -> impl Iterator<Item = (&[usize], &[f64])> + '_ {
        self.rows
            .iter()
            .map(|r| (r.indices.as_slice(), r.scores.as_slice()))
    }

    /// Iterate all stored `(row, col, value)` triples, row by row.
    pub fn entries(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.rows.iter().enumerate().flat_map(|(row, r)| {
            r.indices
                .iter()
                .zip(&r.scores)
                .map(move |(&col, &value)| (row, col, value))
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_new_matrix_is_empty() {
        let m = SparseScoreMatrix::new(3, 4);
        assert_eq!(m.n_rows(), 3);
        assert_eq!(m.n_cols(), 4);
        assert_eq!(m.nnz(), 0);
        for row in 0..3 {
            for col in 0..4 {
                assert_eq!(m.get(row, col).unwrap(), 0.0);
            }
        }
    }

    #[test]
    fn test_try_new_rejects_negative() {
        assert!(matches!(
            SparseScoreMatrix::try_new(-1, 4),
            Err(Error::InvalidDimensions { rows: -1, cols: 4 })
        ));
        assert!(SparseScoreMatrix::try_new(2, -3).is_err());
        let m = SparseScoreMatrix::try_new(0, 0).unwrap();
        assert_eq!(m.n_rows(), 0);
    }

    #[test]
    fn test_set_then_get() {
        let mut m = SparseScoreMatrix::new(2, 3);
        m.set(1, 2, 0.5).unwrap();
        assert_eq!(m.get(1, 2).unwrap(), 0.5);
        assert_eq!(m.get(0, 2).unwrap(), 0.0);
        assert_eq!(m.get(1, 1).unwrap(), 0.0);
    }

    #[test]
    fn test_overwrite_does_not_grow_row() {
        let mut m = SparseScoreMatrix::new(1, 3);
        m.set(0, 1, 0.5).unwrap();
        m.set(0, 1, 0.75).unwrap();
        assert_eq!(m.get(0, 1).unwrap(), 0.75);
        assert_eq!(m.row_density(0).unwrap(), 1);
    }

    #[test]
    fn test_set_zero_is_noop() {
        let mut m = SparseScoreMatrix::new(1, 3);
        m.set(0, 0, 0.0).unwrap();
        assert_eq!(m.row_density(0).unwrap(), 0);

        // Zero does not erase an existing entry either
        m.set(0, 1, 0.3).unwrap();
        m.set(0, 1, 0.0).unwrap();
        assert_eq!(m.get(0, 1).unwrap(), 0.3);
    }

    #[test]
    fn test_append_order_is_kept() {
        let mut m = SparseScoreMatrix::new(1, 10);
        m.set(0, 7, 1.0).unwrap();
        m.set(0, 2, 2.0).unwrap();
        m.set(0, 5, 3.0).unwrap();
        let (cols, scores) = m.row(0).unwrap();
        assert_eq!(cols, &[7, 2, 5]);
        assert_eq!(scores, &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut m = SparseScoreMatrix::new(2, 3);
        assert!(matches!(
            m.get(2, 0),
            Err(Error::RowOutOfBounds { row: 2, rows: 2 })
        ));
        assert!(matches!(
            m.get(0, 3),
            Err(Error::ColumnOutOfBounds { col: 3, cols: 3 })
        ));
        assert!(m.set(5, 0, 1.0).unwrap_err().is_bounds());
        assert!(m.set(0, 9, 1.0).unwrap_err().is_bounds());
        assert!(m.row(2).is_err());
        assert_eq!(m.nnz(), 0);
    }

    #[test]
    fn test_from_rows_roundtrip() {
        let m = SparseScoreMatrix::from_rows(
            2,
            4,
            vec![vec![0, 3], vec![]],
            vec![vec![0.1, 0.2], vec![]],
        )
        .unwrap();
        assert_eq!(m.get(0, 3).unwrap(), 0.2);
        assert_eq!(m.row_density(1).unwrap(), 0);
        let triples: Vec<_> = m.entries().collect();
        assert_eq!(triples, vec![(0, 0, 0.1), (0, 3, 0.2)]);
    }

    #[test]
    fn test_from_rows_rejects_inconsistent_input() {
        // wrong row count
        assert!(SparseScoreMatrix::from_rows(2, 2, vec![vec![]], vec![vec![]]).is_err());
        // misaligned row
        assert!(SparseScoreMatrix::from_rows(1, 2, vec![vec![0, 1]], vec![vec![1.0]]).is_err());
        // column out of range
        assert!(SparseScoreMatrix::from_rows(1, 2, vec![vec![2]], vec![vec![1.0]]).is_err());
        // duplicate column
        assert!(
            SparseScoreMatrix::from_rows(1, 2, vec![vec![1, 1]], vec![vec![1.0, 2.0]]).is_err()
        );
        // explicit zero
        assert!(SparseScoreMatrix::from_rows(1, 2, vec![vec![0]], vec![vec![0.0]]).is_err());
    }

    proptest! {
        #[test]
        fn prop_set_get(row in 0usize..8, col in 0usize..8, value in prop::num::f64::NORMAL) {
            let mut m = SparseScoreMatrix::new(8, 8);
            m.set(row, col, value).unwrap();
            prop_assert_eq!(m.get(row, col).unwrap(), value);
            prop_assert_eq!(m.row_density(row).unwrap(), 1);
        }

        #[test]
        fn prop_last_write_wins(
            writes in prop::collection::vec((0usize..4, 0usize..4, 0.01f64..10.0), 1..40)
        ) {
            let mut m = SparseScoreMatrix::new(4, 4);
            let mut expected = std::collections::HashMap::new();
            for &(row, col, value) in &writes {
                m.set(row, col, value).unwrap();
                expected.insert((row, col), value);
            }
            prop_assert_eq!(m.nnz(), expected.len());
            for ((row, col), value) in expected {
                prop_assert_eq!(m.get(row, col).unwrap(), value);
            }
        }
    }
}

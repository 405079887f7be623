//! Line-oriented text form of the index
//!
//! ```text
//! docNames
//! file1.txt|file2.txt
//! numOfDocs
//! 2
//! vocabSize
//! 4
//! vocabulary
//! like best plai can
//! matrixScores
//! nRows : 2
//! nCols : 4
//! Indices
//! 0 : 0, 1
//! 1 : 2, 3
//! Data
//! 0 : 0.21, 0.45
//! 1 : 0.1, 0.32
//! ```
//!
//! Scores are written with Rust's shortest round-trip float formatting, so
//! parsing them back yields the identical `f64`.

use crate::index::Index;
use crate::matrix::SparseScoreMatrix;
use okapi_core::{Error, Result};
use std::fmt::{self, Write};
use std::str::FromStr;

const DOC_NAMES: &str = "docNames";
const NUM_OF_DOCS: &str = "numOfDocs";
const VOCAB_SIZE: &str = "vocabSize";
const VOCABULARY: &str = "vocabulary";
const MATRIX_SCORES: &str = "matrixScores";
const N_ROWS: &str = "nRows";
const N_COLS: &str = "nCols";
const INDICES: &str = "Indices";
const DATA: &str = "Data";

const NAME_SEPARATOR: char = '|';

// ============================================================================
// Encoding
// ============================================================================

/// Encode a matrix: `nRows`/`nCols` lines, then the `Indices` and `Data`
/// sections with one `<row> : v0, v1, ...` line per row.
pub fn encode_matrix_text(matrix: &SparseScoreMatrix) -> String {
    let mut out = String::new();
    // fmt::Write for String never errors
    let _ = write_matrix(&mut out, matrix);
    out
}

fn write_matrix(out: &mut String, matrix: &SparseScoreMatrix) -> fmt::Result {
    writeln!(out, "{} : {}", N_ROWS, matrix.n_rows())?;
    writeln!(out, "{} : {}", N_COLS, matrix.n_cols())?;
    writeln!(out, "{}", INDICES)?;
    for (row, (cols, _)) in matrix.rows().enumerate() {
        write_row(out, row, cols)?;
    }
    writeln!(out, "{}", DATA)?;
    for (row, (_, scores)) in matrix.rows().enumerate() {
        write_row(out, row, scores)?;
    }
    Ok(())
}

fn write_row<T: fmt::Display>(out: &mut String, row: usize, values: &[T]) -> fmt::Result {
    write!(out, "{} : ", row)?;
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write!(out, "{}", value)?;
    }
    writeln!(out)
}

/// Encode an index in the text form.
///
/// Fails with `Unencodable` if a document name is empty or contains `|` or
/// a line break, or a term is empty or contains whitespace.
pub fn encode_index_text(index: &Index) -> Result<String> {
    let reserved = |c: char| c == NAME_SEPARATOR || c == '\n' || c == '\r';
    for name in index.document_names() {
        if name.is_empty() || name.contains(reserved) {
            return Err(Error::Unencodable(format!(
                "document name {:?} is empty or contains '|' or a line break",
                name
            )));
        }
    }
    for term in index.vocabulary() {
        if term.is_empty() || term.contains(char::is_whitespace) {
            return Err(Error::Unencodable(format!(
                "term {:?} is empty or contains whitespace",
                term
            )));
        }
    }

    let mut out = String::new();
    // fmt::Write for String never errors
    let _ = write_index(&mut out, index);
    Ok(out)
}

fn write_index(out: &mut String, index: &Index) -> fmt::Result {
    writeln!(out, "{}", DOC_NAMES)?;
    writeln!(out, "{}", index.document_names().join("|"))?;
    writeln!(out, "{}", NUM_OF_DOCS)?;
    writeln!(out, "{}", index.num_docs())?;
    writeln!(out, "{}", VOCAB_SIZE)?;
    writeln!(out, "{}", index.vocab_size())?;
    writeln!(out, "{}", VOCABULARY)?;
    writeln!(out, "{}", index.vocabulary().join(" "))?;
    writeln!(out, "{}", MATRIX_SCORES)?;
    write_matrix(out, index.matrix())
}

// ============================================================================
// Decoding
// ============================================================================

/// Line reader that tracks 1-based line numbers for error messages.
struct LineCursor<'a> {
    lines: std::str::Lines<'a>,
    line_no: usize,
}

impl<'a> LineCursor<'a> {
    fn new(input: &'a str) -> Self {
        LineCursor {
            lines: input.lines(),
            line_no: 0,
        }
    }

    fn next_line(&mut self, expected: &str) -> Result<&'a str> {
        self.line_no += 1;
        self.lines.next().ok_or_else(|| Error::MissingLine {
            line: self.line_no,
            expected: expected.to_string(),
        })
    }

    fn unexpected(&self, expected: &str, found: &str) -> Error {
        Error::UnexpectedLine {
            line: self.line_no,
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    fn expect_header(&mut self, header: &str) -> Result<()> {
        let line = self.next_line(header)?;
        if line.trim() != header {
            return Err(self.unexpected(header, line));
        }
        Ok(())
    }

    /// Read a `<key> : <value>` line and return the trimmed value.
    fn key_value(&mut self, key: &str) -> Result<&'a str> {
        let line = self.next_line(key)?;
        match line.split_once(':') {
            Some((k, v)) if k.trim() == key => Ok(v.trim()),
            _ => Err(self.unexpected(key, line)),
        }
    }

    fn parse<T: FromStr>(&self, value: &str, what: &str) -> Result<T> {
        value.trim().parse().map_err(|_| {
            Error::Format(format!(
                "line {}: invalid {} {:?}",
                self.line_no, what, value
            ))
        })
    }

    /// Read a `<row> : v0, v1, ...` line for row `row`.
    fn row_values<T: FromStr>(&mut self, row: usize, section: &str) -> Result<Vec<T>> {
        let expected = format!("{} row {}", section, row);
        let line = self.next_line(&expected)?;
        let Some((prefix, rest)) = line.split_once(':') else {
            return Err(self.unexpected(&expected, line));
        };
        let found: usize = self.parse(prefix, "row number")?;
        if found != row {
            return Err(self.unexpected(&expected, line));
        }
        let rest = rest.trim();
        if rest.is_empty() {
            return Ok(Vec::new());
        }
        rest.split(',')
            .map(|v| self.parse(v, section))
            .collect()
    }

    /// Everything after the last section must be blank.
    fn finish(mut self) -> Result<()> {
        for line in self.lines.by_ref() {
            self.line_no += 1;
            if !line.trim().is_empty() {
                return Err(Error::Format(format!(
                    "line {}: unexpected trailing content {:?}",
                    self.line_no, line
                )));
            }
        }
        Ok(())
    }
}

fn read_matrix(cursor: &mut LineCursor<'_>) -> Result<SparseScoreMatrix> {
    let value = cursor.key_value(N_ROWS)?;
    let n_rows: i64 = cursor.parse(value, N_ROWS)?;
    let value = cursor.key_value(N_COLS)?;
    let n_cols: i64 = cursor.parse(value, N_COLS)?;
    let (n_rows, n_cols) = SparseScoreMatrix::check_dimensions(n_rows, n_cols)?;

    cursor.expect_header(INDICES)?;
    let indices = (0..n_rows)
        .map(|row| cursor.row_values::<usize>(row, "column index"))
        .collect::<Result<Vec<_>>>()?;

    cursor.expect_header(DATA)?;
    let data = (0..n_rows)
        .map(|row| cursor.row_values::<f64>(row, "score"))
        .collect::<Result<Vec<_>>>()?;

    SparseScoreMatrix::from_rows(n_rows, n_cols, indices, data)
}

/// Decode a matrix produced by `encode_matrix_text`.
pub fn decode_matrix_text(input: &str) -> Result<SparseScoreMatrix> {
    let mut cursor = LineCursor::new(input);
    let matrix = read_matrix(&mut cursor)?;
    cursor.finish()?;
    Ok(matrix)
}

/// Decode an index produced by `encode_index_text`.
///
/// Every header is checked in order; the first mismatch is reported with
/// its line number and the field that was expected there.
pub fn decode_index_text(input: &str) -> Result<Index> {
    let mut cursor = LineCursor::new(input);

    cursor.expect_header(DOC_NAMES)?;
    let names_line = cursor.next_line("document names")?;
    let document_names: Vec<String> = if names_line.is_empty() {
        Vec::new()
    } else {
        names_line.split(NAME_SEPARATOR).map(str::to_string).collect()
    };

    cursor.expect_header(NUM_OF_DOCS)?;
    let line = cursor.next_line("document count")?;
    let num_docs: usize = cursor.parse(line, NUM_OF_DOCS)?;

    cursor.expect_header(VOCAB_SIZE)?;
    let line = cursor.next_line("vocabulary size")?;
    let vocab_size: usize = cursor.parse(line, VOCAB_SIZE)?;

    cursor.expect_header(VOCABULARY)?;
    let vocabulary: Vec<String> = cursor
        .next_line("vocabulary terms")?
        .split_whitespace()
        .map(str::to_string)
        .collect();

    if document_names.len() != num_docs {
        return Err(Error::Format(format!(
            "{} is {} but {} document names are listed",
            NUM_OF_DOCS,
            num_docs,
            document_names.len()
        )));
    }
    if vocabulary.len() != vocab_size {
        return Err(Error::Format(format!(
            "{} is {} but {} terms are listed",
            VOCAB_SIZE,
            vocab_size,
            vocabulary.len()
        )));
    }

    cursor.expect_header(MATRIX_SCORES)?;
    let matrix = read_matrix(&mut cursor)?;
    cursor.finish()?;

    Index::from_parts(vocabulary, document_names, matrix)
}

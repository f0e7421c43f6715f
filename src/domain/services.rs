//! Clipboard paste interpretation.
//!
//! Turns tab-separated clipboard text into the `changes` / `additions` pair
//! that the grid controller consumes, splitting writes that land inside the
//! grid from writes that run past its last row.

use super::errors::DomainResult;
use super::models::{CellChange, Grid, Position, Value};

/// Parses pasted text into a matrix of strings.
///
/// Rows are newline separated and cells tab separated, which is what other
/// spreadsheets put on the clipboard. Ragged rows are allowed.
///
/// # Examples
///
/// ```
/// use gridhooks::domain::PasteParser;
///
/// let matrix = PasteParser::parse("a\tb\nc\td\n").unwrap();
/// assert_eq!(matrix, vec![vec!["a", "b"], vec!["c", "d"]]);
/// ```
pub struct PasteParser;

impl PasteParser {
    pub fn parse(text: &str) -> DomainResult<Vec<Vec<String>>> {
        let body = text.strip_suffix('\n').unwrap_or(text);
        if body.is_empty() {
            return Ok(Vec::new());
        }

        body.split('\n')
            .map(|line| Self::parse_line(line.strip_suffix('\r').unwrap_or(line)))
            .collect()
    }

    /// An empty line is a row holding one empty cell, not a missing row.
    fn parse_line(line: &str) -> DomainResult<Vec<String>> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(line.as_bytes());

        match reader.records().next() {
            Some(record) => Ok(record?.iter().map(str::to_string).collect()),
            None => Ok(vec![String::new()]),
        }
    }
}

/// A paste split into in-bounds writes and writes past the last row.
#[derive(Debug, Default, PartialEq)]
pub struct PastePlan {
    pub changes: Vec<CellChange>,
    pub additions: Vec<CellChange>,
}

impl PastePlan {
    /// Lays `matrix` out with its top-left corner at `anchor`.
    ///
    /// Cells on an existing row and column become changes. Cells below the
    /// last row become additions. Cells to the right of an existing row are
    /// dropped, since rows never grow sideways.
    pub fn build(grid: &Grid, anchor: Position, matrix: &[Vec<String>]) -> Self {
        let mut plan = PastePlan::default();

        for (dr, values) in matrix.iter().enumerate() {
            let row = anchor.i + dr;
            for (dc, raw) in values.iter().enumerate() {
                let col = anchor.j + dc;
                let change = CellChange::new(row, col, Value::text(raw.as_str()));
                match grid.row(row) {
                    Some(cells) if col < cells.len() => plan.changes.push(change),
                    Some(_) => {}
                    None => plan.additions.push(change),
                }
            }
        }

        plan
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.additions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len() + self.additions.len()
    }
}

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use super::errors::{DomainError, DomainResult};

/// A free-form primitive stored in a cell.
///
/// Deserialized untagged so that seed data can mix `"1"` and `4`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Text(String::new())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            Value::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Cell {
    pub value: Value,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl Cell {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Returns a copy of this cell holding `value`, keeping every attribute.
    pub fn with_value(&self, value: Value) -> Self {
        Self {
            value,
            attributes: self.attributes.clone(),
        }
    }
}

/// How wide a column renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnWidth {
    /// Share of the table width, e.g. `"30%"`.
    Percent(u16),
    /// Fixed number of terminal cells, e.g. `"12"`.
    Cells(u16),
}

impl FromStr for ColumnWidth {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        let trimmed = s.trim();
        let invalid = || DomainError::InvalidColumnWidth(s.to_string());

        if let Some(pct) = trimmed.strip_suffix('%') {
            let pct = pct.trim().parse::<u16>().map_err(|_| invalid())?;
            if pct == 0 || pct > 100 {
                return Err(invalid());
            }
            Ok(ColumnWidth::Percent(pct))
        } else {
            let cells = trimmed.parse::<u16>().map_err(|_| invalid())?;
            if cells == 0 {
                return Err(invalid());
            }
            Ok(ColumnWidth::Cells(cells))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Column {
    pub label: String,
    pub width: String,
    /// Value given to this column when a row is synthesized.
    #[serde(default)]
    pub default: Value,
}

impl Column {
    pub fn new(label: impl Into<String>, width: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            width: width.into(),
            default: Value::default(),
        }
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = default.into();
        self
    }

    pub fn parsed_width(&self) -> DomainResult<ColumnWidth> {
        self.width.parse()
    }
}

/// Row-major grid of cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, row: usize) -> Option<&[Cell]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Replaces the value at (row, col). Returns `false` when the slot does
    /// not exist, in which case nothing is written.
    pub fn set_value(&mut self, row: usize, col: usize, value: Value) -> bool {
        match self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            Some(cell) => {
                *cell = cell.with_value(value);
                true
            }
            None => false,
        }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    /// A row of default cells, one per column.
    pub fn blank_row(columns: &[Column]) -> Vec<Cell> {
        columns.iter().map(|c| Cell::new(c.default.clone())).collect()
    }
}

/// A (row, column) coordinate as the grid engine reports it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    pub i: usize,
    pub j: usize,
}

impl Position {
    pub fn new(i: usize, j: usize) -> Self {
        Self { i, j }
    }
}

/// Raw start/end of a selection gesture. Not normalized: `start` is where the
/// gesture began, which may lie after `end`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionArea {
    pub start: Position,
    pub end: Position,
}

impl SelectionArea {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    pub fn single(pos: Position) -> Self {
        Self { start: pos, end: pos }
    }

    /// Top-left and bottom-right corners.
    pub fn bounds(&self) -> (Position, Position) {
        (
            Position::new(self.start.i.min(self.end.i), self.start.j.min(self.end.j)),
            Position::new(self.start.i.max(self.end.i), self.start.j.max(self.end.j)),
        )
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        let (top_left, bottom_right) = self.bounds();
        (top_left.i..=bottom_right.i).contains(&row) && (top_left.j..=bottom_right.j).contains(&col)
    }
}

/// A contiguous run of selected columns within one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSelection {
    pub start_index: usize,
    pub cells: usize,
}

impl RangeSelection {
    pub fn new(start_index: usize, cells: usize) -> Self {
        Self { start_index, cells }
    }

    /// Bulk fill is only supported within a single row, so anything spanning
    /// rows or selected right-to-left yields `None`.
    pub fn from_area(area: &SelectionArea) -> Option<Self> {
        if area.start.i == area.end.i && area.start.j <= area.end.j {
            Some(Self {
                start_index: area.start.j,
                cells: area.end.j - area.start.j + 1,
            })
        } else {
            None
        }
    }
}

/// A value written at (row, col), as reported by the grid engine.
#[derive(Debug, Clone, PartialEq)]
pub struct CellChange {
    pub row: usize,
    pub col: usize,
    pub value: Value,
}

impl CellChange {
    pub fn new(row: usize, col: usize, value: impl Into<Value>) -> Self {
        Self {
            row,
            col,
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Number(4.0).to_string(), "4");
        assert_eq!(Value::Number(-2.5).to_string(), "-2.5");
        assert_eq!(Value::text("abc").to_string(), "abc");
        assert_eq!(Value::default(), Value::text(""));
    }

    #[test]
    fn test_value_untagged_json() {
        let cells: Vec<Cell> =
            serde_json::from_str(r#"[{"value":"1"},{"value":4,"attributes":{"data-foo":"bar"}}]"#).unwrap();
        assert_eq!(cells[0].value, Value::text("1"));
        assert_eq!(cells[1].value, Value::Number(4.0));
        assert_eq!(cells[1].attributes.get("data-foo").map(String::as_str), Some("bar"));
    }

    #[test]
    fn test_with_value_keeps_attributes() {
        let cell = Cell::new(4.0).with_attribute("data-foo", "bar");
        let updated = cell.with_value(Value::text("X"));
        assert_eq!(updated.value, Value::text("X"));
        assert_eq!(updated.attributes, cell.attributes);
    }

    #[test]
    fn test_column_width_parsing() {
        assert_eq!("30%".parse::<ColumnWidth>().unwrap(), ColumnWidth::Percent(30));
        assert_eq!(" 12 ".parse::<ColumnWidth>().unwrap(), ColumnWidth::Cells(12));
        assert!("0%".parse::<ColumnWidth>().is_err());
        assert!("150%".parse::<ColumnWidth>().is_err());
        assert!("wide".parse::<ColumnWidth>().is_err());
        assert!("".parse::<ColumnWidth>().is_err());
    }

    #[test]
    fn test_range_from_same_row() {
        let area = SelectionArea::new(Position::new(2, 1), Position::new(2, 3));
        assert_eq!(RangeSelection::from_area(&area), Some(RangeSelection::new(1, 3)));
    }

    #[test]
    fn test_range_from_different_rows() {
        let area = SelectionArea::new(Position::new(1, 0), Position::new(2, 0));
        assert_eq!(RangeSelection::from_area(&area), None);
    }

    #[test]
    fn test_range_from_reversed_columns() {
        let area = SelectionArea::new(Position::new(0, 3), Position::new(0, 1));
        assert_eq!(RangeSelection::from_area(&area), None);
    }

    #[test]
    fn test_range_single_cell() {
        let area = SelectionArea::single(Position::new(5, 2));
        assert_eq!(RangeSelection::from_area(&area), Some(RangeSelection::new(2, 1)));
    }

    #[test]
    fn test_selection_area_bounds() {
        let area = SelectionArea::new(Position::new(3, 2), Position::new(1, 0));
        assert_eq!(area.bounds(), (Position::new(1, 0), Position::new(3, 2)));
        assert!(area.contains(2, 1));
        assert!(!area.contains(4, 1));
    }

    #[test]
    fn test_grid_set_value_guards_bounds() {
        let mut grid = Grid::from_rows(vec![vec![Cell::new("a"), Cell::new("b")]]);
        assert!(grid.set_value(0, 1, Value::text("z")));
        assert!(!grid.set_value(0, 2, Value::text("z")));
        assert!(!grid.set_value(1, 0, Value::text("z")));
        assert_eq!(grid.cell(0, 1).unwrap().value, Value::text("z"));
    }

    #[test]
    fn test_blank_row_uses_column_defaults() {
        let columns = vec![Column::new("a", "50%"), Column::new("b", "50%").with_default(0.0)];
        let row = Grid::blank_row(&columns);
        assert_eq!(row, vec![Cell::new(""), Cell::new(0.0)]);
    }
}

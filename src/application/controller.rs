//! The grid controller: authoritative sheet state and its transitions.
//!
//! Owns the grid contents, column metadata, per-row checkbox flags and the
//! current single-row range selection. Every operation is synchronous and
//! total; writes aimed at cells that do not exist are skipped.

use tracing::{debug, warn};

use crate::domain::{
    Cell, CellChange, Column, DomainError, DomainResult, Grid, RangeSelection, SelectionArea,
};

/// Sheet state mutated by grid engine events.
///
/// # Examples
///
/// ```
/// use gridhooks::application::GridController;
/// use gridhooks::domain::{Cell, CellChange, Column, Position, SelectionArea};
///
/// let columns = vec![Column::new("a", "50%"), Column::new("b", "50%")];
/// let rows = vec![vec![Cell::new("1"), Cell::new("2")]];
/// let mut controller = GridController::new(columns, rows).unwrap();
///
/// controller.on_select(SelectionArea::new(Position::new(0, 0), Position::new(0, 1)));
/// controller.apply_cell_changes(&[CellChange::new(0, 0, "X")], None);
/// assert_eq!(controller.grid().cell(0, 1).unwrap().value.to_string(), "X");
/// ```
#[derive(Debug, Clone)]
pub struct GridController {
    columns: Vec<Column>,
    grid: Grid,
    selections: Vec<bool>,
    range: Option<RangeSelection>,
    revision: u64,
}

impl GridController {
    /// Builds a controller over `rows`, with every row unchecked and no
    /// range selection.
    ///
    /// # Errors
    ///
    /// Fails when there are no columns or when a row has fewer cells than
    /// there are columns.
    pub fn new(columns: Vec<Column>, rows: Vec<Vec<Cell>>) -> DomainResult<Self> {
        if columns.is_empty() {
            return Err(DomainError::NoColumns);
        }
        for column in &columns {
            column.parsed_width()?;
        }
        if let Some((row, cells)) = rows.iter().enumerate().find(|(_, r)| r.len() < columns.len()) {
            return Err(DomainError::ShortRow {
                row,
                cells: cells.len(),
                columns: columns.len(),
            });
        }

        let selections = vec![false; rows.len()];
        Ok(Self {
            columns,
            grid: Grid::from_rows(rows),
            selections,
            range: None,
            revision: 0,
        })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn selections(&self) -> &[bool] {
        &self.selections
    }

    pub fn range_selection(&self) -> Option<RangeSelection> {
        self.range
    }

    /// Bumped every time the grid actually changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn all_selected(&self) -> bool {
        self.selections.iter().all(|s| *s)
    }

    pub fn is_row_selected(&self, row: usize) -> bool {
        self.selections.get(row).copied().unwrap_or(false)
    }

    pub fn selected_rows(&self) -> Vec<usize> {
        self.selections
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.then_some(i))
            .collect()
    }

    pub fn set_all_selected(&mut self, checked: bool) {
        debug!(checked, rows = self.selections.len(), "set all rows selected");
        self.selections.iter_mut().for_each(|s| *s = checked);
    }

    /// Out-of-range rows are ignored.
    pub fn set_row_selected(&mut self, row_index: usize, checked: bool) {
        match self.selections.get_mut(row_index) {
            Some(flag) => {
                debug!(row_index, checked, "set row selected");
                *flag = checked;
            }
            None => debug!(row_index, "ignoring selection for row without a checkbox"),
        }
    }

    pub fn set_range_selection(&mut self, range: Option<RangeSelection>) {
        self.range = range;
    }

    /// Handles a selection gesture from the engine.
    pub fn on_select(&mut self, area: SelectionArea) {
        let range = RangeSelection::from_area(&area);
        debug!(?area, ?range, "selection changed");
        self.set_range_selection(range);
    }

    /// Applies edits and paste overflow reported by the engine.
    ///
    /// A single change while a range is active is the engine's collapsed
    /// form of "typed one value into the whole range", so it is written to
    /// every column of the range. Otherwise each change lands at its own
    /// coordinates. `additions` target rows past the end of the grid. An
    /// addition aimed at the row just past the end synthesizes that row from
    /// the column defaults; additions further out are skipped.
    pub fn apply_cell_changes(&mut self, changes: &[CellChange], additions: Option<&[CellChange]>) {
        let mut touched = false;

        match (changes, self.range) {
            ([change], Some(range)) => {
                for offset in 0..range.cells {
                    let Some(col) = change.col.checked_add(offset) else {
                        warn!(row = change.row, col = change.col, offset, "fill runs past the last column");
                        break;
                    };
                    touched |= self.write(change.row, col, change);
                }
            }
            _ => {
                for change in changes {
                    touched |= self.write(change.row, change.col, change);
                }
            }
        }

        for addition in additions.unwrap_or_default() {
            let row_count = self.grid.row_count();
            if addition.row == row_count {
                debug!(row = row_count, "appending row for pasted data");
                self.grid.push_row(Grid::blank_row(&self.columns));
                touched = true;
            } else if addition.row > row_count {
                warn!(row = addition.row, row_count, "skipping addition past the next row");
                continue;
            }
            touched |= self.write(addition.row, addition.col, addition);
        }

        if touched {
            self.revision += 1;
        }
    }

    fn write(&mut self, row: usize, col: usize, change: &CellChange) -> bool {
        let written = self.grid.set_value(row, col, change.value.clone());
        if !written {
            warn!(row, col, "skipping write outside the grid");
        }
        written
    }
}

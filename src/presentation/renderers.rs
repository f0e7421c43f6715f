//! Renderer hooks for the sheet.
//!
//! The sheet driver in [`crate::presentation::ui`] walks the grid and asks a
//! [`GridRenderers`] implementation to produce each piece: the table shell and
//! header, every row, every cell, and the display text of a value. The
//! trait's default methods give a plain grid; [`OverrideRenderers`] replaces
//! all of them to add row checkboxes, a "select all" header checkbox, column
//! widths from the column metadata, and range-spanning edit cells.

use ratatui::{
    layout::Constraint,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell as TableCell, Row, Table},
};
use tracing::trace;

use crate::domain::{Cell, Column, ColumnWidth, Position, RangeSelection};

/// What the sheet hook sees.
pub struct SheetContext<'a> {
    pub columns: &'a [Column],
    pub all_selected: bool,
}

/// What a row hook sees.
pub struct RowContext {
    pub row: usize,
    pub selected: bool,
    pub has_cursor: bool,
}

/// What a cell hook sees.
pub struct CellContext<'a> {
    pub row: usize,
    pub col: usize,
    pub cell: &'a Cell,
    pub column: &'a Column,
    /// Inside the current selection area.
    pub selected: bool,
    pub has_cursor: bool,
    /// Cell being edited, if any.
    pub editing_at: Option<Position>,
    /// Edit buffer, present only on the edited cell.
    pub edit_buffer: Option<&'a str>,
    pub range: Option<RangeSelection>,
}

impl CellContext<'_> {
    pub fn is_editing(&self) -> bool {
        self.edit_buffer.is_some()
    }

    /// True for cells covered by an edit that spans the active range. They
    /// are hidden so the edited cell reads as one wide cell.
    pub fn is_hidden_sibling(&self) -> bool {
        match (self.editing_at, self.range) {
            (Some(at), Some(range)) => {
                at.i == self.row && self.col > at.j && self.col < at.j + range.cells
            }
            _ => false,
        }
    }
}

/// One hook per render target.
pub trait GridRenderers {
    fn sheet<'a>(&self, ctx: &SheetContext<'_>, rows: Vec<Row<'a>>) -> Table<'a> {
        let header = Row::new(ctx.columns.iter().map(|c| TableCell::from(c.label.clone())))
            .style(Style::default().fg(Color::Yellow));
        let widths = vec![Constraint::Fill(1); ctx.columns.len()];
        Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL))
            .column_spacing(1)
    }

    fn row<'a>(&self, _ctx: &RowContext, cells: Vec<TableCell<'a>>) -> Row<'a> {
        Row::new(cells).height(1)
    }

    fn cell<'a>(&self, ctx: &CellContext<'_>) -> TableCell<'a> {
        let text = match ctx.edit_buffer {
            Some(buffer) => buffer.to_string(),
            None => self.value(ctx.cell),
        };
        TableCell::from(text).style(default_cell_style(ctx))
    }

    fn value(&self, cell: &Cell) -> String {
        cell.value.to_string()
    }
}

fn default_cell_style(ctx: &CellContext<'_>) -> Style {
    if ctx.is_editing() {
        Style::default().bg(Color::Green).fg(Color::Black)
    } else if ctx.has_cursor {
        Style::default().bg(Color::Blue).fg(Color::White)
    } else if ctx.selected {
        Style::default().bg(Color::DarkGray)
    } else {
        Style::default()
    }
}

/// The library look, with no hooks overridden.
pub struct DefaultRenderers;

impl GridRenderers for DefaultRenderers {}

/// Every hook overridden.
pub struct OverrideRenderers;

const CHECKBOX_WIDTH: u16 = 3;

fn checkbox(checked: bool) -> &'static str {
    if checked { "[x]" } else { "[ ]" }
}

pub fn column_constraint(column: &Column) -> Constraint {
    match column.parsed_width() {
        Ok(ColumnWidth::Percent(pct)) => Constraint::Percentage(pct),
        Ok(ColumnWidth::Cells(cells)) => Constraint::Length(cells),
        Err(_) => Constraint::Fill(1),
    }
}

impl GridRenderers for OverrideRenderers {
    fn sheet<'a>(&self, ctx: &SheetContext<'_>, rows: Vec<Row<'a>>) -> Table<'a> {
        let mut header = vec![TableCell::from(checkbox(ctx.all_selected))];
        header.extend(
            ctx.columns
                .iter()
                .map(|c| TableCell::from(c.label.clone()).style(Style::default().add_modifier(Modifier::BOLD))),
        );

        let mut widths = vec![Constraint::Length(CHECKBOX_WIDTH)];
        widths.extend(ctx.columns.iter().map(column_constraint));

        Table::new(rows, widths)
            .header(Row::new(header).style(Style::default().fg(Color::Yellow)).height(1))
            .block(Block::default().borders(Borders::ALL).title("Sheet"))
            .column_spacing(1)
    }

    fn row<'a>(&self, ctx: &RowContext, cells: Vec<TableCell<'a>>) -> Row<'a> {
        let checkbox_style = if ctx.has_cursor {
            Style::default().fg(Color::LightBlue)
        } else {
            Style::default().fg(Color::Yellow)
        };
        let mut all = vec![TableCell::from(checkbox(ctx.selected)).style(checkbox_style)];
        all.extend(cells);
        Row::new(all).height(1)
    }

    fn cell<'a>(&self, ctx: &CellContext<'_>) -> TableCell<'a> {
        trace!(row = ctx.row, col = ctx.col, "render cell");

        if ctx.is_hidden_sibling() {
            return TableCell::from("").style(Style::default().bg(Color::Green));
        }

        let text = match ctx.edit_buffer {
            Some(buffer) => format!("{}▏", buffer),
            None => self.value(ctx.cell),
        };

        let mut style = default_cell_style(ctx);
        if !ctx.cell.attributes.is_empty() && !ctx.is_editing() {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        TableCell::from(text).style(style)
    }
}

//! Application state management for the grid demo.
//!
//! `App` plays the grid engine: it tracks the cursor, the selection anchor
//! and the edit buffer, and turns gestures into `on_select` and
//! `on_cells_changed` events for the [`GridController`].

use tracing::{debug, info};

use crate::application::GridController;
use crate::domain::{CellChange, DomainResult, PasteParser, PastePlan, Position, SelectionArea, Value};

/// Represents the current mode of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Navigation mode - arrow keys move the cursor, shortcuts available
    Normal,
    /// Cell editing mode - user is typing into the selected cell
    Editing,
    /// Help screen is displayed
    Help,
}

/// Main application state containing the controller and UI state.
///
/// # Examples
///
/// ```
/// use gridhooks::application::App;
///
/// let app = App::default();
/// assert_eq!(app.cursor.i, 0);
/// assert_eq!(app.cursor.j, 0);
/// ```
#[derive(Debug)]
pub struct App {
    /// Authoritative sheet state
    pub controller: GridController,
    /// Cell the cursor is on; the end of the selection gesture
    pub cursor: Position,
    /// Where a shift-extended selection started
    pub anchor: Option<Position>,
    /// Current application mode
    pub mode: AppMode,
    /// Edit buffer
    pub input: String,
    /// Cursor position within the edit buffer, in chars
    pub cursor_position: usize,
    /// Scroll position in help text
    pub help_scroll: usize,
    /// Temporary status message to display
    pub status_message: Option<String>,
    /// Whether the checked-rows side panel is shown
    pub show_checklist: bool,
    /// Top row visible in the viewport
    pub scroll_row: usize,
    /// Viewport height in rows
    pub viewport_rows: usize,
}

impl Default for App {
    fn default() -> Self {
        let controller = crate::infrastructure::SheetConfig::default()
            .into_controller()
            .expect("built-in seed is valid");
        Self::new(controller)
    }
}

impl App {
    pub fn new(controller: GridController) -> Self {
        Self {
            controller,
            cursor: Position::default(),
            anchor: None,
            mode: AppMode::Normal,
            input: String::new(),
            cursor_position: 0,
            help_scroll: 0,
            status_message: None,
            show_checklist: false,
            scroll_row: 0,
            viewport_rows: 20,
        }
    }

    /// The current gesture: from the anchor (or cursor) to the cursor.
    pub fn selection_area(&self) -> SelectionArea {
        SelectionArea::new(self.anchor.unwrap_or(self.cursor), self.cursor)
    }

    /// Cell being edited. The engine edits the cell where the gesture began.
    pub fn editing_position(&self) -> Option<Position> {
        matches!(self.mode, AppMode::Editing).then(|| self.selection_area().start)
    }

    fn emit_select(&mut self) {
        let area = self.selection_area();
        self.controller.on_select(area);
    }

    /// Moves the cursor by the given deltas, clamped to the grid.
    ///
    /// With `extend` the selection grows from the anchor; without it the
    /// selection collapses onto the new cursor.
    pub fn move_cursor(&mut self, d_row: isize, d_col: isize, extend: bool) {
        let max_row = self.controller.grid().row_count().saturating_sub(1);
        let max_col = self.controller.columns().len().saturating_sub(1);

        if extend {
            self.anchor.get_or_insert(self.cursor);
        } else {
            self.anchor = None;
        }

        self.cursor.i = self.cursor.i.saturating_add_signed(d_row).min(max_row);
        self.cursor.j = self.cursor.j.saturating_add_signed(d_col).min(max_col);
        self.ensure_cursor_visible();
        self.emit_select();
    }

    /// Collapses the selection onto the cursor.
    pub fn collapse_selection(&mut self) {
        self.anchor = None;
        self.emit_select();
    }

    /// Switches to editing mode for the selection start.
    ///
    /// With `initial`, the buffer starts from that character and replaces the
    /// cell's content; otherwise it is primed with the current value.
    pub fn start_editing(&mut self, initial: Option<char>) {
        let start = self.selection_area().start;
        self.input = match initial {
            Some(c) => c.to_string(),
            None => self
                .controller
                .grid()
                .cell(start.i, start.j)
                .map(|cell| cell.value.to_string())
                .unwrap_or_default(),
        };
        self.cursor_position = self.input.chars().count();
        self.mode = AppMode::Editing;
        self.status_message = None;
    }

    /// Commits the edit buffer.
    ///
    /// Reported as a single change at the edited cell. When a one-row range
    /// is active the controller spreads it across the range.
    pub fn finish_editing(&mut self) {
        if let Some(pos) = self.editing_position() {
            let change = CellChange::new(pos.i, pos.j, Value::text(self.input.as_str()));
            debug!(row = pos.i, col = pos.j, "committing edit");
            self.controller.apply_cell_changes(&[change], None);
        }

        self.mode = AppMode::Normal;
        self.input.clear();
        self.cursor_position = 0;
        self.move_cursor(1, 0, false);
    }

    /// Cancels editing and returns to normal mode without saving changes.
    pub fn cancel_editing(&mut self) {
        self.mode = AppMode::Normal;
        self.input.clear();
        self.cursor_position = 0;
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_offset(self.cursor_position);
        self.input.insert(at, c);
        self.cursor_position += 1;
    }

    pub fn delete_char_before_cursor(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            let at = self.byte_offset(self.cursor_position);
            self.input.remove(at);
        }
    }

    pub fn delete_char_at_cursor(&mut self) {
        if self.cursor_position < self.input.chars().count() {
            let at = self.byte_offset(self.cursor_position);
            self.input.remove(at);
        }
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.input
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }

    /// Empties every cell in the selection, one change per cell.
    pub fn clear_selected_cells(&mut self) {
        let (top_left, bottom_right) = self.selection_area().bounds();
        let changes: Vec<CellChange> = (top_left.i..=bottom_right.i)
            .flat_map(|row| (top_left.j..=bottom_right.j).map(move |col| CellChange::new(row, col, "")))
            .collect();

        // A lone change would otherwise be broadcast over the range.
        if let [only] = changes.as_slice() {
            let range = self.controller.range_selection();
            self.controller.set_range_selection(None);
            self.controller.apply_cell_changes(std::slice::from_ref(only), None);
            self.controller.set_range_selection(range);
        } else {
            self.controller.apply_cell_changes(&changes, None);
        }
    }

    /// Pastes tab-separated text at the top-left of the selection.
    ///
    /// Rows past the end of the grid are reported as additions, which makes
    /// the controller grow the grid. A lone value pasted into a one-row range
    /// fills the range, the same as typing it.
    pub fn paste_text(&mut self, text: &str) -> DomainResult<()> {
        let matrix = PasteParser::parse(text)?;
        let (anchor, _) = self.selection_area().bounds();
        let plan = PastePlan::build(self.controller.grid(), anchor, &matrix);

        if plan.is_empty() {
            self.status_message = Some("Nothing to paste".to_string());
            return Ok(());
        }

        let rows_before = self.controller.grid().row_count();
        self.controller.apply_cell_changes(&plan.changes, Some(&plan.additions));

        let added = self.controller.grid().row_count() - rows_before;
        info!(cells = plan.len(), added_rows = added, "pasted clipboard data");
        self.status_message = Some(if added > 0 {
            format!("Pasted {} cells, added {} rows", plan.len(), added)
        } else {
            format!("Pasted {} cells", plan.len())
        });
        Ok(())
    }

    /// Flips the checkbox on the cursor row.
    pub fn toggle_row_selected(&mut self) {
        let row = self.cursor.i;
        let checked = self.controller.is_row_selected(row);
        self.controller.set_row_selected(row, !checked);
    }

    /// Checks every row, or unchecks them all when they already are.
    pub fn toggle_all_selected(&mut self) {
        let checked = self.controller.all_selected();
        self.controller.set_all_selected(!checked);
    }

    pub fn toggle_checklist(&mut self) {
        self.show_checklist = !self.show_checklist;
    }

    pub fn update_viewport_rows(&mut self, rows: usize) {
        self.viewport_rows = rows.max(1);
        self.ensure_cursor_visible();
    }

    /// Adjusts the scroll position so the cursor row is on screen.
    pub fn ensure_cursor_visible(&mut self) {
        if self.cursor.i < self.scroll_row {
            self.scroll_row = self.cursor.i;
        } else if self.cursor.i >= self.scroll_row + self.viewport_rows {
            self.scroll_row = self.cursor.i + 1 - self.viewport_rows;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RangeSelection;

    fn value_at(app: &App, row: usize, col: usize) -> String {
        app.controller.grid().cell(row, col).unwrap().value.to_string()
    }

    #[test]
    fn test_app_default() {
        let app = App::default();
        assert_eq!(app.cursor, Position::new(0, 0));
        assert!(app.anchor.is_none());
        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.input.is_empty());
        assert!(app.status_message.is_none());
        assert!(!app.show_checklist);
        assert_eq!(app.controller.grid().row_count(), 14);
    }

    #[test]
    fn test_move_cursor_clamps() {
        let mut app = App::default();
        app.move_cursor(-1, -1, false);
        assert_eq!(app.cursor, Position::new(0, 0));

        app.move_cursor(100, 100, false);
        assert_eq!(app.cursor, Position::new(13, 3));
    }

    #[test]
    fn test_shift_extension_sets_range() {
        let mut app = App::default();
        app.move_cursor(2, 1, false);
        app.move_cursor(0, 1, true);
        app.move_cursor(0, 1, true);

        assert_eq!(app.anchor, Some(Position::new(2, 1)));
        assert_eq!(
            app.controller.range_selection(),
            Some(RangeSelection::new(1, 3))
        );
    }

    #[test]
    fn test_multi_row_extension_clears_range() {
        let mut app = App::default();
        app.move_cursor(1, 0, false);
        app.move_cursor(1, 0, true);
        assert_eq!(app.controller.range_selection(), None);
    }

    #[test]
    fn test_leftward_extension_clears_range() {
        let mut app = App::default();
        app.move_cursor(0, 3, false);
        app.move_cursor(0, -2, true);
        assert_eq!(app.controller.range_selection(), None);
    }

    #[test]
    fn test_plain_move_collapses_selection() {
        let mut app = App::default();
        app.move_cursor(0, 1, true);
        app.move_cursor(1, 0, false);
        assert!(app.anchor.is_none());
        assert_eq!(
            app.controller.range_selection(),
            Some(RangeSelection::new(1, 1))
        );
    }

    #[test]
    fn test_start_editing_primes_buffer() {
        let mut app = App::default();
        app.move_cursor(0, 3, false);
        app.start_editing(None);
        assert_eq!(app.mode, AppMode::Editing);
        assert_eq!(app.input, "4");
        assert_eq!(app.cursor_position, 1);
    }

    #[test]
    fn test_start_editing_with_typed_char() {
        let mut app = App::default();
        app.start_editing(Some('7'));
        assert_eq!(app.input, "7");
    }

    #[test]
    fn test_finish_editing_single_cell() {
        let mut app = App::default();
        app.move_cursor(1, 2, false);
        app.start_editing(Some('z'));
        app.finish_editing();

        assert_eq!(value_at(&app, 1, 2), "z");
        assert_eq!(value_at(&app, 1, 3), "4");
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.cursor, Position::new(2, 2));
    }

    #[test]
    fn test_finish_editing_fills_range() {
        let mut app = App::default();
        app.move_cursor(0, 1, false);
        app.move_cursor(0, 2, true);

        app.start_editing(Some('X'));
        assert_eq!(app.editing_position(), Some(Position::new(0, 1)));
        app.finish_editing();

        assert_eq!(value_at(&app, 0, 0), "1");
        assert_eq!(value_at(&app, 0, 1), "X");
        assert_eq!(value_at(&app, 0, 2), "X");
        assert_eq!(value_at(&app, 0, 3), "X");
        let attrs = &app.controller.grid().cell(0, 3).unwrap().attributes;
        assert_eq!(attrs.get("data-foo").map(String::as_str), Some("bar"));
    }

    #[test]
    fn test_cancel_editing() {
        let mut app = App::default();
        app.start_editing(Some('q'));
        app.cancel_editing();
        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.input.is_empty());
        assert_eq!(value_at(&app, 0, 0), "1");
    }

    #[test]
    fn test_edit_buffer_multibyte() {
        let mut app = App::default();
        app.start_editing(Some('é'));
        app.insert_char('ß');
        app.cursor_position = 1;
        app.delete_char_at_cursor();
        assert_eq!(app.input, "é");
        app.delete_char_before_cursor();
        assert!(app.input.is_empty());
        assert_eq!(app.cursor_position, 0);
    }

    #[test]
    fn test_clear_selected_cells() {
        let mut app = App::default();
        app.move_cursor(0, 1, false);
        app.move_cursor(1, 1, true);

        app.clear_selected_cells();

        assert_eq!(value_at(&app, 0, 0), "1");
        assert_eq!(value_at(&app, 0, 1), "");
        assert_eq!(value_at(&app, 0, 2), "");
        assert_eq!(value_at(&app, 1, 1), "");
        assert_eq!(value_at(&app, 1, 2), "");
        assert_eq!(value_at(&app, 1, 3), "4");
    }

    #[test]
    fn test_clear_single_cell_does_not_broadcast() {
        let mut app = App::default();
        app.move_cursor(0, 1, false);
        app.controller.set_range_selection(Some(RangeSelection::new(1, 3)));

        app.clear_selected_cells();

        assert_eq!(value_at(&app, 0, 1), "");
        assert_eq!(value_at(&app, 0, 2), "3");
        assert_eq!(app.controller.range_selection(), Some(RangeSelection::new(1, 3)));
    }

    #[test]
    fn test_paste_inside_grid() {
        let mut app = App::default();
        app.move_cursor(2, 1, false);

        app.paste_text("a\tb\nc\td").unwrap();

        assert_eq!(value_at(&app, 2, 1), "a");
        assert_eq!(value_at(&app, 2, 2), "b");
        assert_eq!(value_at(&app, 3, 1), "c");
        assert_eq!(value_at(&app, 3, 2), "d");
        assert_eq!(app.status_message.as_deref(), Some("Pasted 4 cells"));
    }

    #[test]
    fn test_paste_single_value_fills_range() {
        let mut app = App::default();
        app.move_cursor(0, 1, false);
        app.move_cursor(0, 1, true);

        app.paste_text("only").unwrap();

        assert_eq!(value_at(&app, 0, 0), "1");
        assert_eq!(value_at(&app, 0, 1), "only");
        assert_eq!(value_at(&app, 0, 2), "only");
        assert_eq!(value_at(&app, 0, 3), "4");
    }

    #[test]
    fn test_paste_keeps_blank_lines_in_place() {
        let mut app = App::default();

        app.paste_text("x\n\nz").unwrap();

        assert_eq!(value_at(&app, 0, 0), "x");
        assert_eq!(value_at(&app, 1, 0), "");
        assert_eq!(value_at(&app, 2, 0), "z");
        assert_eq!(value_at(&app, 3, 0), "1");
    }

    #[test]
    fn test_paste_extends_grid() {
        let mut app = App::default();
        app.move_cursor(13, 0, false);

        app.paste_text("x\ny\nz").unwrap();

        let grid = app.controller.grid();
        assert_eq!(grid.row_count(), 16);
        assert_eq!(value_at(&app, 13, 0), "x");
        assert_eq!(value_at(&app, 14, 0), "y");
        assert_eq!(value_at(&app, 15, 0), "z");
        assert_eq!(value_at(&app, 15, 3), "0");
        assert_eq!(app.status_message.as_deref(), Some("Pasted 3 cells, added 2 rows"));

        app.move_cursor(5, 0, false);
        assert_eq!(app.cursor.i, 15);
    }

    #[test]
    fn test_paste_empty_text() {
        let mut app = App::default();
        let revision = app.controller.revision();
        app.paste_text("").unwrap();
        assert_eq!(app.controller.revision(), revision);
        assert_eq!(app.status_message.as_deref(), Some("Nothing to paste"));
    }

    #[test]
    fn test_toggle_row_and_all() {
        let mut app = App::default();
        app.move_cursor(3, 0, false);
        app.toggle_row_selected();
        assert_eq!(app.controller.selected_rows(), vec![3]);

        app.toggle_all_selected();
        assert!(app.controller.all_selected());

        app.toggle_all_selected();
        assert!(app.controller.selected_rows().is_empty());
    }

    #[test]
    fn test_scrolling_follows_cursor() {
        let mut app = App::default();
        app.update_viewport_rows(5);
        app.move_cursor(7, 0, false);
        assert_eq!(app.scroll_row, 3);

        app.move_cursor(-6, 0, false);
        assert_eq!(app.scroll_row, 1);
    }
}

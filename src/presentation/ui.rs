use crate::application::{App, AppMode};
use crate::domain::Position;
use crate::presentation::renderers::{CellContext, GridRenderers, RowContext, SheetContext};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph, Table},
    Frame,
};

/// Rows taken by everything except the sheet body: title line, status bar,
/// table borders and the header row.
pub const CHROME_ROWS: u16 = 1 + 3 + 2 + 1;

pub fn render_ui(f: &mut Frame, app: &App, renderers: &dyn GridRenderers) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);

    if app.show_checklist {
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(20)])
            .split(chunks[1]);
        f.render_widget(render_sheet(app, renderers), body[0]);
        render_checklist(f, app, body[1]);
    } else {
        f.render_widget(render_sheet(app, renderers), chunks[1]);
    }

    render_status_bar(f, app, chunks[2]);

    if matches!(app.mode, AppMode::Help) {
        render_help_popup(f, app.help_scroll);
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let column = app
        .controller
        .columns()
        .get(app.cursor.j)
        .map(|c| c.label.as_str())
        .unwrap_or("");
    let header = Paragraph::new(format!(
        "gridhooks | Row {} / {} | Checked: {}",
        app.cursor.i + 1,
        column,
        app.controller.selected_rows().len()
    ))
    .style(Style::default().fg(Color::Cyan));
    f.render_widget(header, area);
}

/// Walks the visible rows and asks the hooks for every piece of the table.
pub fn render_sheet<'a>(app: &'a App, renderers: &dyn GridRenderers) -> Table<'a> {
    let controller = &app.controller;
    let columns = controller.columns();
    let area = app.selection_area();
    let editing_at = app.editing_position();
    let range = controller.range_selection();

    let last_row = (app.scroll_row + app.viewport_rows).min(controller.grid().row_count());
    let mut rows = Vec::new();

    for (row, cells) in controller.grid().rows()[app.scroll_row.min(last_row)..last_row]
        .iter()
        .enumerate()
        .map(|(offset, cells)| (app.scroll_row + offset, cells))
    {
        let rendered = cells
            .iter()
            .zip(columns)
            .enumerate()
            .map(|(col, (cell, column))| {
                let edit_buffer =
                    (editing_at == Some(Position::new(row, col))).then_some(app.input.as_str());
                renderers.cell(&CellContext {
                    row,
                    col,
                    cell,
                    column,
                    selected: area.contains(row, col),
                    has_cursor: app.cursor.i == row && app.cursor.j == col,
                    editing_at,
                    edit_buffer,
                    range,
                })
            })
            .collect();

        let ctx = RowContext {
            row,
            selected: controller.is_row_selected(row),
            has_cursor: app.cursor.i == row,
        };
        rows.push(renderers.row(&ctx, rendered));
    }

    renderers.sheet(
        &SheetContext {
            columns,
            all_selected: controller.all_selected(),
        },
        rows,
    )
}

fn render_checklist(f: &mut Frame, app: &App, area: Rect) {
    let selected = app.controller.selected_rows();
    let text = if selected.is_empty() {
        "(none)".to_string()
    } else {
        selected
            .iter()
            .map(|row| format!("Row {}", row + 1))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let panel = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Checked"))
        .style(Style::default().fg(Color::Yellow));
    f.render_widget(panel, area);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let input_text = match app.mode {
        AppMode::Normal => {
            if let Some(ref status) = app.status_message {
                status.clone()
            } else {
                let range = match app.controller.range_selection() {
                    Some(range) => format!("Range: {} cells", range.cells),
                    None => "Range: none".to_string(),
                };
                let attributes = app
                    .controller
                    .grid()
                    .cell(app.cursor.i, app.cursor.j)
                    .filter(|cell| !cell.attributes.is_empty())
                    .map(|cell| {
                        let pairs: Vec<String> =
                            cell.attributes.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
                        format!(" | {}", pairs.join(" "))
                    })
                    .unwrap_or_default();
                format!(
                    "{}{} | Enter: edit | Space: check row | a: check all | Ctrl+V: paste | F1/?: help | q: quit",
                    range, attributes
                )
            }
        }
        AppMode::Editing => format!("Editing: {} (Enter to save, Esc to cancel)", app.input),
        AppMode::Help => "↑↓/jk: scroll | PgUp/PgDn: fast scroll | Home: top | Esc/q: close help".to_string(),
    };

    let input = Paragraph::new(input_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(match app.mode {
            AppMode::Normal => Style::default(),
            AppMode::Editing => Style::default().fg(Color::Green),
            AppMode::Help => Style::default().fg(Color::Cyan),
        });
    f.render_widget(input, area);
}

fn render_help_popup(f: &mut Frame, scroll: usize) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    };

    f.render_widget(Clear, popup_area);

    let help_lines: Vec<&str> = HELP_TEXT.lines().collect();
    let visible_height = popup_area.height.saturating_sub(2) as usize;

    let start_line = scroll.min(help_lines.len().saturating_sub(visible_height));
    let end_line = (start_line + visible_height).min(help_lines.len());

    let visible_text = help_lines[start_line..end_line].join("\n");

    let help_widget = Paragraph::new(visible_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("gridhooks Help (Line {}/{})", start_line + 1, help_lines.len()))
                .style(Style::default().fg(Color::Cyan)),
        )
        .style(Style::default().fg(Color::White));

    f.render_widget(help_widget, popup_area);
}

const HELP_TEXT: &str = r#"GRIDHOOKS KEY REFERENCE

=== MOVING AROUND ===
Arrow keys      Move the cursor (hjkl also work)
Shift+Arrows    Extend the selection from where it started
Esc             Collapse the selection onto the cursor

=== EDITING ===
Enter/F2        Edit the cell where the selection starts
Any digit       Start editing with that digit
Enter           Save the edit and move down
Esc             Discard the edit
Delete/Bksp     Empty every selected cell

=== RANGE FILL ===
Select a run of cells within one row, then edit: the value you type
is written to every selected cell. Selections spanning several rows,
or made right-to-left, edit only the first cell.

=== PASTE ===
Ctrl+V          Paste tab-separated clipboard text at the top-left
                of the selection. Rows pasted past the bottom of the
                sheet are added to it. A single value pasted into a
                one-row selection fills every selected cell.

=== ROW CHECKBOXES ===
Space           Check/uncheck the cursor row
a               Check all rows, or uncheck them if all are checked
c               Show/hide the list of checked rows

=== OTHER ===
F1 or ?         Show this help (scroll with ↑↓, PgUp/PgDn, Home)
q               Quit"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::renderers::{DefaultRenderers, OverrideRenderers};
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

    fn lines(buffer: &Buffer) -> Vec<String> {
        let width = buffer.area.width as usize;
        buffer
            .content
            .chunks(width)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect()
    }

    fn draw(app: &App, renderers: &dyn GridRenderers) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| render_ui(f, app, renderers)).unwrap();
        lines(terminal.backend().buffer())
    }

    #[test]
    fn test_override_header_has_labels_and_checkbox() {
        let app = App::default();
        let screen = draw(&app, &OverrideRenderers);
        let header = screen.iter().find(|l| l.contains("2019") && l.contains("2020")).unwrap();
        assert!(header.contains("[ ]"));
        assert!(header.contains("2020"));
        assert!(header.contains("2022"));
    }

    #[test]
    fn test_override_header_reflects_all_selected() {
        let mut app = App::default();
        app.controller.set_all_selected(true);
        let screen = draw(&app, &OverrideRenderers);
        let header = screen.iter().find(|l| l.contains("2019") && l.contains("2020")).unwrap();
        assert!(header.contains("[x]"));
    }

    #[test]
    fn test_default_renderers_have_no_checkboxes() {
        let app = App::default();
        let screen = draw(&app, &DefaultRenderers);
        assert!(screen.iter().any(|l| l.contains("2019")));
        assert!(!screen.iter().any(|l| l.contains("[ ]")));
    }

    #[test]
    fn test_editing_range_hides_siblings() {
        let mut app = App::default();
        app.move_cursor(0, 1, false);
        app.move_cursor(0, 2, true);
        app.start_editing(Some('X'));

        let screen = draw(&app, &OverrideRenderers);
        let row = screen.iter().find(|l| l.contains('X') && l.contains("[ ]")).unwrap();
        assert!(row.contains('1'));
        assert!(!row.contains('3'));
        assert!(!row.contains('4'));
    }

    #[test]
    fn test_checklist_panel() {
        let mut app = App::default();
        app.controller.set_row_selected(4, true);
        app.toggle_checklist();

        let screen = draw(&app, &OverrideRenderers);
        assert!(screen.iter().any(|l| l.contains("Checked")));
        assert!(screen.iter().any(|l| l.contains("Row 5")));
    }

    #[test]
    fn test_status_shows_attributes() {
        let mut app = App::default();
        app.move_cursor(0, 3, false);
        let screen = draw(&app, &OverrideRenderers);
        assert!(screen.iter().any(|l| l.contains("data-foo=bar")));
    }
}

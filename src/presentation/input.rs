use crate::application::{App, AppMode};
use crate::infrastructure::ClipboardSource;
use crossterm::event::{KeyCode, KeyModifiers};
use tracing::warn;

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(
        app: &mut App,
        key: KeyCode,
        modifiers: KeyModifiers,
        clipboard: &mut dyn ClipboardSource,
    ) {
        match app.mode {
            AppMode::Normal => Self::handle_normal_mode(app, key, modifiers, clipboard),
            AppMode::Editing => Self::handle_editing_mode(app, key),
            AppMode::Help => Self::handle_help_mode(app, key),
        }
    }

    fn handle_normal_mode(
        app: &mut App,
        key: KeyCode,
        modifiers: KeyModifiers,
        clipboard: &mut dyn ClipboardSource,
    ) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            if let KeyCode::Char('v') = key {
                Self::paste(app, clipboard);
            }
            return;
        }

        app.status_message = None;
        let extend = modifiers.contains(KeyModifiers::SHIFT);

        match key {
            KeyCode::Up | KeyCode::Char('k') => app.move_cursor(-1, 0, extend),
            KeyCode::Down | KeyCode::Char('j') => app.move_cursor(1, 0, extend),
            KeyCode::Left | KeyCode::Char('h') => app.move_cursor(0, -1, extend),
            KeyCode::Right | KeyCode::Char('l') => app.move_cursor(0, 1, extend),
            KeyCode::Enter | KeyCode::F(2) => app.start_editing(None),
            KeyCode::Char(c) if c.is_ascii_digit() || c == '-' || c == '.' => {
                app.start_editing(Some(c))
            }
            KeyCode::Char(' ') => app.toggle_row_selected(),
            KeyCode::Char('a') => app.toggle_all_selected(),
            KeyCode::Char('c') => app.toggle_checklist(),
            KeyCode::Delete | KeyCode::Backspace => app.clear_selected_cells(),
            KeyCode::F(1) | KeyCode::Char('?') => {
                app.mode = AppMode::Help;
                app.help_scroll = 0;
            }
            KeyCode::Esc => app.collapse_selection(),
            KeyCode::Char('q') => {
                // Will be handled by main loop
            }
            _ => {}
        }
    }

    fn paste(app: &mut App, clipboard: &mut dyn ClipboardSource) {
        let result = clipboard.read_text().and_then(|text| app.paste_text(&text));
        if let Err(e) = result {
            warn!(error = %e, "paste failed");
            app.status_message = Some(format!("Paste failed: {}", e));
        }
    }

    fn handle_editing_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter => app.finish_editing(),
            KeyCode::Esc => app.cancel_editing(),
            KeyCode::Backspace => app.delete_char_before_cursor(),
            KeyCode::Delete => app.delete_char_at_cursor(),
            KeyCode::Left => {
                if app.cursor_position > 0 {
                    app.cursor_position -= 1;
                }
            }
            KeyCode::Right => {
                if app.cursor_position < app.input.chars().count() {
                    app.cursor_position += 1;
                }
            }
            KeyCode::Home => {
                app.cursor_position = 0;
            }
            KeyCode::End => {
                app.cursor_position = app.input.chars().count();
            }
            KeyCode::Char(c) => app.insert_char(c),
            _ => {}
        }
    }

    fn handle_help_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q') => {
                app.mode = AppMode::Normal;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if app.help_scroll > 0 {
                    app.help_scroll -= 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.help_scroll += 1;
            }
            KeyCode::PageUp => {
                app.help_scroll = app.help_scroll.saturating_sub(5);
            }
            KeyCode::PageDown => {
                app.help_scroll += 5;
            }
            KeyCode::Home => {
                app.help_scroll = 0;
            }
            _ => {}
        }
    }
}

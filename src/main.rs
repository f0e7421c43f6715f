//! gridhooks - Terminal grid with overridable renderers
//!
//! Runs an editable grid in the terminal. Rows can be checked for bulk
//! actions, a value typed into a one-row selection fills the whole run, and
//! pasting past the bottom of the sheet adds rows.

use std::io;
use std::path::PathBuf;

use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::info;

use gridhooks::application::{App, AppMode};
use gridhooks::infrastructure::{init_tracing, SheetConfig, SystemClipboard};
use gridhooks::presentation::{render_ui, GridRenderers, InputHandler, OverrideRenderers, CHROME_ROWS};

#[derive(Parser)]
#[command(name = "gridhooks")]
#[command(about = "Editable terminal grid with overridable sheet, row and cell renderers", long_about = None)]
struct Cli {
    /// JSON file with the columns and starting rows (built-in sample if omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for gridhooks.log
    #[arg(long, default_value_os_t = std::env::temp_dir())]
    log_dir: PathBuf,

    /// Log level when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Entry point for the gridhooks terminal application.
///
/// Loads the sheet, sets up the terminal interface and runs the main event
/// loop until the user quits.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded, logging cannot be set
/// up, or the terminal fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let _log_guard = init_tracing(&cli.log_dir, &cli.log_level)?;

    let config = match &cli.config {
        Some(path) => SheetConfig::load(path)?,
        None => SheetConfig::default(),
    };
    let mut app = App::new(config.into_controller()?);
    info!(rows = app.controller.grid().row_count(), "starting");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, &OverrideRenderers);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

/// Main application event loop.
///
/// Renders through `renderers` and feeds key presses to the input handler
/// until the user presses 'q' in normal mode.
fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    renderers: &dyn GridRenderers,
) -> io::Result<()> {
    let mut clipboard = SystemClipboard::default();

    loop {
        let size = terminal.size()?;
        app.update_viewport_rows(size.height.saturating_sub(CHROME_ROWS) as usize);
        terminal.draw(|f| render_ui(f, app, renderers))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                match key.code {
                    KeyCode::Char('q') if matches!(app.mode, AppMode::Normal) => return Ok(()),
                    _ => InputHandler::handle_key_event(app, key.code, key.modifiers, &mut clipboard),
                }
            }
        }
    }
}

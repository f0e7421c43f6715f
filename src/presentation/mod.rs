//! Presentation layer handling terminal UI and user input.
//!
//! This module manages the terminal user interface using ratatui: the
//! renderer hooks, the sheet driver that calls them, and keyboard input.

pub mod renderers;
pub mod ui;
pub mod input;

pub use renderers::*;
pub use ui::*;
pub use input::*;

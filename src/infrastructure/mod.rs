//! Infrastructure layer providing external service integrations.
//!
//! This module contains the pieces that talk to the outside world: seed
//! configuration files, the system clipboard, and the log sink.

pub mod clipboard;
pub mod config;
pub mod logging;

pub use clipboard::*;
pub use config::*;
pub use logging::*;

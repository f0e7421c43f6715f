//! Application layer managing state and grid workflows.
//!
//! This module holds the grid controller, which owns the sheet state, and
//! the engine state that turns user gestures into controller events.

pub mod controller;
pub mod state;

pub use controller::*;
pub use state::*;

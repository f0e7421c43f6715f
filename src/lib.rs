//! gridhooks - Terminal grid with overridable renderers
//!
//! An editable grid with row checkboxes, single-row range fill and
//! paste-to-extend, whose sheet, row and cell rendering is supplied through
//! replaceable renderer hooks.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;

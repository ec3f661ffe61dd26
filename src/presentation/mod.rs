//! Presentation layer handling terminal UI and user input.
//!
//! This module draws the management pages with ratatui and maps key
//! presses onto console actions.

pub mod ui;
pub mod input;

pub use ui::*;
pub use input::*;

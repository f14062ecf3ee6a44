//! UI / rendering layer: everything that touches Ratatui widgets.
//!
//! This layer takes the engine's per-card render parameters and turns them
//! into cells on the terminal.  It never mutates engine state.

pub mod detail;
pub mod layout;
pub mod stack_widget;
pub mod theme;

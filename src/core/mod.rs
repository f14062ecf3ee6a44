//! Core engine: note filtering, stack model, scroll tracking, per-card animation, frame
//! simulation and the preview state machine.
//!
//! Nothing in this module depends on any TUI or rendering crate.  The host
//! drives it through [`engine::StackEngine`] and a [`scroll::ScrollViewport`].

pub mod element;
pub mod engine;
pub mod filter;
pub mod note;
pub mod preview;
pub mod progress;
pub mod scroll;
pub mod simulator;
pub mod stack;

//! Application orchestration: state management, event loop, and input handling.

pub mod event;
pub mod feedback;
pub mod frame_runtime;
pub mod handler;
pub mod state;
pub mod viewport;

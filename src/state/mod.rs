//! State management module
//!
//! This module contains the countdown state machine and the shared
//! application state that drives it.

pub mod engine;
pub mod app_state;

// Re-export main types
pub use engine::{RunState, TickCommand, TimerEngine};
pub use app_state::{AppState, TimerSnapshot};

//! Countdown - A state-managed HTTP server for a minutes/seconds countdown
//! timer
//!
//! This library provides the countdown state machine, the shared state that
//! drives its one-second tick task, and the HTTP surface through which user
//! intents arrive and rendered output is read.

pub mod config;
pub mod state;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::{AppState, RunState, TimerEngine, TimerSnapshot};
pub use api::create_router;
pub use utils::shutdown_signal;

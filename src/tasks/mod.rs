//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod tick;

// Re-export main functions
pub(crate) use tick::spawn_tick_task;
pub use tick::TICK_PERIOD;

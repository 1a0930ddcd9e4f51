//! Tick source background task

use std::{sync::Arc, time::Duration};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::state::AppState;

/// Cadence of the countdown; one decrement per elapsed second
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Spawn the tick task driving the countdown.
///
/// Only [`AppState`]'s subscription entry point calls this; it owns the
/// returned handle and aborts it on every transition out of Running, which
/// keeps the task count at zero or one.
pub(crate) fn spawn_tick_task(state: Arc<AppState>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(TICK_PERIOD);

        // The first interval tick completes immediately; consume it so the
        // first decrement lands one full second after start.
        interval.tick().await;

        loop {
            interval.tick().await;
            if !state.handle_tick() {
                break;
            }
        }

        debug!("Tick task finished");
    })
}

//! Main application state management

use std::{
    sync::{Arc, Mutex, Weak},
    time::Instant,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::tasks::spawn_tick_task;
use super::engine::{RunState, TickCommand, TimerEngine};

/// Rendered view of the timer, published to watchers and returned to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub display: String,
    pub start_label: String,
    pub run_state: RunState,
    pub remaining_seconds: u64,
    pub configured_seconds: u64,
}

impl TimerSnapshot {
    fn of(engine: &TimerEngine) -> Self {
        Self {
            display: engine.format_display(),
            start_label: engine.start_label().to_string(),
            run_state: engine.run_state(),
            remaining_seconds: engine.remaining_seconds(),
            configured_seconds: engine.configured_seconds(),
        }
    }
}

/// Main application state: the timer engine, the tick subscription, and
/// server metadata
#[derive(Debug)]
pub struct AppState {
    /// The countdown state machine
    engine: Mutex<TimerEngine>,
    /// Handle of the active tick task; at most one may be alive
    tick_task: Mutex<Option<JoinHandle<()>>>,
    /// Channel broadcasting snapshot updates
    pub snapshot_tx: watch::Sender<TimerSnapshot>,
    /// Keep the receiver alive to prevent channel closure
    _snapshot_rx: watch::Receiver<TimerSnapshot>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    last_action: Mutex<Option<String>>,
    last_action_time: Mutex<Option<DateTime<Utc>>>,
    /// Self-reference handed to spawned tick tasks
    weak_self: Weak<AppState>,
}

impl AppState {
    /// Create a new AppState with a fresh, unconfigured timer
    pub fn new(port: u16, host: String) -> Arc<Self> {
        let (snapshot_tx, snapshot_rx) = watch::channel(TimerSnapshot::of(&TimerEngine::new()));

        Arc::new_cyclic(|weak_self| Self {
            engine: Mutex::new(TimerEngine::new()),
            tick_task: Mutex::new(None),
            snapshot_tx,
            _snapshot_rx: snapshot_rx,
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
            weak_self: weak_self.clone(),
        })
    }

    /// Apply an intent to the engine and carry out the scheduling effect it
    /// requests
    fn apply_intent<F>(&self, action: &str, apply: F) -> Result<TimerSnapshot, String>
    where
        F: FnOnce(&mut TimerEngine) -> TickCommand,
    {
        let (command, snapshot) = {
            let mut engine = self.engine.lock()
                .map_err(|e| format!("Failed to lock timer engine: {}", e))?;

            let command = apply(&mut engine);
            (command, TimerSnapshot::of(&engine))
        };

        match command {
            TickCommand::Subscribe => self.subscribe_tick(),
            TickCommand::Cancel => self.cancel_tick(),
            TickCommand::Keep => {}
        }

        info!("Applied intent '{}': {:?}, {} remaining",
              action, snapshot.run_state, snapshot.display);
        self.record_action(action);
        self.publish(snapshot.clone());

        Ok(snapshot)
    }

    /// Update the raw minutes input field
    pub fn set_minutes_input(&self, value: Option<i64>) -> Result<TimerSnapshot, String> {
        self.apply_intent("set-minutes", |engine| {
            engine.set_minutes(value);
            TickCommand::Keep
        })
    }

    /// Update the raw seconds input field
    pub fn set_seconds_input(&self, value: Option<i64>) -> Result<TimerSnapshot, String> {
        self.apply_intent("set-seconds", |engine| {
            engine.set_seconds(value);
            TickCommand::Keep
        })
    }

    /// Commit the input fields as the configured duration
    pub fn press_set(&self) -> Result<TimerSnapshot, String> {
        self.apply_intent("set", |engine| engine.set_duration())
    }

    /// Start or resume the countdown
    pub fn press_start(&self) -> Result<TimerSnapshot, String> {
        self.apply_intent("start", |engine| engine.start())
    }

    /// Pause a running countdown
    pub fn press_pause(&self) -> Result<TimerSnapshot, String> {
        self.apply_intent("pause", |engine| engine.pause())
    }

    /// Stop the countdown and recompute from the current input fields
    pub fn press_reset(&self) -> Result<TimerSnapshot, String> {
        self.apply_intent("reset", |engine| engine.reset())
    }

    /// Apply one elapsed second; called by the tick task.
    ///
    /// Returns false once the countdown has finished and the task should
    /// exit.
    pub fn handle_tick(&self) -> bool {
        let (command, snapshot) = match self.engine.lock() {
            Ok(mut engine) => {
                let command = engine.on_tick();
                (command, TimerSnapshot::of(&engine))
            }
            Err(e) => {
                warn!("Failed to lock timer engine on tick: {}", e);
                return false;
            }
        };

        debug!("Tick: {} remaining", snapshot.display);
        self.publish(snapshot);

        if command == TickCommand::Cancel {
            info!("Countdown reached zero");
            return false;
        }
        true
    }

    /// Single entry point for establishing the tick subscription.
    ///
    /// Any pre-existing task is aborted before the new one is spawned, so
    /// two tick streams can never run concurrently.
    fn subscribe_tick(&self) {
        let Some(state) = self.weak_self.upgrade() else {
            return;
        };
        match self.tick_task.lock() {
            Ok(mut slot) => {
                if let Some(previous) = slot.take() {
                    previous.abort();
                }
                *slot = Some(spawn_tick_task(state));
            }
            Err(e) => warn!("Failed to lock tick task handle: {}", e),
        }
    }

    /// Cancel the active tick subscription, if any
    fn cancel_tick(&self) {
        match self.tick_task.lock() {
            Ok(mut slot) => {
                if let Some(handle) = slot.take() {
                    handle.abort();
                    debug!("Tick subscription cancelled");
                }
            }
            Err(e) => warn!("Failed to lock tick task handle: {}", e),
        }
    }

    /// Whether a tick task is currently alive
    pub fn has_active_tick(&self) -> bool {
        self.tick_task.lock()
            .map(|slot| slot.as_ref().is_some_and(|handle| !handle.is_finished()))
            .unwrap_or(false)
    }

    /// Get the current rendered view of the timer
    pub fn snapshot(&self) -> Result<TimerSnapshot, String> {
        self.engine.lock()
            .map(|engine| TimerSnapshot::of(&engine))
            .map_err(|e| format!("Failed to lock timer engine: {}", e))
    }

    fn publish(&self, snapshot: TimerSnapshot) {
        if let Err(e) = self.snapshot_tx.send(snapshot) {
            warn!("Failed to send snapshot update: {}", e);
        }
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn state() -> Arc<AppState> {
        AppState::new(0, "127.0.0.1".to_string())
    }

    fn configure(state: &Arc<AppState>, minutes: i64, seconds: i64) {
        state.set_minutes_input(Some(minutes)).unwrap();
        state.set_seconds_input(Some(seconds)).unwrap();
        state.press_set().unwrap();
    }

    /// Yield so the tick task can run up to its next await point
    async fn let_tick_task_run() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    async fn advance_one_second() {
        tokio::time::advance(Duration::from_secs(1)).await;
        let_tick_task_run().await;
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_runs_to_zero_and_stops() {
        let state = state();
        configure(&state, 0, 5);

        let snapshot = state.press_start().unwrap();
        assert_eq!(snapshot.run_state, RunState::Running);
        assert!(state.has_active_tick());
        let_tick_task_run().await;

        for expected in (0..5).rev() {
            advance_one_second().await;
            assert_eq!(state.snapshot().unwrap().remaining_seconds, expected);
        }

        let snapshot = state.snapshot().unwrap();
        assert_eq!(snapshot.display, "00:00");
        assert_eq!(snapshot.run_state, RunState::Idle);

        // Clamped at zero: more elapsed time changes nothing
        advance_one_second().await;
        assert_eq!(state.snapshot().unwrap().remaining_seconds, 0);
        assert!(!state.has_active_tick());

        // Start with nothing remaining stays a no-op
        let snapshot = state.press_start().unwrap();
        assert_eq!(snapshot.run_state, RunState::Idle);
        assert!(!state.has_active_tick());
    }

    #[tokio::test(start_paused = true)]
    async fn start_without_configuration_is_a_no_op() {
        let state = state();
        let snapshot = state.press_start().unwrap();
        assert_eq!(snapshot.run_state, RunState::Idle);
        assert_eq!(snapshot.remaining_seconds, 0);
        assert!(!state.has_active_tick());
    }

    #[tokio::test(start_paused = true)]
    async fn pause_holds_the_remaining_value_and_resume_continues() {
        let state = state();
        configure(&state, 0, 10);

        state.press_start().unwrap();
        let_tick_task_run().await;
        for _ in 0..3 {
            advance_one_second().await;
        }
        assert_eq!(state.snapshot().unwrap().remaining_seconds, 7);

        let snapshot = state.press_pause().unwrap();
        assert_eq!(snapshot.run_state, RunState::Paused);
        assert_eq!(snapshot.start_label, "Resume");
        assert!(!state.has_active_tick());

        // Time passing while paused does not decrement
        advance_one_second().await;
        advance_one_second().await;
        assert_eq!(state.snapshot().unwrap().remaining_seconds, 7);

        // Resume continues from the paused value, not the configured one
        let snapshot = state.press_start().unwrap();
        assert_eq!(snapshot.run_state, RunState::Running);
        assert_eq!(snapshot.start_label, "Start");
        let_tick_task_run().await;
        advance_one_second().await;
        assert_eq!(state.snapshot().unwrap().remaining_seconds, 6);
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_start_keeps_a_single_tick_stream() {
        let state = state();
        configure(&state, 0, 10);

        // Redundant presses leave the live subscription alone; were
        // duplicates alive, one elapsed second would decrement more than once
        state.press_start().unwrap();
        state.press_start().unwrap();
        state.press_start().unwrap();
        let_tick_task_run().await;

        advance_one_second().await;
        assert_eq!(state.snapshot().unwrap().remaining_seconds, 9);
    }

    #[tokio::test(start_paused = true)]
    async fn redundant_start_does_not_reset_the_tick_phase() {
        let state = state();
        configure(&state, 0, 10);

        state.press_start().unwrap();
        let_tick_task_run().await;

        // Half a second into the first tick, press Start again; a replaced
        // subscription would push the next tick a full second out
        tokio::time::advance(Duration::from_millis(500)).await;
        let_tick_task_run().await;
        let snapshot = state.press_start().unwrap();
        assert_eq!(snapshot.run_state, RunState::Running);
        let_tick_task_run().await;

        tokio::time::advance(Duration::from_millis(500)).await;
        let_tick_task_run().await;
        assert_eq!(state.snapshot().unwrap().remaining_seconds, 9);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_picks_up_edited_inputs_and_cancels_ticking() {
        let state = state();
        configure(&state, 1, 0);

        state.press_start().unwrap();
        let_tick_task_run().await;
        advance_one_second().await;
        assert_eq!(state.snapshot().unwrap().remaining_seconds, 59);

        // Edit the inputs without pressing Set
        state.set_minutes_input(Some(0)).unwrap();
        state.set_seconds_input(Some(42)).unwrap();

        let snapshot = state.press_reset().unwrap();
        assert_eq!(snapshot.remaining_seconds, 42);
        assert_eq!(snapshot.run_state, RunState::Idle);
        assert!(!state.has_active_tick());

        advance_one_second().await;
        assert_eq!(state.snapshot().unwrap().remaining_seconds, 42);
    }

    #[tokio::test(start_paused = true)]
    async fn set_while_running_recommits_and_stops_ticking() {
        let state = state();
        configure(&state, 0, 30);

        state.press_start().unwrap();
        let_tick_task_run().await;
        advance_one_second().await;

        state.set_seconds_input(Some(15)).unwrap();
        let snapshot = state.press_set().unwrap();
        assert_eq!(snapshot.remaining_seconds, 15);
        assert_eq!(snapshot.run_state, RunState::Idle);
        assert!(!state.has_active_tick());
    }

    #[tokio::test(start_paused = true)]
    async fn zero_set_leaves_a_running_countdown_alone() {
        let state = state();
        configure(&state, 0, 30);
        state.press_start().unwrap();
        let_tick_task_run().await;

        state.set_minutes_input(None).unwrap();
        state.set_seconds_input(Some(0)).unwrap();

        let snapshot = state.press_set().unwrap();
        assert_eq!(snapshot.remaining_seconds, 30);
        assert_eq!(snapshot.run_state, RunState::Running);
        assert!(state.has_active_tick());

        advance_one_second().await;
        assert_eq!(state.snapshot().unwrap().remaining_seconds, 29);
    }
}

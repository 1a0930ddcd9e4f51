//! Countdown timer state machine

use serde::{Deserialize, Serialize};

/// Run mode of the timer, governing whether ticks are applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    Idle,
    Running,
    Paused,
}

/// Scheduling effect requested by a state transition.
///
/// Every transition reports what should happen to the tick subscription so
/// the caller can enforce the at-most-one-subscription invariant at a single
/// point instead of each transition managing the timer task itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickCommand {
    /// Establish the tick subscription (cancelling any existing one first)
    Subscribe,
    /// Cancel the active tick subscription, if any
    Cancel,
    /// Leave the subscription as it is
    Keep,
}

/// Countdown timer engine: configured duration, remaining time, run state,
/// and the raw minute/second input fields.
///
/// All transitions are pure with respect to scheduling: they mutate the
/// engine and return a [`TickCommand`] for the caller to apply.
#[derive(Debug, Clone)]
pub struct TimerEngine {
    configured_seconds: u64,
    remaining_seconds: u64,
    run_state: RunState,
    minutes_input: Option<i64>,
    seconds_input: Option<i64>,
}

impl TimerEngine {
    /// Create a new engine with zero duration and unset input fields
    pub fn new() -> Self {
        Self {
            configured_seconds: 0,
            remaining_seconds: 0,
            run_state: RunState::Idle,
            minutes_input: None,
            seconds_input: None,
        }
    }

    /// Update the raw minutes input field
    pub fn set_minutes(&mut self, value: Option<i64>) {
        self.minutes_input = value;
    }

    /// Update the raw seconds input field
    pub fn set_seconds(&mut self, value: Option<i64>) {
        self.seconds_input = value;
    }

    /// Total duration implied by the current raw input fields.
    ///
    /// Unset fields count as 0 and negative entries are clamped to 0, so the
    /// result is always a valid non-negative duration.
    pub fn input_total(&self) -> u64 {
        let minutes = self.minutes_input.unwrap_or(0).max(0) as u64;
        let seconds = self.seconds_input.unwrap_or(0).max(0) as u64;
        minutes.saturating_mul(60).saturating_add(seconds)
    }

    /// Commit the current input fields as the configured duration.
    ///
    /// A zero or fully empty input is silently ignored so it cannot wipe out
    /// a previously configured timer.
    pub fn set_duration(&mut self) -> TickCommand {
        let total = self.input_total();
        if total == 0 {
            return TickCommand::Keep;
        }
        self.configured_seconds = total;
        self.remaining_seconds = total;
        self.run_state = RunState::Idle;
        TickCommand::Cancel
    }

    /// Start or resume the countdown.
    ///
    /// Idle and Paused transition identically: the guard and the action do
    /// not depend on the prior state. With nothing remaining this is a
    /// no-op, and a redundant Start while already Running leaves the live
    /// subscription untouched so the tick phase is not reset.
    pub fn start(&mut self) -> TickCommand {
        if self.remaining_seconds == 0 || self.run_state == RunState::Running {
            return TickCommand::Keep;
        }
        self.run_state = RunState::Running;
        TickCommand::Subscribe
    }

    /// Pause the countdown; only effective while Running
    pub fn pause(&mut self) -> TickCommand {
        if self.run_state != RunState::Running {
            return TickCommand::Keep;
        }
        self.run_state = RunState::Paused;
        TickCommand::Cancel
    }

    /// Stop the countdown and recompute the remaining time from the raw
    /// input fields.
    ///
    /// Unlike [`set_duration`](Self::set_duration), the recomputed total is
    /// always applied, including zero. Inputs edited since the last Set are
    /// picked up here without an intervening Set.
    pub fn reset(&mut self) -> TickCommand {
        let total = self.input_total();
        self.configured_seconds = total;
        self.remaining_seconds = total;
        self.run_state = RunState::Idle;
        TickCommand::Cancel
    }

    /// Apply one elapsed second.
    ///
    /// Ticks arriving in any state other than Running are ignored; this
    /// covers a tick already in flight when a pause or reset lands. Hitting
    /// zero stops the countdown and returns the engine to Idle.
    pub fn on_tick(&mut self) -> TickCommand {
        if self.run_state != RunState::Running {
            return TickCommand::Keep;
        }
        if self.remaining_seconds <= 1 {
            self.remaining_seconds = 0;
            self.run_state = RunState::Idle;
            return TickCommand::Cancel;
        }
        self.remaining_seconds -= 1;
        TickCommand::Keep
    }

    /// Remaining time rendered as zero-padded `MM:SS`.
    ///
    /// The minutes field grows past two digits for durations over 99 minutes.
    pub fn format_display(&self) -> String {
        let minutes = self.remaining_seconds / 60;
        let seconds = self.remaining_seconds % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }

    /// Label for the start/resume control, derived from the run state on
    /// every render
    pub fn start_label(&self) -> &'static str {
        if self.run_state == RunState::Paused {
            "Resume"
        } else {
            "Start"
        }
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    pub fn configured_seconds(&self) -> u64 {
        self.configured_seconds
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new()
    }
}

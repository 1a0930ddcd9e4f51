//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::TimerSnapshot;

/// Response for intent endpoints, carrying the post-transition timer view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentResponse {
    pub action: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerSnapshot,
}

impl IntentResponse {
    /// Create a new intent response
    pub fn new(action: &str, timer: TimerSnapshot) -> Self {
        Self {
            action: action.to_string(),
            timestamp: Utc::now(),
            timer,
        }
    }
}

/// The two rendered outputs the presentation layer consumes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayResponse {
    /// Remaining time as zero-padded `MM:SS`
    pub display: String,
    /// Label for the start/resume control
    pub start_label: String,
}

impl DisplayResponse {
    pub fn from_snapshot(snapshot: TimerSnapshot) -> Self {
        Self {
            display: snapshot.display,
            start_label: snapshot.start_label,
        }
    }
}

/// Full status response with server metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerSnapshot,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

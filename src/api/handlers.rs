//! HTTP endpoint handlers
//!
//! Each intent endpoint maps directly onto one engine operation. Intents
//! that land in an inapplicable state (Set with a zero total, Start with
//! nothing remaining, Pause while not Running) are silent no-ops and still
//! answer 200 with the unchanged timer view; there are no error kinds.

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use tracing::error;

use crate::state::{AppState, TimerSnapshot};
use super::responses::{DisplayResponse, HealthResponse, IntentResponse, StatusResponse};

/// Request body for the minute/second input endpoints.
///
/// A missing or null value clears the field back to unset, which is distinct
/// from an explicit 0.
#[derive(Debug, Deserialize)]
pub struct InputPayload {
    #[serde(default)]
    pub value: Option<i64>,
}

fn intent_response(
    action: &str,
    result: Result<TimerSnapshot, String>,
) -> Result<Json<IntentResponse>, StatusCode> {
    match result {
        Ok(snapshot) => Ok(Json(IntentResponse::new(action, snapshot))),
        Err(e) => {
            error!("Failed to apply '{}' intent: {}", action, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /input/minutes - Update the raw minutes input field
pub async fn minutes_input_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<InputPayload>,
) -> Result<Json<IntentResponse>, StatusCode> {
    intent_response("set-minutes", state.set_minutes_input(payload.value))
}

/// Handle POST /input/seconds - Update the raw seconds input field
pub async fn seconds_input_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<InputPayload>,
) -> Result<Json<IntentResponse>, StatusCode> {
    intent_response("set-seconds", state.set_seconds_input(payload.value))
}

/// Handle POST /set - Commit the input fields as the configured duration
pub async fn set_handler(State(state): State<Arc<AppState>>) -> Result<Json<IntentResponse>, StatusCode> {
    intent_response("set", state.press_set())
}

/// Handle POST /start - Start or resume the countdown
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<IntentResponse>, StatusCode> {
    intent_response("start", state.press_start())
}

/// Handle POST /pause - Pause a running countdown
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<IntentResponse>, StatusCode> {
    intent_response("pause", state.press_pause())
}

/// Handle POST /reset - Stop and recompute from the current input fields
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<IntentResponse>, StatusCode> {
    intent_response("reset", state.press_reset())
}

/// Handle GET /display - The rendered outputs for the presentation layer
pub async fn display_handler(State(state): State<Arc<AppState>>) -> Result<Json<DisplayResponse>, StatusCode> {
    match state.snapshot() {
        Ok(snapshot) => Ok(Json(DisplayResponse::from_snapshot(snapshot))),
        Err(e) => {
            error!("Failed to read timer snapshot: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /status - Return the timer view plus server metadata
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let timer = match state.snapshot() {
        Ok(snapshot) => snapshot,
        Err(e) => {
            error!("Failed to read timer snapshot: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

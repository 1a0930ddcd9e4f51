//! Countdown - A state-managed HTTP server for a minutes/seconds countdown
//! timer
//!
//! This is the main entry point for the countdown application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use countdown::{
    config::Config,
    state::AppState,
    api::create_router,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("countdown={},tower_http=info", config.log_level()))
        .init();

    info!("Starting countdown server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}", config.host, config.port);

    // Create application state
    let state = AppState::new(config.port, config.host.clone());

    // Seed an initial duration from the command line, exactly as if the
    // user had typed it and pressed Set (a zero total is silently ignored)
    if config.has_initial_duration() {
        if let Err(e) = state
            .set_minutes_input(config.minutes)
            .and_then(|_| state.set_seconds_input(config.seconds))
            .and_then(|_| state.press_set())
        {
            tracing::error!("Failed to apply initial duration: {}", e);
            std::process::exit(1);
        }
        info!("Initial duration set: {}", state.snapshot().map(|s| s.display).unwrap_or_default());
    }

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /input/minutes - Update the minutes input field");
    info!("  POST /input/seconds - Update the seconds input field");
    info!("  POST /set           - Commit the input fields as the duration");
    info!("  POST /start         - Start or resume the countdown");
    info!("  POST /pause         - Pause the countdown");
    info!("  POST /reset         - Stop and recompute from the input fields");
    info!("  GET  /display       - Rendered MM:SS and start/resume label");
    info!("  GET  /status        - Timer view and server metadata");
    info!("  GET  /health        - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}

//! Configuration and CLI argument handling

use clap::Parser;

/// CLI argument parsing structure
#[derive(Parser)]
#[command(name = "countdown")]
#[command(about = "A state-managed HTTP server for a minutes/seconds countdown timer")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Pre-fill the minutes input field at startup
    #[arg(short, long)]
    pub minutes: Option<i64>,

    /// Pre-fill the seconds input field at startup
    #[arg(short, long)]
    pub seconds: Option<i64>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Whether an initial duration was supplied on the command line
    pub fn has_initial_duration(&self) -> bool {
        self.minutes.is_some() || self.seconds.is_some()
    }
}

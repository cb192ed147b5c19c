//! Command-line interface for voicebus
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use std::time::Duration;

/// Hands-free bus journeys driven by voice commands
#[derive(Parser, Debug)]
#[command(
    name = "voicebus",
    version,
    about = "Hands-free bus journeys driven by voice commands"
)]
pub struct Cli {
    /// Subcommand to execute (default: ride)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress diagnostics (announcements are still printed)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose diagnostics (-v: info, -vv: debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet period between spoken errors (e.g. 5s, 1500ms)
    #[arg(long, global = true, value_name = "DURATION", value_parser = parse_duration)]
    pub cooldown: Option<Duration>,

    /// Wait before listening again after a recognition error (e.g. 1s)
    #[arg(long, global = true, value_name = "DURATION", value_parser = parse_duration)]
    pub retry_delay: Option<Duration>,

    /// Journey history file (overrides config and VOICEBUS_HISTORY_PATH)
    #[arg(long, global = true, value_name = "PATH")]
    pub history: Option<PathBuf>,
}

/// Parse a duration string.
///
/// Bare numbers are milliseconds; anything else goes through `humantime`
/// (`5s`, `1500ms`, `1m30s`).
fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if let Ok(ms) = s.parse::<u64>() {
        return Ok(Duration::from_millis(ms));
    }
    humantime::parse_duration(s).map_err(|e| e.to_string())
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ride interactively: stdin lines are transcripts, /commands are buttons
    Ride,

    /// List destinations, their services, and routes
    Destinations,

    /// Read the journey history aloud (printed)
    Logs {
        /// Delete the history instead
        #[arg(long)]
        clear: bool,
    },

    /// View configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Configuration actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Print the configuration file path
    Path,
}

//! Error types for voicebus infrastructure.
//!
//! Rider-facing journey errors live in [`crate::journey::JourneyError`];
//! this enum covers the plumbing around them (config, persistence, time).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VoicebusError {
    // Configuration errors
    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Could not determine {kind} directory")]
    NoDirectory { kind: &'static str },

    // Journey history persistence errors
    #[error("Journey history store failed at {path}: {message}")]
    HistoryStore { path: String, message: String },

    #[error("Journey history is malformed: {0}")]
    HistoryFormat(#[from] serde_json::Error),

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, VoicebusError>;

//! voicebus - Hands-free bus journeys driven by voice commands
//!
//! A rider picks a destination, follows the ride stop by stop, gets off,
//! and reviews past journeys, all by speaking. Transcripts are classified
//! into intents, intents drive a journey state machine, and the machine's
//! effects are played back through speech, haptic and recognizer ports.

// Enforce error handling discipline
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod catalog;
#[cfg(feature = "cli")]
pub mod cli;
pub mod clock;
pub mod config;
pub mod defaults;
pub mod error;
pub mod haptics;
pub mod history;
pub mod interpreter;
pub mod journey;
pub mod output;
pub mod resolver;
pub mod session;
pub mod speech;
pub mod throttle;

// Composition root - needs everything
#[cfg(feature = "cli")]
pub mod app;

// Ports
pub use catalog::{StaticCatalog, TransitCatalog};
pub use clock::{Clock, ManualClock, SystemClock};
pub use haptics::{Haptics, NoopHaptics, RecordingHaptics};
pub use history::{FileLogStore, JourneyLog, LogStore, MemoryLogStore};
pub use speech::{Recognizer, RecordingRecognizer, RecordingSpeaker, Speaker};

// Core
pub use interpreter::{CommandInterpreter, Intent};
pub use journey::{Effect, JourneyError, JourneyStateMachine, MachineSettings, Phase};
pub use resolver::DestinationResolver;
pub use session::{Event, EventSender, Ports, Session, SessionSettings};
pub use throttle::ErrorThrottle;

// Error handling
pub use error::{Result, VoicebusError};

// Config
pub use config::Config;

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}

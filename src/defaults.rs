//! Default configuration constants for voicebus.
//!
//! Shared by `Config`, the state machine and the session loop so the same
//! numbers are used whether or not a config file is present.

/// Minimum spacing between two spoken error announcements, in milliseconds.
///
/// Every error kind shares this one window. Repeated failures inside it are
/// silent so announcements never pile up on top of each other.
pub const ERROR_COOLDOWN_MS: u64 = 5000;

/// Delay before listening is restarted after a `no-speech` or
/// `audio-capture` recognition error, in milliseconds.
pub const RETRY_DELAY_MS: u64 = 1000;

/// Recognition language handed to the speech input engine.
pub const LANGUAGE: &str = "en-US";

/// Haptic pulse used for confirmations: buzz, pause, buzz.
pub const VIBRATION_PATTERN: [u64; 3] = [200, 100, 200];

/// Name of the journey history file inside the data directory.
pub const HISTORY_FILE: &str = "journeys.json";

/// Application directory name under XDG config/data roots.
pub const APP_DIR: &str = "voicebus";

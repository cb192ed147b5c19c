use crate::defaults;
use crate::error::{Result, VoicebusError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub speech: SpeechConfig,
    pub feedback: FeedbackConfig,
    pub history: HistoryConfig,
}

/// Speech recognition configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpeechConfig {
    pub language: String,
    pub continuous: bool,
}

/// Spoken and haptic feedback configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FeedbackConfig {
    pub error_cooldown_ms: u64,
    pub retry_delay_ms: u64,
    pub haptics: bool,
    pub vibration_pattern: Vec<u64>,
}

/// Journey history persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct HistoryConfig {
    /// Where the journey log is persisted. `None` uses the XDG data dir.
    pub path: Option<PathBuf>,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            language: defaults::LANGUAGE.to_string(),
            continuous: true,
        }
    }
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            error_cooldown_ms: defaults::ERROR_COOLDOWN_MS,
            retry_delay_ms: defaults::RETRY_DELAY_MS,
            haptics: true,
            vibration_pattern: defaults::VIBRATION_PATTERN.to_vec(),
        }
    }
}

impl FeedbackConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Only a missing file falls back to defaults; invalid TOML is an error.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(e)
                if e.downcast_ref::<std::io::Error>()
                    .is_some_and(|io_err| io_err.kind() == std::io::ErrorKind::NotFound) =>
            {
                Ok(Self::default())
            }
            Err(e) => Err(e.context(format!("Failed to load config from {}", path.display()))),
        }
    }

    /// Reject values the session cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.speech.language.trim().is_empty() {
            return Err(VoicebusError::ConfigInvalidValue {
                key: "speech.language".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if self.feedback.vibration_pattern.len() > 32 {
            return Err(VoicebusError::ConfigInvalidValue {
                key: "feedback.vibration_pattern".to_string(),
                message: "at most 32 segments".to_string(),
            });
        }
        Ok(())
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - VOICEBUS_LANGUAGE → speech.language
    /// - VOICEBUS_HISTORY_PATH → history.path
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(language) = std::env::var("VOICEBUS_LANGUAGE")
            && !language.is_empty()
        {
            self.speech.language = language;
        }

        if let Ok(path) = std::env::var("VOICEBUS_HISTORY_PATH")
            && !path.is_empty()
        {
            self.history.path = Some(PathBuf::from(path));
        }

        self
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/voicebus/config.toml on Linux
    pub fn default_path() -> Result<PathBuf> {
        let dir = dirs::config_dir().ok_or(VoicebusError::NoDirectory { kind: "config" })?;
        Ok(dir.join(defaults::APP_DIR).join("config.toml"))
    }

    /// Resolve where the journey history lives.
    pub fn history_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.history.path {
            return Ok(path.clone());
        }
        let dir = dirs::data_dir().ok_or(VoicebusError::NoDirectory { kind: "data" })?;
        Ok(dir.join(defaults::APP_DIR).join(defaults::HISTORY_FILE))
    }
}

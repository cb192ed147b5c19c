//! Speech recognition port.
//!
//! The engine pushes cumulative transcripts and errors into the session;
//! the session only ever tells it to start, stop, or forget what it heard.

use crate::defaults;
use crate::error::Result;
use crate::journey::JourneyError;
use std::fmt;
use std::sync::{Arc, Mutex};

/// How recognition should run once started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenOptions {
    /// Keep listening across utterances instead of stopping after one.
    pub continuous: bool,
    /// BCP-47 tag, e.g. "en-US".
    pub language: String,
}

impl Default for ListenOptions {
    fn default() -> Self {
        Self {
            continuous: true,
            language: defaults::LANGUAGE.to_string(),
        }
    }
}

/// Recognition failure reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionErrorKind {
    /// Nothing was heard before the engine gave up.
    NoSpeech,
    /// The microphone could not be opened.
    AudioCapture,
    /// Anything else, carrying the engine's code.
    Other(String),
}

impl RecognitionErrorKind {
    /// Map an engine error code ("no-speech", "audio-capture", ...).
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "no-speech" => Self::NoSpeech,
            "audio-capture" => Self::AudioCapture,
            other => Self::Other(other.to_string()),
        }
    }

    /// The rider-facing error, for the kinds that are announced and retried.
    pub fn journey_error(&self) -> Option<JourneyError> {
        match self {
            Self::NoSpeech => Some(JourneyError::RecognitionNoSpeech),
            Self::AudioCapture => Some(JourneyError::RecognitionAudioCapture),
            Self::Other(_) => None,
        }
    }
}

impl fmt::Display for RecognitionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSpeech => f.write_str("no-speech"),
            Self::AudioCapture => f.write_str("audio-capture"),
            Self::Other(code) => f.write_str(code),
        }
    }
}

/// Control side of a speech recognition engine.
pub trait Recognizer: Send {
    /// Start (or keep) listening. Idempotent.
    fn start_listening(&self, options: &ListenOptions) -> Result<()>;

    /// Stop listening. Idempotent.
    fn stop_listening(&self) -> Result<()>;

    /// Forget the accumulated transcript.
    fn reset_transcript(&self) -> Result<()>;
}

impl<T: Recognizer + Sync> Recognizer for Arc<T> {
    fn start_listening(&self, options: &ListenOptions) -> Result<()> {
        (**self).start_listening(options)
    }

    fn stop_listening(&self) -> Result<()> {
        (**self).stop_listening()
    }

    fn reset_transcript(&self) -> Result<()> {
        (**self).reset_transcript()
    }
}

/// One control call received by a [`RecordingRecognizer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognizerCall {
    Start(ListenOptions),
    Stop,
    Reset,
}

/// Recognizer that records control calls and tracks whether it would be
/// listening. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct RecordingRecognizer {
    inner: Arc<Mutex<RecorderState>>,
}

#[derive(Debug, Default)]
struct RecorderState {
    calls: Vec<RecognizerCall>,
    listening: bool,
}

impl RecordingRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<RecognizerCall> {
        self.state().calls.clone()
    }

    pub fn is_listening(&self) -> bool {
        self.state().listening
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    fn state(&self) -> std::sync::MutexGuard<'_, RecorderState> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Recognizer for RecordingRecognizer {
    fn start_listening(&self, options: &ListenOptions) -> Result<()> {
        let mut state = self.state();
        state.calls.push(RecognizerCall::Start(options.clone()));
        state.listening = true;
        Ok(())
    }

    fn stop_listening(&self) -> Result<()> {
        let mut state = self.state();
        state.calls.push(RecognizerCall::Stop);
        state.listening = false;
        Ok(())
    }

    fn reset_transcript(&self) -> Result<()> {
        self.state().calls.push(RecognizerCall::Reset);
        Ok(())
    }
}

use crate::error::Result;
use std::sync::{Arc, Mutex};

/// Text-to-speech output.
///
/// Implementations cancel any utterance still in flight before starting
/// the new one, so the rider only ever hears the latest announcement.
pub trait Speaker: Send {
    fn speak(&self, text: &str) -> Result<()>;
}

impl<T: Speaker + Sync> Speaker for Arc<T> {
    fn speak(&self, text: &str) -> Result<()> {
        (**self).speak(text)
    }
}

/// Speaker that remembers every utterance.
///
/// Clones share the same record, so a test can hand one clone to the
/// session and read from the other.
#[derive(Debug, Clone, Default)]
pub struct RecordingSpeaker {
    spoken: Arc<Mutex<Vec<String>>>,
}

impl RecordingSpeaker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything spoken so far, oldest first.
    pub fn spoken(&self) -> Vec<String> {
        self.spoken
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// The utterance that would currently be audible.
    pub fn last(&self) -> Option<String> {
        self.spoken().last().cloned()
    }

    pub fn clear(&self) {
        self.spoken
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

impl Speaker for RecordingSpeaker {
    fn speak(&self, text: &str) -> Result<()> {
        self.spoken
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(text.to_string());
        Ok(())
    }
}

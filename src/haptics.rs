//! Haptic feedback port.

use crate::error::Result;
use std::sync::{Arc, Mutex};

/// Vibration motor. Best-effort: a device without one accepts and ignores.
pub trait Haptics: Send {
    /// Play an on/off pattern in milliseconds, starting with "on".
    fn vibrate(&self, pattern: &[u64]) -> Result<()>;
}

/// Device without a vibration motor.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHaptics;

impl Haptics for NoopHaptics {
    fn vibrate(&self, _pattern: &[u64]) -> Result<()> {
        Ok(())
    }
}

/// Records every pattern played. Clones share the record.
#[derive(Debug, Clone, Default)]
pub struct RecordingHaptics {
    patterns: Arc<Mutex<Vec<Vec<u64>>>>,
}

impl RecordingHaptics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn patterns(&self) -> Vec<Vec<u64>> {
        self.patterns
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn count(&self) -> usize {
        self.patterns().len()
    }
}

impl Haptics for RecordingHaptics {
    fn vibrate(&self, pattern: &[u64]) -> Result<()> {
        self.patterns
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(pattern.to_vec());
        Ok(())
    }
}

//! Global cooldown for spoken error announcements.

use crate::defaults;
use crate::journey::JourneyError;

/// One shared timer for every error kind.
///
/// An error is announced only if no error was announced during the last
/// `cooldown_ms`. Suppressed errors do not restart the window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorThrottle {
    cooldown_ms: u64,
    last_error_at_ms: Option<i64>,
}

impl Default for ErrorThrottle {
    fn default() -> Self {
        Self::new(defaults::ERROR_COOLDOWN_MS)
    }
}

impl ErrorThrottle {
    pub fn new(cooldown_ms: u64) -> Self {
        Self {
            cooldown_ms,
            last_error_at_ms: None,
        }
    }

    /// Whether an error of `kind` may be announced at `now_ms`.
    ///
    /// `kind` does not affect the answer; the window is shared.
    pub fn should_announce(&self, _kind: &JourneyError, now_ms: i64) -> bool {
        match self.last_error_at_ms {
            None => true,
            Some(last) => {
                let cooldown = i64::try_from(self.cooldown_ms).unwrap_or(i64::MAX);
                now_ms.saturating_sub(last) >= cooldown
            }
        }
    }

    /// Start a new cooldown window at `now_ms`.
    pub fn record(&mut self, now_ms: i64) {
        self.last_error_at_ms = Some(now_ms);
    }

    /// Check and record in one step. Returns whether to announce.
    pub fn admit(&mut self, kind: &JourneyError, now_ms: i64) -> bool {
        let announce = self.should_announce(kind, now_ms);
        if announce {
            self.record(now_ms);
        }
        announce
    }

    /// Forget the last error, so the next one is always announced.
    pub fn reset(&mut self) {
        self.last_error_at_ms = None;
    }

    pub fn last_error_at_ms(&self) -> Option<i64> {
        self.last_error_at_ms
    }

    pub fn cooldown_ms(&self) -> u64 {
        self.cooldown_ms
    }
}

//! Wall clock port.

use jiff::{SignedDuration, Zoned};
use std::sync::{Arc, Mutex};

pub trait Clock: Send + Sync {
    /// Current time in the rider's time zone.
    fn now(&self) -> Zoned;
}

/// The system clock in the system time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Zoned {
        Zoned::now()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Zoned>>,
}

impl ManualClock {
    pub fn new(start: Zoned) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Move forward by `ms` milliseconds. Saturates at the end of time.
    pub fn advance_ms(&self, ms: i64) {
        let mut now = self
            .now
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Ok(next) = now.checked_add(SignedDuration::from_millis(ms)) {
            *now = next;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Zoned {
        self.now
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

//! One persisted journey record.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Persisted record of one journey.
///
/// `stops_taken` grows while the journey is active; `got_off_at` is written
/// once by the event that ends it. After that the entry is frozen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub journey_id: Uuid,
    /// What the rider asked for, as given.
    pub destination_query: String,
    pub service_id: String,
    /// Route stop names at the time the journey started.
    pub full_route: Vec<String>,
    pub stops_taken: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub got_off_at: Option<String>,
    /// When the journey started.
    pub timestamp: Timestamp,
    /// Still accepting mutation. Never persisted: a reloaded log has no
    /// active journey.
    #[serde(skip)]
    open: bool,
}

impl LogEntry {
    /// Entry for a journey that has just started at `full_route[0]`.
    pub fn start(
        journey_id: Uuid,
        destination_query: impl Into<String>,
        service_id: impl Into<String>,
        full_route: Vec<String>,
        timestamp: Timestamp,
    ) -> Self {
        let stops_taken = full_route.first().cloned().into_iter().collect();
        Self {
            journey_id,
            destination_query: destination_query.into(),
            service_id: service_id.into(),
            full_route,
            stops_taken,
            got_off_at: None,
            timestamp,
            open: true,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub(crate) fn close(&mut self) {
        self.open = false;
    }
}

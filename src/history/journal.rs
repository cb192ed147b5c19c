//! In-memory journey log mirrored to a [`LogStore`](crate::history::LogStore).

use crate::error::Result;
use crate::history::entry::LogEntry;
use crate::history::store::LogStore;
use jiff::tz::TimeZone;
use uuid::Uuid;

/// Sentence spoken when there is nothing to read.
pub const EMPTY_LOG_TEXT: &str = "No logs available yet.";

/// Append-only journey history with live mutation of the active entry.
///
/// Every change is written through to the store. Writes are best-effort:
/// a failing store is logged and the in-memory log carries on.
pub struct JourneyLog {
    entries: Vec<LogEntry>,
    store: Box<dyn LogStore>,
}

impl std::fmt::Debug for JourneyLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JourneyLog")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

impl JourneyLog {
    /// Empty log that persists to `store`, ignoring anything stored there.
    pub fn new(store: Box<dyn LogStore>) -> Self {
        Self {
            entries: Vec::new(),
            store,
        }
    }

    /// Log restored from `store`. Fails on an unreadable or malformed copy.
    pub fn load(store: Box<dyn LogStore>) -> Result<Self> {
        let entries = match store.load()? {
            Some(blob) if !blob.trim().is_empty() => serde_json::from_str(&blob)?,
            _ => Vec::new(),
        };
        Ok(Self { entries, store })
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, journey_id: Uuid) -> Option<&LogEntry> {
        self.entries.iter().find(|e| e.journey_id == journey_id)
    }

    pub fn append(&mut self, entry: LogEntry) {
        tracing::debug!(journey = %entry.journey_id, "journey log append");
        self.entries.push(entry);
        self.persist();
    }

    /// Mutate the entry of a journey that is still active.
    ///
    /// Unknown or finalized ids are a silent no-op. Returns whether the
    /// mutator ran.
    pub fn update_active<F>(&mut self, journey_id: Uuid, mutator: F) -> bool
    where
        F: FnOnce(&mut LogEntry),
    {
        let Some(entry) = self.open_entry_mut(journey_id) else {
            return false;
        };
        mutator(entry);
        self.persist();
        true
    }

    /// Record where the rider got off and freeze the entry.
    pub fn finalize(&mut self, journey_id: Uuid, got_off_at: &str) -> bool {
        let Some(entry) = self.open_entry_mut(journey_id) else {
            return false;
        };
        entry.got_off_at = Some(got_off_at.to_string());
        entry.close();
        self.persist();
        true
    }

    /// Freeze an entry without a get-off stop (route exited or replaced).
    pub fn abandon(&mut self, journey_id: Uuid) -> bool {
        let Some(entry) = self.open_entry_mut(journey_id) else {
            return false;
        };
        entry.close();
        true
    }

    /// Drop every entry, in memory and in the store.
    pub fn clear(&mut self) {
        self.entries.clear();
        if let Err(e) = self.store.clear() {
            tracing::warn!("failed to clear stored journey log: {e}");
        }
    }

    /// One narration of the whole log, read in insertion order.
    pub fn read_aloud_text(&self, tz: &TimeZone) -> String {
        if self.entries.is_empty() {
            return EMPTY_LOG_TEXT.to_string();
        }
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entry)| narrate(index, entry, tz))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn open_entry_mut(&mut self, journey_id: Uuid) -> Option<&mut LogEntry> {
        self.entries
            .iter_mut()
            .find(|e| e.journey_id == journey_id && e.is_open())
    }

    fn persist(&self) {
        let blob = match serde_json::to_string_pretty(&self.entries) {
            Ok(blob) => blob,
            Err(e) => {
                tracing::warn!("failed to serialize journey log: {e}");
                return;
            }
        };
        if let Err(e) = self.store.save(&blob) {
            tracing::warn!("failed to persist journey log: {e}");
        }
    }
}

fn narrate(index: usize, entry: &LogEntry, tz: &TimeZone) -> String {
    let mut text = format!(
        "Journey {}. Selected destination: {}, Bus {}. ",
        index + 1,
        entry.destination_query,
        entry.service_id
    );
    if let Some(stop) = &entry.got_off_at {
        text.push_str(&format!("Got off at {stop}. "));
    }
    let when = entry.timestamp.to_zoned(tz.clone());
    text.push_str(&format!(
        "Timestamp: {}. ",
        when.strftime("%-d %B %Y, %H:%M")
    ));
    if !entry.stops_taken.is_empty() {
        text.push_str(&format!("Stops taken: {}. ", entry.stops_taken.join(", ")));
    }
    if !entry.full_route.is_empty() {
        text.push_str(&format!("Full route: {}.", entry.full_route.join(", ")));
    }
    text.trim_end().to_string()
}

//! Journey history: the append-only log of past and current journeys and
//! the store it is persisted to.

pub mod entry;
pub mod journal;
pub mod store;

pub use entry::LogEntry;
pub use journal::{EMPTY_LOG_TEXT, JourneyLog};
pub use store::{FileLogStore, LogStore, MemoryLogStore};

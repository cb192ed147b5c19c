//! Persistence port for the journey log.
//!
//! The store sees an opaque blob; serialization is the log's business.

use crate::error::{Result, VoicebusError};
use std::fs;
use std::io;
use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Where the serialized journey log is kept.
pub trait LogStore: Send {
    /// Replace the stored copy.
    fn save(&self, blob: &str) -> Result<()>;

    /// The stored copy, or `None` if nothing was saved yet.
    fn load(&self) -> Result<Option<String>>;

    /// Drop the stored copy.
    fn clear(&self) -> Result<()>;
}

/// Log persisted as a single JSON file.
#[derive(Debug, Clone)]
pub struct FileLogStore {
    path: PathBuf,
}

impl FileLogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Sibling file the next copy is written to before it replaces the log.
    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("journeys.json"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn store_error(&self, e: io::Error) -> VoicebusError {
        VoicebusError::HistoryStore {
            path: self.path.display().to_string(),
            message: e.to_string(),
        }
    }
}

impl LogStore for FileLogStore {
    fn save(&self, blob: &str) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| self.store_error(e))?;
        }
        // Readers see the old copy or the new one, never a torn write.
        let staging = self.staging_path();
        fs::write(&staging, blob).map_err(|e| self.store_error(e))?;
        fs::rename(&staging, &self.path).map_err(|e| {
            if let Err(cleanup) = fs::remove_file(&staging) {
                tracing::debug!(error = %cleanup, "could not remove staged journey log");
            }
            self.store_error(e)
        })
    }

    fn load(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.store_error(e)),
        }
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.store_error(e)),
        }
    }
}

/// In-memory store. Clones share the same slot, so a test can keep one
/// handle and inspect what the log wrote through the other.
#[derive(Debug, Clone, Default)]
pub struct MemoryLogStore {
    blob: Arc<Mutex<Option<String>>>,
    fail_writes: bool,
}

impl MemoryLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a blob.
    pub fn with_blob(blob: &str) -> Self {
        Self {
            blob: Arc::new(Mutex::new(Some(blob.to_string()))),
            fail_writes: false,
        }
    }

    /// Configure every write to fail.
    pub fn with_failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Current stored blob.
    pub fn snapshot(&self) -> Option<String> {
        self.blob.lock().ok().and_then(|slot| slot.clone())
    }

    fn slot(&self) -> Result<std::sync::MutexGuard<'_, Option<String>>> {
        self.blob
            .lock()
            .map_err(|_| VoicebusError::Other("memory log store poisoned".to_string()))
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes {
            return Err(VoicebusError::HistoryStore {
                path: "<memory>".to_string(),
                message: "writes disabled".to_string(),
            });
        }
        Ok(())
    }
}

impl LogStore for MemoryLogStore {
    fn save(&self, blob: &str) -> Result<()> {
        self.check_writable()?;
        *self.slot()? = Some(blob.to_string());
        Ok(())
    }

    fn load(&self) -> Result<Option<String>> {
        Ok(self.slot()?.clone())
    }

    fn clear(&self) -> Result<()> {
        self.check_writable()?;
        *self.slot()? = None;
        Ok(())
    }
}

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use fs_err as fs;
use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::wire::HistoryEntry;

pub const HISTORY_KEY: &str = "decisionDeskHistory";
pub const HISTORY_WINDOW_DAYS: i64 = 7;
pub const DEFAULT_CAPACITY: usize = 30;

/// Narrow string key-value persistence. Reads never fail: a missing or
/// unreadable store is simply empty.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// All keys live in one JSON object file, rewritten atomically on `set`.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_all(&self) -> Option<HashMap<String, String>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(s) => s,
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "store not readable");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(map) => Some(map),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "store is not valid JSON; ignoring it");
                None
            }
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.read_all()?.remove(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut all = self.read_all().unwrap_or_default();
        all.insert(key.to_string(), value.to_string());

        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir)
            .with_context(|| format!("creating temp file in {}", dir.display()))?;
        tmp.write_all(serde_json::to_string_pretty(&all)?.as_bytes())?;
        tmp.persist(&self.path)
            .with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }
}

/// Entries strictly newer than `now - 7 days`, order preserved.
pub fn within_window(entries: &[HistoryEntry], now: DateTime<Utc>) -> Vec<HistoryEntry> {
    let cutoff = now - Duration::days(HISTORY_WINDOW_DAYS);
    entries
        .iter()
        .filter(|e| e.timestamp > cutoff)
        .cloned()
        .collect()
}

/// Bounded newest-first record of prior submissions.
pub struct History<S> {
    store: S,
    capacity: usize,
}

impl<S: KeyValueStore> History<S> {
    /// `capacity` is clamped to `1..=DEFAULT_CAPACITY`.
    pub fn new(store: S, capacity: usize) -> Self {
        Self { store, capacity: capacity.clamp(1, DEFAULT_CAPACITY) }
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Everything stored, newest first. Corrupt data reads as empty.
    pub fn entries(&self) -> Vec<HistoryEntry> {
        let Some(raw) = self.store.get(HISTORY_KEY) else {
            return Vec::new();
        };
        match serde_json::from_str::<Vec<HistoryEntry>>(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "history is unparsable; treating it as empty");
                Vec::new()
            }
        }
    }

    /// The trailing window relative to `now`, newest first.
    pub fn recent(&self, now: DateTime<Utc>) -> Vec<HistoryEntry> {
        within_window(&self.entries(), now)
    }

    /// Prepends a submission and evicts the oldest beyond capacity.
    /// Blank text is never stored.
    pub fn append(&mut self, data: &str, now: DateTime<Utc>) -> Result<()> {
        if data.trim().is_empty() {
            return Ok(());
        }
        let mut entries = self.entries();
        entries.insert(0, HistoryEntry { timestamp: now, data: data.to_string() });
        entries.truncate(self.capacity);
        let raw = serde_json::to_string(&entries)?;
        self.store.set(HISTORY_KEY, &raw)
    }
}

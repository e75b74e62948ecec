//! Durable local key-value storage for store state that must survive
//! a restart: the selected child id and buffered milestone drafts.
//!
//! Stores receive a `KeyValueStorage` adapter at construction rather than
//! touching any ambient persistence mechanism. Writes are synchronous and
//! best-effort: a failed write is logged and never escalated.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::{debug, warn};

/// String-keyed, string-valued synchronous storage.
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// Storage file name inside the data directory
const STORAGE_FILE: &str = "storage.json";

/// One JSON map persisted to disk, rewritten on every mutation.
/// The data volume here is tiny (a selection id and a draft map), so
/// write-through keeps the on-disk copy trivially consistent.
pub struct FileStorage {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStorage {
    pub fn new(dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create storage directory {}", dir.display()))?;
        let path = dir.join(STORAGE_FILE);

        let entries = match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(map) => map,
                Err(err) => {
                    // Corrupt file: drop it in favor of an empty default
                    warn!(path = %path.display(), error = %err, "Discarding malformed storage file");
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Default storage location under the platform cache directory.
    pub fn default_dir() -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir().context("Could not find cache directory")?;
        Ok(cache_dir.join("tumbuh"))
    }

    fn persist(&self, entries: &HashMap<String, String>) {
        let contents = match serde_json::to_string_pretty(entries) {
            Ok(contents) => contents,
            Err(err) => {
                warn!(error = %err, "Failed to serialize storage map");
                return;
            }
        };
        if let Err(err) = std::fs::write(&self.path, contents) {
            warn!(path = %self.path.display(), error = %err, "Failed to write storage file");
        }
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries);
    }

    fn remove(&self, key: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if entries.remove(key).is_some() {
            self.persist(&entries);
        }
    }
}

/// In-memory storage, useful for tests and short-lived sessions.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
    }
}

/// No-op storage for execution contexts without durable persistence.
/// Reads always miss; writes are discarded.
pub struct NoopStorage;

impl KeyValueStorage for NoopStorage {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn set(&self, key: &str, _value: &str) {
        debug!(key, "NoopStorage dropping write");
    }

    fn remove(&self, _key: &str) {}
}

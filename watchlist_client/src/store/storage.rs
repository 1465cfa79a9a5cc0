//! Key-value persistence backends.
//!
//! `KeyValueStore` is the seam between the watchlist and wherever its blob lives:
//! - `FileStore`: one `<key>.json` file per key under a data directory.
//! - `MemoryStore`: a shared in-process map, used by tests and `--ephemeral` runs.
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use log::debug;
use watchlist_common::{Result, WatchlistError};

/// Minimal byte-blob store addressed by string keys.
pub trait KeyValueStore: Send {
    /// Reads the value stored under `key`, or `None` when nothing was written yet.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Overwrites the value stored under `key`.
    fn set(&mut self, key: &str, value: &[u8]) -> Result<()>;
}

/// File-backed store: each key maps to `<dir>/<key>.json`.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `dir`. The directory is created lazily on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the key files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(WatchlistError::Io(e)),
        }
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let target = self.path_for(key);
        // Write-then-rename so readers never observe a truncated blob.
        let tmp = self.dir.join(format!("{}.json.tmp", key));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &target)?;
        debug!("Stored {} bytes in {}", value.len(), target.display());
        Ok(())
    }
}

/// In-memory store. Clones share the same underlying map.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    fail_writes: Arc<AtomicBool>,
    writes: Arc<Mutex<usize>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `set` fail with a storage error.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of `set` calls attempted so far, including failed ones.
    pub fn write_count(&self) -> usize {
        self.writes.lock().map(|w| *w).unwrap_or(0)
    }

    /// Seeds `key` directly, bypassing the failure switch.
    pub fn insert(&self, key: &str, value: &[u8]) -> Result<()> {
        self.entries.lock()?.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.lock()?.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<()> {
        *self.writes.lock()? += 1;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(WatchlistError::Storage(format!("write to '{}' rejected", key)));
        }
        self.entries.lock()?.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

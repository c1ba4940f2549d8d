//! File-backed key-value store
//!
//! All keys live in one JSON object in the store directory:
//!
//! ```text
//! <store dir>/
//!   store.json          # {"tasks": "[...]", "theme": "dark", ...}
//!   store.json.lock     # flock target for writers
//!   .tasklist.toml      # optional configuration
//! ```
//!
//! Each mutation is a locked read-modify-write of `store.json` published with
//! an atomic rename, so concurrent readers never observe a partial document.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::error::{Error, Result};
use crate::kv::KeyValueStore;
use crate::lock::{self, FileLock, DEFAULT_LOCK_TIMEOUT_MS};

/// Name of the store document inside the store directory
pub const STORE_FILE: &str = "store.json";

/// Fallback store directory, relative to the working directory
pub const LOCAL_DIR: &str = ".tasklist";

/// Resolve the store directory: explicit path, else the platform data
/// directory, else `.tasklist` under the working directory
pub fn resolve_store_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    ProjectDirs::from("", "", "tasklist")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(LOCAL_DIR))
}

/// Key-value store persisted as a single JSON document
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    lock_timeout_ms: u64,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `dir`
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|err| {
            Error::Storage(format!("cannot create {}: {err}", dir.display()))
        })?;
        Ok(Self {
            dir,
            lock_timeout_ms: DEFAULT_LOCK_TIMEOUT_MS,
        })
    }

    pub fn with_lock_timeout(mut self, timeout_ms: u64) -> Self {
        self.lock_timeout_ms = timeout_ms;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path to the store document
    pub fn store_file(&self) -> PathBuf {
        self.dir.join(STORE_FILE)
    }

    /// Path to the writers' lock file
    pub fn lock_file(&self) -> PathBuf {
        lock::lock_path_for(&self.store_file())
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>> {
        let path = self.store_file();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => return Err(Error::Io(err)),
        };
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|err| {
            Error::Storage(format!("{} is not a valid store: {err}", path.display()))
        })
    }

    fn update<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut BTreeMap<String, String>) -> T,
    {
        let _lock = FileLock::acquire(self.lock_file(), self.lock_timeout_ms)?;

        let mut entries = self.read_entries()?;
        let result = f(&mut entries);

        let json = serde_json::to_string_pretty(&entries)?;
        lock::write_atomic(self.store_file(), json.as_bytes())?;
        tracing::debug!(
            path = %self.store_file().display(),
            keys = entries.len(),
            "store written"
        );

        Ok(result)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if !self.contains(key)? {
            return Ok(());
        }
        self.update(|entries| {
            entries.remove(key);
        })
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.read_entries()?.into_keys().collect())
    }
}

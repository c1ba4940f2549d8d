//! Generic key-value inspector over the task store.
//!
//! Lets a user save, read, and remove arbitrary keys next to the task data
//! and prints a summary of what the store holds. The reserved
//! [`TASKS_KEY`] is summarized by task count instead of raw value.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::kv::KeyValueStore;
use crate::task::TASKS_KEY;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Saved {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Lookup {
    Found { key: String, value: String },
    Missing { key: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Removal {
    Removed { key: String },
    Missing { key: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub key: String,
    pub value: String,
}

/// What the store currently holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageSummary {
    pub task_count: usize,
    /// Every key except the task key, in store order
    pub entries: Vec<Entry>,
}

pub struct Inspector<S> {
    store: S,
}

impl<S: KeyValueStore> Inspector<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn save(&mut self, key: &str, value: &str) -> Result<Saved> {
        let key = require_key(key)?;
        let value = value.trim();
        self.store.set(key, value)?;
        tracing::debug!(key, "inspector saved key");
        Ok(Saved {
            key: key.to_string(),
            value: value.to_string(),
        })
    }

    pub fn lookup(&self, key: &str) -> Result<Lookup> {
        let key = require_key(key)?.to_string();
        Ok(match self.store.get(&key)? {
            Some(value) => Lookup::Found { key, value },
            None => Lookup::Missing { key },
        })
    }

    pub fn remove(&mut self, key: &str) -> Result<Removal> {
        let key = require_key(key)?.to_string();
        if !self.store.contains(&key)? {
            return Ok(Removal::Missing { key });
        }
        self.store.remove(&key)?;
        tracing::debug!(key = %key, "inspector removed key");
        Ok(Removal::Removed { key })
    }

    pub fn summary(&self) -> Result<StorageSummary> {
        let task_count = match self.store.get(TASKS_KEY)? {
            // Records are counted, not validated.
            Some(raw) => serde_json::from_str::<Vec<serde_json::Value>>(&raw)
                .map(|records| records.len())
                .unwrap_or(0),
            None => 0,
        };

        let mut entries = Vec::new();
        for key in self.store.keys()? {
            if key == TASKS_KEY {
                continue;
            }
            // A key can vanish between enumeration and read; skip it.
            if let Some(value) = self.store.get(&key)? {
                entries.push(Entry { key, value });
            }
        }

        Ok(StorageSummary {
            task_count,
            entries,
        })
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}

fn require_key(key: &str) -> Result<&str> {
    let key = key.trim();
    if key.is_empty() {
        return Err(Error::Validation("Please enter a key".to_string()));
    }
    Ok(key)
}

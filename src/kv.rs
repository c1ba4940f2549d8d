//! Key-value storage contract.
//!
//! The task repository and the inspector both talk to storage through
//! [`KeyValueStore`]: string keys, string values, no transactions across
//! calls. [`MemoryStore`] keeps everything in process; the file-backed
//! implementation lives in [`crate::storage`].

use std::collections::BTreeMap;

use crate::error::Result;

/// Durable string-keyed storage
pub trait KeyValueStore {
    /// Value stored under `key`, or `None` when the key is absent
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<()>;

    /// Keys currently present, in store order
    fn keys(&self) -> Result<Vec<String>>;

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn keys(&self) -> Result<Vec<String>> {
        (**self).keys()
    }
}

/// In-process store; keys enumerate in sorted order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, String)> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_set_get_remove() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("theme").unwrap(), None);

        store.set("theme", "dark").unwrap();
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
        assert!(store.contains("theme").unwrap());

        store.set("theme", "light").unwrap();
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("light"));
        assert_eq!(store.len(), 1);

        store.remove("theme").unwrap();
        assert!(!store.contains("theme").unwrap());
        assert!(store.is_empty());

        // Removing again is a no-op
        store.remove("theme").unwrap();
    }

    #[test]
    fn memory_store_keys_are_sorted() {
        let store: MemoryStore = [("zeta", "1"), ("alpha", "2"), ("tasks", "[]")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        assert_eq!(store.keys().unwrap(), vec!["alpha", "tasks", "zeta"]);
    }

    #[test]
    fn mutable_reference_forwards_to_store() {
        let mut store = MemoryStore::new();
        {
            let mut borrowed = &mut store;
            borrowed.set("k", "v").unwrap();
            assert_eq!(borrowed.keys().unwrap(), vec!["k"]);
        }
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }
}

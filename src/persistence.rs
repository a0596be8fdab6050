use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Durable string key-value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create data directory: {}", self.dir.display()))?;
        let path = self.path_for(key);
        // a crash mid-write must not leave a torn list behind
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, value).with_context(|| format!("Failed to write {}", staging.display()))?;
        fs::rename(&staging, &path).with_context(|| format!("Failed to replace {}", path.display()))?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
        }
    }
}

#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: std::collections::HashMap<String, String>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }
}

#[cfg(test)]
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
}

/// Reads the list stored under `key`. A value that is not a JSON array
/// counts as missing and the key is evicted. Entries of the array that do not
/// fit `T` are skipped but stay on disk until the list is next written. Read
/// failures yield an empty list and leave the key alone.
pub fn load_or_reset<T: DeserializeOwned>(store: &mut dyn KeyValueStore, key: &str) -> Vec<T> {
    let stored = match store.get(key) {
        Ok(Some(stored)) => stored,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::warn!(key, error = %e, "could not read saved results");
            return Vec::new();
        }
    };

    let entries = match serde_json::from_str::<Vec<serde_json::Value>>(&stored) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(key, error = %e, "discarding unparsable saved results");
            if let Err(e) = store.remove(key) {
                tracing::warn!(key, error = %e, "could not evict saved results");
            }
            return Vec::new();
        }
    };

    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value(entry) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!(key, index, error = %e, "skipping unreadable saved result");
                None
            }
        })
        .collect()
}

pub fn persist_list<T: Serialize>(store: &mut dyn KeyValueStore, key: &str, items: &[T]) -> Result<()> {
    let json = serde_json::to_string(items)
        .with_context(|| format!("Failed to serialize saved results for {}", key))?;
    store.set(key, &json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Entry {
        id: u64,
        name: String,
    }

    #[test]
    fn test_load_missing_key_is_empty() {
        let mut store = MemoryStore::new();
        let items: Vec<Entry> = load_or_reset(&mut store, "savedThings");
        assert!(items.is_empty());
    }

    #[test]
    fn test_load_invalid_json_evicts_key() {
        let mut store = MemoryStore::new().with_entry("savedThings", "not json");

        let items: Vec<Entry> = load_or_reset(&mut store, "savedThings");

        assert!(items.is_empty());
        assert_eq!(store.get("savedThings").unwrap(), None);
    }

    #[test]
    fn test_load_non_array_evicts_key() {
        let mut store = MemoryStore::new().with_entry("savedThings", r#"{"id": 1}"#);

        let items: Vec<Entry> = load_or_reset(&mut store, "savedThings");

        assert!(items.is_empty());
        assert_eq!(store.get("savedThings").unwrap(), None);
    }

    #[test]
    fn test_load_skips_entries_that_do_not_fit() {
        let stored = r#"[{"id": 2, "name": "good"}, {"id": 1}, {"id": "three", "name": "c"}]"#;
        let mut store = MemoryStore::new().with_entry("savedThings", stored);

        let items: Vec<Entry> = load_or_reset(&mut store, "savedThings");

        assert_eq!(items, vec![Entry { id: 2, name: "good".to_string() }]);
        assert_eq!(store.get("savedThings").unwrap().as_deref(), Some(stored));
    }

    #[test]
    fn test_load_keeps_other_keys() {
        let mut store = MemoryStore::new()
            .with_entry("savedThings", "[oops")
            .with_entry("savedOther", "[]");

        let _: Vec<Entry> = load_or_reset(&mut store, "savedThings");

        assert_eq!(store.get("savedOther").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_persist_then_load() {
        let mut store = MemoryStore::new();
        let items = vec![
            Entry { id: 2, name: "b".to_string() },
            Entry { id: 1, name: "a".to_string() },
        ];

        persist_list(&mut store, "savedThings", &items).unwrap();
        let loaded: Vec<Entry> = load_or_reset(&mut store, "savedThings");

        assert_eq!(loaded, items);
    }

    #[test]
    fn test_file_store_set_get_remove() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("nested"));

        assert_eq!(store.get("savedThings").unwrap(), None);

        store.set("savedThings", "[1,2]").unwrap();
        assert_eq!(store.get("savedThings").unwrap().as_deref(), Some("[1,2]"));
        assert!(dir.path().join("nested").join("savedThings.json").exists());

        store.remove("savedThings").unwrap();
        assert_eq!(store.get("savedThings").unwrap(), None);

        // removing again is fine
        store.remove("savedThings").unwrap();
    }

    #[test]
    fn test_file_store_overwrite_leaves_no_staging_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path());

        store.set("savedThings", "[1]").unwrap();
        store.set("savedThings", "[2,1]").unwrap();

        assert_eq!(store.get("savedThings").unwrap().as_deref(), Some("[2,1]"));
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["savedThings.json".to_string()]);
    }

    #[test]
    fn test_file_store_corrupt_file_is_evicted() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("savedThings.json"), "not json").unwrap();
        let mut store = FileStore::new(dir.path());

        let items: Vec<Entry> = load_or_reset(&mut store, "savedThings");

        assert!(items.is_empty());
        assert!(!dir.path().join("savedThings.json").exists());
    }
}

//! File-backed key-value store.
//!
//! All keys live in one JSON object file. Every write re-reads the file under
//! an exclusive lock and rewrites it atomically, so several processes can
//! share it.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::{Map, Value};
use uni_core::{KeyValueStore, Result, UniError};

use super::atomic_file::write_atomically;
use super::file_lock::FileLock;

/// A [`KeyValueStore`] persisted as a single JSON object on disk.
///
/// Reads are served from the object cached by the last read or write. Writes
/// always start from the file's current contents. A file that cannot be parsed
/// is reported on reads; the next write replaces it.
pub struct JsonFileStore {
    path: PathBuf,
    cache: Mutex<Option<Map<String, Value>>>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }

        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&content)? {
            Value::Object(map) => Ok(map),
            _ => Err(UniError::Serialization {
                format: "JSON".to_string(),
                message: format!("{} does not contain a JSON object", self.path.display()),
            }),
        }
    }

    fn with_map<T>(&self, f: impl FnOnce(&mut Option<Map<String, Value>>) -> Result<T>) -> Result<T> {
        let mut guard = self
            .cache
            .lock()
            .map_err(|e| UniError::storage(format!("storage lock poisoned: {}", e)))?;
        f(&mut *guard)
    }

    fn write(&self, map: &Map<String, Value>) -> Result<()> {
        let contents = serde_json::to_vec_pretty(map)?;
        write_atomically(&self.path, &contents)?;
        Ok(())
    }

    /// Applies `update` to the stored object and writes it back.
    ///
    /// Keys written by other processes since the last read are preserved.
    fn update(&self, update: impl FnOnce(&mut Map<String, Value>)) -> Result<()> {
        self.with_map(|cache| {
            let _lock = FileLock::acquire(&self.path).map_err(|e| {
                UniError::storage(format!(
                    "Failed to lock {}: {}",
                    self.path.display(),
                    e
                ))
            })?;

            let mut map = self.read_file().unwrap_or_else(|e| {
                tracing::warn!(
                    "[JsonFileStore] Replacing unreadable storage file {}: {}",
                    self.path.display(),
                    e
                );
                Map::new()
            });
            update(&mut map);
            let result = self.write(&map);
            *cache = Some(map);
            result
        })
    }
}

impl KeyValueStore for JsonFileStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>> {
        self.with_map(|cache| {
            if cache.is_none() {
                *cache = Some(self.read_file()?);
            }
            Ok(cache
                .as_ref()
                .and_then(|map| map.get(key))
                .map(Value::to_string))
        })
    }

    fn set_raw(&self, key: &str, value: String) -> Result<()> {
        let value: Value = serde_json::from_str(&value)?;
        tracing::debug!("[JsonFileStore] set {}", key);
        self.update(|map| {
            map.insert(key.to_string(), value);
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.update(|map| {
            map.remove(key);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use uni_core::storage::{load_json, store_json};

    #[test]
    fn test_missing_file_reads_as_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path().join("storage.json"));
        assert_eq!(store.get_raw("selectedCities").unwrap(), None);
    }

    #[test]
    fn test_values_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("storage.json");

        let store = JsonFileStore::new(&path);
        store_json(&store, "selectedCities", &vec!["Berlin", "Paris"]).unwrap();
        store_json(&store, "showFavorites", &true).unwrap();

        let reopened = JsonFileStore::new(&path);
        let cities: Option<Vec<String>> = load_json(&reopened, "selectedCities").unwrap();
        let favorites: Option<bool> = load_json(&reopened, "showFavorites").unwrap();
        assert_eq!(cities, Some(vec!["Berlin".to_string(), "Paris".to_string()]));
        assert_eq!(favorites, Some(true));
    }

    #[test]
    fn test_remove_key() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path().join("storage.json"));
        store.set_raw("savedUnicorns", "[\"Acme\"]".to_string()).unwrap();
        store.remove("savedUnicorns").unwrap();
        store.remove("savedUnicorns").unwrap();
        assert_eq!(store.get_raw("savedUnicorns").unwrap(), None);
    }

    #[test]
    fn test_writes_keep_keys_from_other_stores() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("storage.json");
        let watcher = JsonFileStore::new(&path);
        let cli = JsonFileStore::new(&path);

        // The watcher caches the file before the other store writes.
        assert_eq!(watcher.get_raw("selectedCities").unwrap(), None);
        cli.set_raw("selectedCities", "[\"Berlin\"]".to_string()).unwrap();
        watcher.set_raw("savedUnicorns", "[\"Acme\"]".to_string()).unwrap();

        let reopened = JsonFileStore::new(&path);
        assert_eq!(
            reopened.get_raw("selectedCities").unwrap(),
            Some("[\"Berlin\"]".to_string())
        );
        assert_eq!(
            reopened.get_raw("savedUnicorns").unwrap(),
            Some("[\"Acme\"]".to_string())
        );
        // The writer's own cache picks up the other store's key too.
        assert_eq!(
            watcher.get_raw("selectedCities").unwrap(),
            Some("[\"Berlin\"]".to_string())
        );
    }

    #[test]
    fn test_concurrent_writers_lose_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("storage.json");

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let path = path.clone();
                std::thread::spawn(move || {
                    let store = JsonFileStore::new(path);
                    for j in 0..10 {
                        store.set_raw(&format!("key-{}-{}", i, j), "true".to_string()).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let reopened = JsonFileStore::new(&path);
        for i in 0..4 {
            for j in 0..10 {
                assert_eq!(
                    reopened.get_raw(&format!("key-{}-{}", i, j)).unwrap(),
                    Some("true".to_string())
                );
            }
        }
    }

    #[test]
    fn test_rejects_invalid_json_value() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path().join("storage.json"));
        let err = store.set_raw("showFavorites", "not json".to_string()).unwrap_err();
        assert!(err.is_serialization());
    }

    #[test]
    fn test_corrupt_file_is_reported_then_replaced() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("storage.json");
        std::fs::write(&path, "{ broken").unwrap();

        let store = JsonFileStore::new(&path);
        assert!(store.get_raw("showFavorites").unwrap_err().is_serialization());

        store.set_raw("showFavorites", "false".to_string()).unwrap();
        let reopened = JsonFileStore::new(&path);
        assert_eq!(reopened.get_raw("showFavorites").unwrap(), Some("false".to_string()));
    }
}

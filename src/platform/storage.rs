//! Key/value storage backends
//!
//! Settings and the player profile are stored as JSON strings under a fixed
//! key. Backends: in-memory (tests, ephemeral runs), one file per key in a
//! directory (native), and browser LocalStorage (wasm32).

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use thiserror::Error;

/// Result type alias using [`StorageError`].
pub type Result<T> = std::result::Result<T, StorageError>;

/// Failures at the storage boundary.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing medium failed.
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data could not be encoded or decoded.
    #[error("Malformed stored data: {0}")]
    Serde(#[from] serde_json::Error),

    /// The backend cannot be reached at all.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// String key/value store
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Decode the JSON value stored under `key`, if any
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
    match store.get(key)? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

/// Encode `value` as JSON under `key`
pub fn save_json<T: Serialize>(store: &mut dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    store.set(key, &json)
}

/// Volatile store
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
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

#[cfg(not(target_arch = "wasm32"))]
pub use native::FileStore;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use super::{KeyValueStore, Result};
    use std::fs;
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};

    /// One `<key>.json` file per key inside a directory
    #[derive(Debug, Clone)]
    pub struct FileStore {
        dir: PathBuf,
    }

    impl FileStore {
        /// The directory is created on first write
        pub fn new(dir: impl Into<PathBuf>) -> Self {
            Self { dir: dir.into() }
        }

        pub fn dir(&self) -> &Path {
            &self.dir
        }

        fn path_for(&self, key: &str) -> PathBuf {
            self.dir.join(format!("{key}.json"))
        }
    }

    impl KeyValueStore for FileStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            match fs::read_to_string(self.path_for(key)) {
                Ok(text) => Ok(Some(text)),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            }
        }

        fn set(&mut self, key: &str, value: &str) -> Result<()> {
            fs::create_dir_all(&self.dir)?;
            // Write then rename so a crash never leaves a half-written file
            let path = self.path_for(key);
            let tmp = path.with_extension("json.tmp");
            fs::write(&tmp, value)?;
            fs::rename(&tmp, &path)?;
            Ok(())
        }

        fn remove(&mut self, key: &str) -> Result<()> {
            match fs::remove_file(self.path_for(key)) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::LocalStore;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{KeyValueStore, Result, StorageError};

    /// Browser LocalStorage
    #[derive(Debug, Default, Clone, Copy)]
    pub struct LocalStore;

    impl LocalStore {
        fn storage() -> Result<web_sys::Storage> {
            web_sys::window()
                .and_then(|w| w.local_storage().ok())
                .flatten()
                .ok_or_else(|| StorageError::Unavailable("no LocalStorage".to_string()))
        }
    }

    impl KeyValueStore for LocalStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            Self::storage()?.get_item(key).map_err(|e| StorageError::Unavailable(format!("{e:?}")))
        }

        fn set(&mut self, key: &str, value: &str) -> Result<()> {
            Self::storage()?.set_item(key, value).map_err(|e| StorageError::Unavailable(format!("{e:?}")))
        }

        fn remove(&mut self, key: &str) -> Result<()> {
            Self::storage()?.remove_item(key).map_err(|e| StorageError::Unavailable(format!("{e:?}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        a: u32,
        b: String,
    }

    #[test]
    fn test_memory_json_roundtrip() {
        let mut store = MemoryStore::new();
        let value = Sample {
            a: 7,
            b: "x".to_string(),
        };
        save_json(&mut store, "k", &value).unwrap();
        let back: Option<Sample> = load_json(&store, "k").unwrap();
        assert_eq!(back, Some(value));
    }

    #[test]
    fn test_missing_key_is_none() {
        let store = MemoryStore::new();
        let back: Option<Sample> = load_json(&store, "missing").unwrap();
        assert!(back.is_none());
    }

    #[test]
    fn test_corrupt_data_is_serde_error() {
        let mut store = MemoryStore::new();
        store.set("k", "{not json").unwrap();
        let err = load_json::<Sample>(&store, "k").unwrap_err();
        assert!(matches!(err, StorageError::Serde(_)));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_file_store_roundtrip() {
        let dir = std::env::temp_dir().join(format!("neon-core-store-{}", std::process::id()));
        let mut store = FileStore::new(&dir);
        assert_eq!(store.get("profile").unwrap(), None);
        store.set("profile", "{\"a\":1}").unwrap();
        assert_eq!(store.get("profile").unwrap().as_deref(), Some("{\"a\":1}"));
        store.remove("profile").unwrap();
        assert_eq!(store.get("profile").unwrap(), None);
        let _ = std::fs::remove_dir_all(&dir);
    }
}

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// Error type for key-value storage access
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },
    #[error("could not encode slot {slot}: {source}")]
    EncodeError {
        slot: &'static str,
        source: serde_json::Error,
    },
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Durable string key-value storage.
///
/// Values are whole documents; a `set` replaces whatever was stored under the key.
pub trait KvStore {
    /// Read the value stored under `key`, or `None` if nothing is stored.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    /// Overwrite the value stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    /// Directory that holds this store's files, if it lives on disk.
    fn location(&self) -> Option<&Path> {
        None
    }
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Directory-backed store
// ---------------------------------------------------------------------------

/// One JSON file per key inside a data directory (`<dir>/<key>.json`).
#[derive(Debug, Clone)]
pub struct DirStore {
    dir: PathBuf,
}

impl DirStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| StorageError::WriteError {
            path: dir.clone(),
            source: e,
        })?;
        Ok(DirStore { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File that backs `key`
    pub fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KvStore for DirStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.slot_path(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::ReadError { path, source: e }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key);
        atomic_write(&path, value.as_bytes())
            .map_err(|e| StorageError::WriteError { path, source: e })
    }

    fn location(&self) -> Option<&Path> {
        Some(&self.dir)
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Non-durable store backed by a map. Can be told to fail writes.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with raw slot contents
    pub fn with_values<'a>(values: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let map = values
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        MemoryStore {
            values: RefCell::new(map),
            fail_writes: false,
        }
    }

    /// A store whose every `set` fails
    #[cfg(test)]
    pub fn read_only() -> Self {
        MemoryStore {
            values: RefCell::new(HashMap::new()),
            fail_writes: true,
        }
    }

    /// Raw value currently stored under `key`
    #[cfg(test)]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Unavailable(format!(
                "store is read-only, cannot write {}",
                key
            )));
        }
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl<S: KvStore + ?Sized> KvStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn location(&self) -> Option<&Path> {
        (**self).location()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn dir_store_missing_key_is_none() {
        let tmp = TempDir::new().unwrap();
        let store = DirStore::open(tmp.path()).unwrap();
        assert_eq!(store.get("tasks").unwrap(), None);
    }

    #[test]
    fn dir_store_set_then_get() {
        let tmp = TempDir::new().unwrap();
        let store = DirStore::open(tmp.path()).unwrap();
        store.set("completed", "[1,2]").unwrap();
        assert_eq!(store.get("completed").unwrap().as_deref(), Some("[1,2]"));
        assert!(tmp.path().join("completed.json").exists());
    }

    #[test]
    fn dir_store_set_overwrites() {
        let tmp = TempDir::new().unwrap();
        let store = DirStore::open(tmp.path()).unwrap();
        store.set("tasks", "[{\"a\":1}]").unwrap();
        store.set("tasks", "[]").unwrap();
        assert_eq!(store.get("tasks").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn dir_store_creates_nested_dir() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("a").join("b");
        let store = DirStore::open(&nested).unwrap();
        assert!(nested.is_dir());
        assert_eq!(store.location(), Some(nested.as_path()));
    }

    #[test]
    fn memory_store_read_only_rejects_writes() {
        let store = MemoryStore::read_only();
        assert!(store.set("tasks", "[]").is_err());
        assert_eq!(store.raw("tasks"), None);
    }

    #[test]
    fn memory_store_with_values() {
        let store = MemoryStore::with_values([("tasks", "[]")]);
        assert_eq!(store.get("tasks").unwrap().as_deref(), Some("[]"));
        assert_eq!(store.get("completed").unwrap(), None);
    }
}

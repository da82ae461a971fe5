use crate::shared::fs_atomic::atomic_write_file;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("store key `{0}` is not a valid file name")]
    InvalidKey(String),
    #[error("store is unavailable: {0}")]
    Unavailable(String),
}

/// Durable string values under fixed keys. Values are replaced wholesale.
pub trait KeyValueStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn write(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).write(key, value)
    }
}

/// One `<key>.json` file per key inside `dir`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn at_state_root(state_root: &Path) -> Self {
        Self::new(state_root.join("store"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn key_path(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.key_path(key)?;
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(source) if source.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io {
                path: path.display().to_string(),
                source,
            }),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.key_path(key)?;
        atomic_write_file(&path, value.as_bytes()).map_err(|source| StoreError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}

/// In-process store. Writes can be switched off to exercise failure paths.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    values: RefCell<BTreeMap<String, String>>,
    reject_writes: bool,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.borrow_mut().insert(key.into(), value.into());
        self
    }

    pub fn rejecting_writes(mut self) -> Self {
        self.reject_writes = true;
        self
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.value(key))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.reject_writes {
            return Err(StoreError::Unavailable(format!(
                "writes to `{key}` are disabled"
            )));
        }
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

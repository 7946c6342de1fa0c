//! Key-value save stores

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::PersistenceError;

/// A persistent key-value store of JSON values
pub trait SaveStore {
    /// Value stored under `key`, or `None` if absent
    fn read(&self, key: &str) -> Result<Option<Value>, PersistenceError>;

    fn write(&mut self, key: &str, value: &Value) -> Result<(), PersistenceError>;

    /// Values for `keys` in order; a missing or unreadable key yields its
    /// default
    fn load(&self, keys: &[&str], defaults: &[Value]) -> Vec<Value> {
        keys.iter()
            .zip(defaults)
            .map(|(key, default)| match self.read(key) {
                Ok(Some(value)) => value,
                Ok(None) => default.clone(),
                Err(e) => {
                    log::warn!("Failed to read save key `{}`: {}", key, e);
                    default.clone()
                }
            })
            .collect()
    }

    /// Write `values` under `keys`, pairwise
    fn save(&mut self, keys: &[&str], values: &[Value]) -> Result<(), PersistenceError> {
        for (key, value) in keys.iter().zip(values) {
            self.write(key, value)?;
        }
        Ok(())
    }
}

/// In-memory store (tests, sessions without a save directory)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SaveStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<Value>, PersistenceError> {
        Ok(self.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &Value) -> Result<(), PersistenceError> {
        self.values.insert(key.to_string(), value.clone());
        Ok(())
    }
}

/// One JSON file per key: `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct JsonDirStore {
    dir: PathBuf,
}

impl JsonDirStore {
    /// Open (creating if needed) a save directory
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl SaveStore for JsonDirStore {
    fn read(&self, key: &str) -> Result<Option<Value>, PersistenceError> {
        match fs::read_to_string(self.path(key)) {
            Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, key: &str, value: &Value) -> Result<(), PersistenceError> {
        let json = serde_json::to_string_pretty(value)?;
        // Write-then-rename so a crash never leaves a torn file
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        fs::write(&tmp, json)?;
        fs::rename(&tmp, self.path(key))?;
        Ok(())
    }
}

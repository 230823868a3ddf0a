use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::dirs::ensure_dir_exists;
use crate::filelock::{read_file_lock, remove_file_lock, write_file_lock};

/// Durable string key/value entries that outlive a single run.
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Keeps each entry in its own file under `dir`.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        ensure_dir_exists(&dir)
            .with_context(|| format!("ensure session directory: {}", dir.display()))?;
        Ok(Self { dir })
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.entry_path(key);
        let data = match read_file_lock(&path)
            .with_context(|| format!("read session entry: {}", path.display()))?
        {
            Some(data) => data,
            None => return Ok(None),
        };
        let value = String::from_utf8(data)
            .with_context(|| format!("decode session entry '{key}' into utf-8"))?;
        Ok(Some(value))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.entry_path(key);
        write_file_lock(&path, value.as_bytes())
            .with_context(|| format!("write session entry: {}", path.display()))
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.entry_path(key);
        remove_file_lock(&path).with_context(|| format!("remove session entry: {}", path.display()))
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
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

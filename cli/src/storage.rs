//! JSON file storage for the session between CLI invocations.
//!
//! The file holds a flat object of storage keys to strings. Every operation
//! re-reads the file. Each write goes to its own sibling temp file and is
//! renamed into place, so readers never see a partial file; between
//! concurrent invocations the last rename wins.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use session::{KeyValueStorage, StorageError};

#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(StorageError::Read(format!("{}: {e}", self.path.display()))),
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw).map_err(|e| StorageError::Read(format!("{}: {e}", self.path.display())))
    }

    fn save(&self, key: &str, items: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let write_err = |message: String| StorageError::Write { key: key.to_owned(), message };
        let rendered = serde_json::to_string_pretty(items).map_err(|e| write_err(e.to_string()))?;
        let tmp = self.temp_path();
        std::fs::write(&tmp, rendered).map_err(|e| write_err(format!("{}: {e}", tmp.display())))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| write_err(format!("{}: {e}", self.path.display())))
    }

    /// Unique sibling path for one write.
    fn temp_path(&self) -> PathBuf {
        let name = self.path.file_name().map_or_else(|| "session".into(), |n| n.to_string_lossy());
        self.path.with_file_name(format!(".{name}.{}.tmp", uuid::Uuid::new_v4().simple()))
    }

    fn update<F>(&self, key: &str, apply: F) -> Result<(), StorageError>
    where
        F: FnOnce(&mut BTreeMap<String, String>) -> bool,
    {
        let _held = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut items = self.load()?;
        if apply(&mut items) {
            self.save(key, &items)?;
        }
        Ok(())
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _held = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.load()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.update(key, |items| {
            items.insert(key.to_owned(), value.to_owned());
            true
        })
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.update(key, |items| items.remove(key).is_some())
    }
}

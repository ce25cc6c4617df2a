//! Key-value persistence for local preferences
//!
//! Provides the storage abstraction the credential store is built on. Writes
//! are expressed as batches that apply all-or-nothing, so several keys can be
//! updated together. Supports a durable JSON-file backend and an in-memory
//! backend for tests.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::StorageConfig;
use crate::errors::StorageError;

// ----------------------------------------------------------------------------
// Values and Batches
// ----------------------------------------------------------------------------

/// A single stored preference value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredValue {
    Bool(bool),
    Text(String),
}

impl StoredValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            StoredValue::Bool(value) => Some(*value),
            StoredValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            StoredValue::Text(value) => Some(value),
            StoredValue::Bool(_) => None,
        }
    }
}

impl From<bool> for StoredValue {
    fn from(value: bool) -> Self {
        StoredValue::Bool(value)
    }
}

impl From<String> for StoredValue {
    fn from(value: String) -> Self {
        StoredValue::Text(value)
    }
}

impl From<&str> for StoredValue {
    fn from(value: &str) -> Self {
        StoredValue::Text(value.to_string())
    }
}

/// One operation inside a [`WriteBatch`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    Put { key: String, value: StoredValue },
    Remove { key: String },
}

/// Ordered set of writes applied atomically by a [`KeyValueStore`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`
    pub fn put<K: Into<String>, V: Into<StoredValue>>(mut self, key: K, value: V) -> Self {
        self.ops.push(WriteOp::Put {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    /// Remove `key` if present
    pub fn remove<K: Into<String>>(mut self, key: K) -> Self {
        self.ops.push(WriteOp::Remove { key: key.into() });
        self
    }

    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Apply every operation to `data` in order
    fn apply_to(&self, data: &mut BTreeMap<String, StoredValue>) {
        for op in &self.ops {
            match op {
                WriteOp::Put { key, value } => {
                    data.insert(key.clone(), value.clone());
                }
                WriteOp::Remove { key } => {
                    data.remove(key);
                }
            }
        }
    }
}

// ----------------------------------------------------------------------------
// Storage Trait
// ----------------------------------------------------------------------------

/// Key-value storage abstraction for local preferences
pub trait KeyValueStore: Send + Sync {
    /// Apply all writes in `batch`, or none of them
    fn apply(&mut self, batch: WriteBatch) -> Result<(), StorageError>;

    /// Retrieve a value by key
    fn retrieve(&self, key: &str) -> Result<Option<StoredValue>, StorageError>;

    /// Copy of every stored key and value
    fn snapshot(&self) -> Result<BTreeMap<String, StoredValue>, StorageError>;

    /// Remove every stored key
    fn clear_all(&mut self) -> Result<(), StorageError>;

    /// Check if storage is available and accessible
    fn is_available(&self) -> bool;
}

// ----------------------------------------------------------------------------
// Memory Storage Implementation
// ----------------------------------------------------------------------------

/// Shared switch that makes a [`MemoryStorage`] fail every call while tripped
#[derive(Debug, Clone, Default)]
pub struct FaultSwitch {
    tripped: Arc<AtomicBool>,
}

impl FaultSwitch {
    pub fn trip(&self) {
        self.tripped.store(true, Ordering::SeqCst);
    }

    pub fn reset(&self) {
        self.tripped.store(false, Ordering::SeqCst);
    }

    pub fn is_tripped(&self) -> bool {
        self.tripped.load(Ordering::SeqCst)
    }
}

/// In-memory storage implementation for testing and fallback
#[derive(Debug, Default)]
pub struct MemoryStorage {
    data: BTreeMap<String, StoredValue>,
    faults: FaultSwitch,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage whose every call fails with [`StorageError::NotAvailable`]
    pub fn unavailable() -> Self {
        let storage = Self::new();
        storage.faults.trip();
        storage
    }

    /// Handle for injecting faults after the storage has been moved
    pub fn fault_switch(&self) -> FaultSwitch {
        self.faults.clone()
    }

    fn check(&self) -> Result<(), StorageError> {
        if self.faults.is_tripped() {
            return Err(StorageError::NotAvailable);
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStorage {
    fn apply(&mut self, batch: WriteBatch) -> Result<(), StorageError> {
        self.check()?;
        batch.apply_to(&mut self.data);
        Ok(())
    }

    fn retrieve(&self, key: &str) -> Result<Option<StoredValue>, StorageError> {
        self.check()?;
        Ok(self.data.get(key).cloned())
    }

    fn snapshot(&self) -> Result<BTreeMap<String, StoredValue>, StorageError> {
        self.check()?;
        Ok(self.data.clone())
    }

    fn clear_all(&mut self) -> Result<(), StorageError> {
        self.check()?;
        self.data.clear();
        Ok(())
    }

    fn is_available(&self) -> bool {
        !self.faults.is_tripped()
    }
}

// ----------------------------------------------------------------------------
// File Storage Implementation
// ----------------------------------------------------------------------------

/// Durable storage backed by a single JSON document
///
/// Every batch rewrites the document through a temp file and a rename, and the
/// cached map is only updated once the rename has succeeded.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    data: BTreeMap<String, StoredValue>,
}

impl FileStorage {
    /// Open the document at `path`; a missing file is an empty store
    ///
    /// A document that does not parse is renamed to `<name>.corrupt` and the
    /// store starts empty.
    pub fn open<P: Into<PathBuf>>(path: P) -> Result<Self, StorageError> {
        let path = path.into();
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            if contents.trim().is_empty() {
                BTreeMap::new()
            } else {
                match serde_json::from_str(&contents) {
                    Ok(data) => data,
                    Err(e) => {
                        let aside = corrupt_path(&path);
                        warn!(
                            "Unreadable preference file {} ({}), moving it to {}",
                            path.display(),
                            e,
                            aside.display()
                        );
                        fs::rename(&path, &aside)?;
                        BTreeMap::new()
                    }
                }
            }
        } else {
            BTreeMap::new()
        };

        debug!("Opened preference file {} ({} keys)", path.display(), data.len());
        Ok(Self { path, data })
    }

    /// Open `file_name` inside `dir`, creating the directory if needed
    pub fn open_in_dir<P: AsRef<Path>>(dir: P, file_name: &str) -> Result<Self, StorageError> {
        fs::create_dir_all(dir.as_ref())?;
        Self::open(dir.as_ref().join(file_name))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, data: &BTreeMap<String, StoredValue>) -> Result<(), StorageError> {
        let tmp_path = self.path.with_extension("json.tmp");
        let contents = serde_json::to_vec_pretty(data)?;
        fs::write(&tmp_path, contents)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStorage {
    fn apply(&mut self, batch: WriteBatch) -> Result<(), StorageError> {
        let mut next = self.data.clone();
        batch.apply_to(&mut next);
        self.persist(&next)?;
        self.data = next;
        Ok(())
    }

    fn retrieve(&self, key: &str) -> Result<Option<StoredValue>, StorageError> {
        Ok(self.data.get(key).cloned())
    }

    fn snapshot(&self) -> Result<BTreeMap<String, StoredValue>, StorageError> {
        Ok(self.data.clone())
    }

    fn clear_all(&mut self) -> Result<(), StorageError> {
        let empty = BTreeMap::new();
        self.persist(&empty)?;
        self.data = empty;
        Ok(())
    }

    fn is_available(&self) -> bool {
        self.path
            .parent()
            .map(|dir| dir.as_os_str().is_empty() || dir.is_dir())
            .unwrap_or(true)
    }
}

fn corrupt_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".corrupt");
    path.with_file_name(name)
}

// ----------------------------------------------------------------------------
// Factory Functions
// ----------------------------------------------------------------------------

/// Create the durable storage described by `config`
pub fn create_default_storage(config: &StorageConfig) -> Result<Box<dyn KeyValueStore>, StorageError> {
    let dir = config.resolve_data_dir()?;
    Ok(Box::new(FileStorage::open_in_dir(dir, &config.file_name)?))
}

/// Create a storage implementation for testing
pub fn create_test_storage() -> Box<dyn KeyValueStore> {
    Box::new(MemoryStorage::new())
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

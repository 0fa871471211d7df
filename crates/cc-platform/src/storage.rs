//! Storage APIs
//!
//! localStorage and sessionStorage implementations.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use crate::PlatformError;

/// String key-value store (`window.localStorage`)
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, PlatformError>;

    fn set_item(&self, key: &str, value: &str) -> Result<(), PlatformError>;

    fn remove_item(&self, key: &str) -> Result<(), PlatformError>;
}

/// Storage backend
#[derive(Debug, Default)]
pub struct Storage {
    data: RefCell<BTreeMap<String, String>>,
    path: Option<PathBuf>,
}

impl Storage {
    /// Create in-memory storage (sessionStorage)
    pub fn session() -> Self {
        Self::default()
    }

    /// Create persistent storage (localStorage) backed by a JSON file
    pub fn local(path: impl Into<PathBuf>) -> Result<Self, PlatformError> {
        let path = path.into();
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            if contents.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&contents)?
            }
        } else {
            BTreeMap::new()
        };
        tracing::debug!(path = %path.display(), items = data.len(), "local storage opened");

        Ok(Self {
            data: RefCell::new(data),
            path: Some(path),
        })
    }

    /// Clear all items
    pub fn clear(&self) -> Result<(), PlatformError> {
        self.data.borrow_mut().clear();
        self.persist()
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.data.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.borrow().is_empty()
    }

    /// Write to disk if persistent
    fn persist(&self) -> Result<(), PlatformError> {
        if let Some(path) = &self.path {
            let contents = serde_json::to_string_pretty(&*self.data.borrow())?;
            fs::write(path, contents)?;
        }
        Ok(())
    }
}

impl KeyValueStore for Storage {
    fn get_item(&self, key: &str) -> Result<Option<String>, PlatformError> {
        Ok(self.data.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), PlatformError> {
        self.data.borrow_mut().insert(key.to_string(), value.to_string());
        self.persist()
    }

    fn remove_item(&self, key: &str) -> Result<(), PlatformError> {
        self.data.borrow_mut().remove(key);
        self.persist()
    }
}

//! Registry of compiled book types.
//!
//! Book types are compiled on first use and then shared read-only. Loading
//! happens under the write lock with a second lookup, so concurrent callers
//! asking for the same key compile it once.

use super::book_type::{BookTypeConfig, CompiledBookType};
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

/// Cache of compiled book types keyed by book type name.
#[derive(Debug, Default)]
pub struct BookTypeRegistry {
    /// Directory holding `<book-type>.json` files, if loading from disk
    config_dir: Option<PathBuf>,
    entries: RwLock<HashMap<String, Arc<CompiledBookType>>>,
}

impl BookTypeRegistry {
    /// Registry with no backing directory; book types must be registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry that loads `<dir>/<book-type>.json` on first use.
    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: Some(dir.into()),
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Backing directory, if any.
    pub fn config_dir(&self) -> Option<&Path> {
        self.config_dir.as_deref()
    }

    /// Compile and register a book type.
    ///
    /// Entries are frozen once registered: if `key` is already present the
    /// existing entry is returned and `config` is discarded.
    pub fn register(&self, key: &str, config: BookTypeConfig) -> Result<Arc<CompiledBookType>> {
        if let Some(existing) = self.cached(key) {
            log::debug!("Book type '{}' already registered", key);
            return Ok(existing);
        }
        let compiled = Arc::new(config.compile(key)?);
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(entries.entry(key.to_string()).or_insert(compiled)))
    }

    /// Get a book type, loading it from the backing directory on first use.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownBookType`] when the key is neither registered nor
    /// found on disk; configuration errors from [`BookTypeConfig::compile`].
    pub fn get(&self, key: &str) -> Result<Arc<CompiledBookType>> {
        if let Some(entry) = self.cached(key) {
            return Ok(entry);
        }

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = entries.get(key) {
            return Ok(Arc::clone(entry));
        }

        let path = self
            .path_for(key)
            .ok_or_else(|| Error::UnknownBookType(key.to_string()))?;
        if !path.is_file() {
            return Err(Error::UnknownBookType(key.to_string()));
        }

        log::info!("Loading book type '{}' from {}", key, path.display());
        let compiled = Arc::new(BookTypeConfig::from_file(&path)?.compile(key)?);
        entries.insert(key.to_string(), Arc::clone(&compiled));
        Ok(compiled)
    }

    /// Whether a book type is already loaded.
    pub fn contains(&self, key: &str) -> bool {
        self.cached(key).is_some()
    }

    /// Number of loaded book types.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether nothing is loaded yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn cached(&self, key: &str) -> Option<Arc<CompiledBookType>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Config file path for a key. Keys containing path separators or
    /// parent references are rejected.
    fn path_for(&self, key: &str) -> Option<PathBuf> {
        let dir = self.config_dir.as_ref()?;
        let safe = !key.is_empty()
            && !key.contains(['/', '\\'])
            && key != "."
            && key != "..";
        safe.then(|| dir.join(format!("{}.json", key)))
    }
}

//! Memoization of parsed config files across resolutions.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::SystemTime;

use crate::fs::FileSystem;
use crate::ini::ConfigFile;
use crate::ReadError;

#[derive(Debug)]
struct CacheEntry {
    modified: SystemTime,
    file: Arc<ConfigFile>,
}

/// Parsed config files keyed by path, validated by modification time.
///
/// The lock is held only around map lookups and inserts, never while a file
/// is read or parsed. Files whose filesystem reports no modification time
/// are always reloaded.
#[derive(Debug, Default)]
pub struct ConfigCache {
    entries: Mutex<HashMap<PathBuf, CacheEntry>>,
}

impl ConfigCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached parse of `path`, loading it if missing or stale.
    pub fn load<F: FileSystem + ?Sized>(
        &self,
        fs: &F,
        path: &Path,
    ) -> Result<Arc<ConfigFile>, ReadError> {
        let Some(modified) = fs.modified(path) else {
            return ConfigFile::load(fs, path).map(Arc::new);
        };

        if let Some(entry) = self.lock().get(path) {
            if entry.modified == modified {
                return Ok(Arc::clone(&entry.file));
            }
        }

        let file = Arc::new(ConfigFile::load(fs, path)?);
        self.lock().insert(
            path.to_path_buf(),
            CacheEntry {
                modified,
                file: Arc::clone(&file),
            },
        );
        Ok(file)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, CacheEntry>> {
        // entries are inserted whole, so a poisoned map is still consistent
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

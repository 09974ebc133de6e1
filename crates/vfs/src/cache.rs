//! Path to blob ID memoization for a single mount.

use std::collections::HashMap;

use parking_lot::Mutex;

/// Maps mount-relative paths to the blob IDs they resolved to.
///
/// Append-only for the lifetime of the mount: entries are never evicted or
/// re-validated, so a blob renamed or moved on the server after being cached
/// keeps resolving at its old path. Mounts assume the namespace under their
/// root is stable while mounted.
///
/// Thread-safe via a single internal mutex.
#[derive(Debug, Default)]
pub struct PathCache {
    entries: Mutex<HashMap<String, String>>,
}

impl PathCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the blob ID cached for a path.
    ///
    /// # Arguments
    /// * `path` - Normalized mount-relative path
    pub fn get(&self, path: &str) -> Option<String> {
        self.entries.lock().get(path).cloned()
    }

    /// Record the blob ID for a path. Re-setting a path overwrites it.
    ///
    /// # Arguments
    /// * `path` - Normalized mount-relative path
    /// * `blob_id` - Blob the path resolved to
    pub fn set(&self, path: impl Into<String>, blob_id: impl Into<String>) {
        self.entries.lock().insert(path.into(), blob_id.into());
    }

    /// Number of cached paths.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

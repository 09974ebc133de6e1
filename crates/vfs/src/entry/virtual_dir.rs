//! Synthetic directories with no backing blob.

use std::time::SystemTime;

use super::UNKNOWN_ITEM_COUNT;

/// A directory level that exists only in the mounted view, such as a union
/// mount's child names or a facet grouping ("Tags", a tag value, an attribute
/// key or value).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualDirEntry {
    name: String,
    full_path: String,
}

impl VirtualDirEntry {
    /// Create a new virtual directory.
    ///
    /// # Arguments
    /// * `name` - Directory name
    /// * `full_path` - Full path in the mounted tree
    pub fn new(name: impl Into<String>, full_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            full_path: full_path.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &str {
        &self.full_path
    }

    /// Always empty: there is no blob behind a virtual directory.
    pub fn id(&self) -> &str {
        ""
    }

    pub fn size(&self) -> i64 {
        0
    }

    pub fn items(&self) -> i64 {
        UNKNOWN_ITEM_COUNT
    }

    pub fn mod_time(&self) -> SystemTime {
        SystemTime::UNIX_EPOCH
    }
}

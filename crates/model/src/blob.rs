//! Blob metadata as stored alongside each remote object.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Kind of remote object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlobType {
    /// Regular file with content.
    File,
    /// Directory-like container; holds no content of its own.
    Directory,
}

/// Metadata attached to a remote blob.
///
/// Parents are blob IDs. A blob may have several parents, which is how the
/// same object shows up under more than one path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobMeta {
    /// Entry name (last path segment when materialized).
    pub name: String,
    /// File or directory.
    pub blob_type: BlobType,
    /// Content size in bytes.
    #[serde(default)]
    pub size: u64,
    /// Free-form tags.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Key/value attributes.
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    /// Parent blob IDs.
    #[serde(default)]
    pub parents: BTreeSet<String>,
}

impl BlobMeta {
    /// Create metadata with no tags, attributes or parents.
    ///
    /// # Arguments
    /// * `name` - Entry name
    /// * `blob_type` - File or directory
    /// * `size` - Content size in bytes
    pub fn new(name: impl Into<String>, blob_type: BlobType, size: u64) -> Self {
        Self {
            name: name.into(),
            blob_type,
            size,
            tags: BTreeSet::new(),
            metadata: BTreeMap::new(),
            parents: BTreeSet::new(),
        }
    }

    /// Metadata for a file of the given size.
    pub fn file(name: impl Into<String>, size: u64) -> Self {
        Self::new(name, BlobType::File, size)
    }

    /// Metadata for a directory.
    pub fn directory(name: impl Into<String>) -> Self {
        Self::new(name, BlobType::Directory, 0)
    }

    /// Add a tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Add a parent blob ID.
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parents.insert(parent_id.into());
        self
    }

    /// Add a key/value attribute.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn is_file(&self) -> bool {
        self.blob_type == BlobType::File
    }

    pub fn is_directory(&self) -> bool {
        self.blob_type == BlobType::Directory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let meta: BlobMeta = BlobMeta::file("a.txt", 12)
            .with_tag("photos")
            .with_tag("photos")
            .with_parent("D1")
            .with_metadata("year", "2023");

        assert!(meta.is_file());
        assert_eq!(meta.size, 12);
        assert_eq!(meta.tags.len(), 1);
        assert!(meta.parents.contains("D1"));
        assert_eq!(meta.metadata.get("year").map(String::as_str), Some("2023"));
    }

    #[test]
    fn test_deserialize_defaults() {
        let meta: BlobMeta =
            serde_json::from_str(r#"{"name": "docs", "blob_type": "Directory"}"#).unwrap();

        assert!(meta.is_directory());
        assert_eq!(meta.size, 0);
        assert!(meta.tags.is_empty());
        assert!(meta.parents.is_empty());
    }
}

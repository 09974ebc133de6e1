//! Fields shared by every entry backed by a remote blob.

use std::time::SystemTime;

use blobmount_model::BlobMeta;

/// A remote blob materialized at some path of the mounted tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobEntry {
    /// Blob ID; empty only for entries not yet persisted.
    id: String,
    /// Blob metadata as last read from the store.
    meta: BlobMeta,
    /// Path under which this instance was materialized. A view artifact, not
    /// part of the blob's identity: the same blob can appear at several paths.
    path: String,
}

impl BlobEntry {
    /// Create a new blob entry.
    ///
    /// # Arguments
    /// * `id` - Blob ID
    /// * `meta` - Blob metadata
    /// * `path` - Full path in the mounted tree
    pub fn new(id: impl Into<String>, meta: BlobMeta, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            meta,
            path: path.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn meta(&self) -> &BlobMeta {
        &self.meta
    }

    pub(crate) fn meta_mut(&mut self) -> &mut BlobMeta {
        &mut self.meta
    }

    pub fn name(&self) -> &str {
        &self.meta.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether the blob exists on the server.
    pub fn is_persisted(&self) -> bool {
        !self.id.is_empty()
    }

    /// Size as the signed type filesystem interfaces expect.
    ///
    /// Sizes above `i64::MAX` cannot be represented and saturate at
    /// `i64::MAX` instead of wrapping negative.
    pub fn size(&self) -> i64 {
        i64::try_from(self.meta.size).unwrap_or(i64::MAX)
    }

    /// Modification time. The store does not track one, so this is always the
    /// Unix epoch.
    pub fn mod_time(&self) -> SystemTime {
        SystemTime::UNIX_EPOCH
    }
}

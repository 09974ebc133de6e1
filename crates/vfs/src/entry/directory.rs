//! Directory entries.

use std::ops::Deref;

use blobmount_model::{BlobMeta, Query, QueryResponse};
use blobmount_storage::BlobStore;

use super::blob::BlobEntry;
use super::UNKNOWN_ITEM_COUNT;
use crate::VfsError;

/// A blob of type `Directory` materialized at a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    blob: BlobEntry,
}

impl DirectoryEntry {
    /// Create a new directory entry.
    ///
    /// # Arguments
    /// * `id` - Blob ID
    /// * `meta` - Blob metadata
    /// * `path` - Full path in the mounted tree
    pub fn new(id: impl Into<String>, meta: BlobMeta, path: impl Into<String>) -> Self {
        Self {
            blob: BlobEntry::new(id, meta, path),
        }
    }

    pub fn into_blob(self) -> BlobEntry {
        self.blob
    }

    /// Child count hint for listings; never computed eagerly.
    pub fn items(&self) -> i64 {
        UNKNOWN_ITEM_COUNT
    }

    /// Count the directory's children on the server.
    ///
    /// Issues a single size-0 query, which returns the total without any hits.
    pub async fn child_count(&self, store: &dyn BlobStore) -> Result<u64, VfsError> {
        let query: Query = Query::children_of(self.id())
            .with_size(0)
            .with_sign_urls(false);
        let response: QueryResponse = store.query(&query).await?;
        Ok(response.total as u64)
    }
}

impl Deref for DirectoryEntry {
    type Target = BlobEntry;

    fn deref(&self) -> &BlobEntry {
        &self.blob
    }
}

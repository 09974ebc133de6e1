//! File entries.

use std::ops::Deref;

use blobmount_model::BlobMeta;
use blobmount_storage::BlobStore;

use super::blob::BlobEntry;
use crate::VfsError;

/// Byte range requested when opening a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ByteRange {
    /// First byte offset.
    pub start: u64,
    /// Last byte offset (inclusive). None reads to the end of the file.
    pub end: Option<u64>,
}

impl ByteRange {
    /// The whole file.
    pub fn full() -> Self {
        Self::default()
    }

    /// Everything from `start` to the end of the file.
    pub fn from_offset(start: u64) -> Self {
        Self { start, end: None }
    }

    /// Inclusive range `[start, end]`.
    pub fn inclusive(start: u64, end: u64) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }
}

/// A blob of type `File` materialized at a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    blob: BlobEntry,
}

impl FileEntry {
    /// Create a new file entry.
    ///
    /// # Arguments
    /// * `id` - Blob ID (empty for files not yet uploaded)
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

    /// Read a byte range of the file's content.
    ///
    /// An end at or past the last byte, or no end at all, reads to the end of
    /// the file. An end of 0 reads only the first byte. Reads starting past the end return no bytes.
    ///
    /// # Arguments
    /// * `store` - Blob store holding the content
    /// * `range` - Requested byte range
    pub async fn open(&self, store: &dyn BlobStore, range: ByteRange) -> Result<Vec<u8>, VfsError> {
        let size: u64 = self.blob.meta().size;
        if size == 0 || range.start >= size {
            return Ok(Vec::new());
        }

        let last: u64 = size - 1;
        let end: u64 = match range.end {
            Some(end) if end < last => end,
            _ => last,
        };
        if end < range.start {
            return Ok(Vec::new());
        }

        Ok(store.read_range(self.id(), range.start, end).await?)
    }

    /// Replace the file's content, refreshing its size.
    ///
    /// # Arguments
    /// * `store` - Blob store holding the content
    /// * `content` - New content
    pub async fn update(&mut self, store: &dyn BlobStore, content: &[u8]) -> Result<(), VfsError> {
        if !self.is_persisted() {
            return Err(VfsError::not_found(self.path()));
        }

        self.blob.meta_mut().size = content.len() as u64;
        store
            .update_blob(self.blob.id(), content, self.blob.meta())
            .await?;
        tracing::info!("updated {} ({} bytes)", self.path(), content.len());
        Ok(())
    }

    /// Write into the middle of the file.
    ///
    /// The store only accepts whole-content uploads, so this always fails.
    pub fn write_at(&self, _offset: u64, _data: &[u8]) -> Result<(), VfsError> {
        Err(VfsError::Unsupported {
            operation: "partial write",
        })
    }

    /// Delete the file from the store. Unsaved entries have nothing to delete.
    pub async fn remove(&self, store: &dyn BlobStore) -> Result<(), VfsError> {
        if !self.is_persisted() {
            tracing::warn!("remove called on unsaved entry {}", self.path());
            return Ok(());
        }

        store.delete(self.id()).await?;
        tracing::info!("deleted {} ({})", self.path(), self.id());
        Ok(())
    }
}

impl Deref for FileEntry {
    type Target = BlobEntry;

    fn deref(&self) -> &BlobEntry {
        &self.blob
    }
}

//! Blob store client trait.

use async_trait::async_trait;
use blobmount_model::{BlobMeta, Query, QueryResponse};

use crate::error::StoreError;

/// Operations the mount layer needs from a remote blob store.
///
/// Implementations own transport concerns (timeouts, authentication). The
/// mount layer never retries a failed call.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Run a structured query.
    ///
    /// # Arguments
    /// * `query` - Filter, paging and facet options
    ///
    /// # Returns
    /// One page of hits plus the server-side total.
    async fn query(&self, query: &Query) -> Result<QueryResponse, StoreError>;

    /// Fetch the metadata of a single blob.
    ///
    /// # Returns
    /// None if no blob has this ID.
    async fn get_meta(&self, id: &str) -> Result<Option<BlobMeta>, StoreError>;

    /// Create a new blob.
    ///
    /// # Arguments
    /// * `content` - Blob content; None for directories
    /// * `meta` - Metadata to store with the blob
    ///
    /// # Returns
    /// The ID assigned by the store.
    async fn create_blob(
        &self,
        content: Option<&[u8]>,
        meta: &BlobMeta,
    ) -> Result<String, StoreError>;

    /// Replace the content and metadata of an existing blob.
    async fn update_blob(&self, id: &str, content: &[u8], meta: &BlobMeta)
        -> Result<(), StoreError>;

    /// Replace only the metadata of an existing blob.
    async fn update_meta(&self, id: &str, meta: &BlobMeta) -> Result<(), StoreError>;

    /// Delete a blob.
    async fn delete(&self, id: &str) -> Result<(), StoreError>;

    /// Read an inclusive byte range of a blob's content.
    ///
    /// # Arguments
    /// * `id` - Blob ID
    /// * `start` - First byte offset
    /// * `end` - Last byte offset (inclusive)
    async fn read_range(&self, id: &str, start: u64, end: u64) -> Result<Vec<u8>, StoreError>;
}

//! In-memory blob store for testing and demos.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use blobmount_model::{BlobMeta, Facets, Hit, Query, QueryResponse};
use parking_lot::RwLock;

use crate::error::StoreError;
use crate::traits::BlobStore;

#[derive(Debug, Clone)]
struct StoredBlob {
    id: String,
    meta: BlobMeta,
    content: Vec<u8>,
}

/// Blob store that keeps everything in process memory.
///
/// Hits come back in insertion order. Facets are computed over every match,
/// not just the returned page, like a real server would.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<Vec<StoredBlob>>,
    queries: AtomicUsize,
}

impl MemoryBlobStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a blob under a caller-chosen ID.
    ///
    /// # Arguments
    /// * `id` - Blob ID
    /// * `meta` - Blob metadata
    /// * `content` - Blob content
    pub fn insert(&self, id: impl Into<String>, meta: BlobMeta, content: Vec<u8>) {
        let id: String = id.into();
        let mut blobs = self.blobs.write();
        match blobs.iter_mut().find(|b| b.id == id) {
            Some(existing) => {
                existing.meta = meta;
                existing.content = content;
            }
            None => blobs.push(StoredBlob { id, meta, content }),
        }
    }

    /// Current metadata of a blob, bypassing query accounting.
    pub fn meta(&self, id: &str) -> Option<BlobMeta> {
        self.blobs
            .read()
            .iter()
            .find(|b| b.id == id)
            .map(|b| b.meta.clone())
    }

    /// Current content of a blob.
    pub fn content(&self, id: &str) -> Option<Vec<u8>> {
        self.blobs
            .read()
            .iter()
            .find(|b| b.id == id)
            .map(|b| b.content.clone())
    }

    /// Number of stored blobs.
    pub fn len(&self) -> usize {
        self.blobs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.read().is_empty()
    }

    /// Number of `query` calls served so far.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn compute_facets(matches: &[&StoredBlob]) -> Facets {
        let mut facets: Facets = Facets::default();
        for blob in matches {
            for tag in &blob.meta.tags {
                *facets.tags.entry(tag.clone()).or_insert(0) += 1;
            }
            for (key, value) in &blob.meta.metadata {
                let values: &mut BTreeMap<String, u64> =
                    facets.meta.entry(key.clone()).or_default();
                *values.entry(value.clone()).or_insert(0) += 1;
            }
        }
        facets
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn query(&self, query: &Query) -> Result<QueryResponse, StoreError> {
        self.queries.fetch_add(1, Ordering::SeqCst);

        let blobs = self.blobs.read();
        let matches: Vec<&StoredBlob> = blobs
            .iter()
            .filter(|b| query.expression.matches(&b.meta))
            .collect();

        let facets: Option<Facets> = query.facets.then(|| Self::compute_facets(&matches));
        let hits: Vec<Hit> = matches
            .iter()
            .skip(query.from)
            .take(query.size)
            .map(|b| Hit {
                id: b.id.clone(),
                meta: b.meta.clone(),
                url: query.sign_urls.then(|| format!("memory://{}", b.id)),
            })
            .collect();

        Ok(QueryResponse {
            count: hits.len(),
            total: matches.len(),
            hits,
            facets,
        })
    }

    async fn get_meta(&self, id: &str) -> Result<Option<BlobMeta>, StoreError> {
        Ok(self.meta(id))
    }

    async fn create_blob(
        &self,
        content: Option<&[u8]>,
        meta: &BlobMeta,
    ) -> Result<String, StoreError> {
        let id: String = uuid::Uuid::new_v4().to_string();
        self.blobs.write().push(StoredBlob {
            id: id.clone(),
            meta: meta.clone(),
            content: content.map(<[u8]>::to_vec).unwrap_or_default(),
        });
        Ok(id)
    }

    async fn update_blob(
        &self,
        id: &str,
        content: &[u8],
        meta: &BlobMeta,
    ) -> Result<(), StoreError> {
        let mut blobs = self.blobs.write();
        let blob: &mut StoredBlob = blobs
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| StoreError::not_found(id))?;
        blob.content = content.to_vec();
        blob.meta = meta.clone();
        Ok(())
    }

    async fn update_meta(&self, id: &str, meta: &BlobMeta) -> Result<(), StoreError> {
        let mut blobs = self.blobs.write();
        let blob: &mut StoredBlob = blobs
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| StoreError::not_found(id))?;
        blob.meta = meta.clone();
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut blobs = self.blobs.write();
        let index: usize = blobs
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| StoreError::not_found(id))?;
        blobs.remove(index);
        Ok(())
    }

    async fn read_range(&self, id: &str, start: u64, end: u64) -> Result<Vec<u8>, StoreError> {
        let blobs = self.blobs.read();
        let blob: &StoredBlob = blobs
            .iter()
            .find(|b| b.id == id)
            .ok_or_else(|| StoreError::not_found(id))?;

        let len: u64 = blob.content.len() as u64;
        if start >= len || end < start {
            return Ok(Vec::new());
        }
        let stop: u64 = end.saturating_add(1).min(len);
        Ok(blob.content[start as usize..stop as usize].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use blobmount_model::Expression;

    use super::*;

    fn photo_store() -> MemoryBlobStore {
        let store: MemoryBlobStore = MemoryBlobStore::new();
        store.insert(
            "P1",
            BlobMeta::file("a.jpg", 3).with_tag("photos").with_tag("2023"),
            b"abc".to_vec(),
        );
        store.insert(
            "P2",
            BlobMeta::file("b.jpg", 3)
                .with_tag("photos")
                .with_tag("2024")
                .with_metadata("camera", "x100"),
            b"def".to_vec(),
        );
        store.insert("N1", BlobMeta::file("notes.txt", 0), Vec::new());
        store
    }

    #[tokio::test]
    async fn test_query_filters_and_pages() {
        let store: MemoryBlobStore = photo_store();
        let query: Query = Query::new(Expression::tag("photos")).with_size(1).with_from(1);

        let response: QueryResponse = store.query(&query).await.unwrap();

        assert_eq!(response.total, 2);
        assert_eq!(response.count, 1);
        assert_eq!(response.hits[0].id, "P2");
        assert_eq!(response.hits[0].url.as_deref(), Some("memory://P2"));
        assert!(response.facets.is_none());
    }

    #[tokio::test]
    async fn test_facets_cover_all_matches() {
        let store: MemoryBlobStore = photo_store();
        let query: Query = Query::new(Expression::tag("photos"))
            .with_size(0)
            .with_facets(true);

        let response: QueryResponse = store.query(&query).await.unwrap();
        let facets: Facets = response.facets.unwrap();

        assert!(response.hits.is_empty());
        assert_eq!(facets.tag_names(), vec!["2023", "2024", "photos"]);
        assert_eq!(facets.values_for("camera"), vec!["x100"]);
    }

    #[tokio::test]
    async fn test_create_update_delete() {
        let store: MemoryBlobStore = MemoryBlobStore::new();
        let meta: BlobMeta = BlobMeta::file("new.txt", 2);

        let id: String = store.create_blob(Some(b"hi"), &meta).await.unwrap();
        assert_eq!(store.content(&id), Some(b"hi".to_vec()));

        let updated: BlobMeta = BlobMeta::file("new.txt", 5);
        store.update_blob(&id, b"hello", &updated).await.unwrap();
        assert_eq!(store.meta(&id).unwrap().size, 5);

        store.delete(&id).await.unwrap();
        assert!(store.is_empty());
        assert!(matches!(
            store.delete(&id).await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_read_range_is_inclusive_and_clamped() {
        let store: MemoryBlobStore = MemoryBlobStore::new();
        store.insert("F1", BlobMeta::file("f", 5), b"hello".to_vec());

        assert_eq!(store.read_range("F1", 1, 3).await.unwrap(), b"ell".to_vec());
        assert_eq!(store.read_range("F1", 3, 100).await.unwrap(), b"lo".to_vec());
        assert!(store.read_range("F1", 9, 10).await.unwrap().is_empty());
        assert!(store.read_range("missing", 0, 1).await.is_err());
    }
}

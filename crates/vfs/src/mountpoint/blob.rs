//! Mount rooted at a single directory blob.

use std::sync::Arc;

use async_trait::async_trait;
use blobmount_model::{BlobMeta, Query};
use blobmount_storage::BlobStore;

use super::resolver::{as_directory, as_file, find_in_parent, Resolver};
use super::{Lookup, MountPoint};
use crate::entry::{DirectoryEntry, Entry, FileEntry, ResolvedDirectory};
use crate::options::MountOptions;
use crate::VfsError;

/// Exposes the subtree under one blob, following `parents` links downward.
pub struct BlobMount {
    root_id: String,
    resolver: Resolver,
}

impl BlobMount {
    /// Create a new blob mount.
    ///
    /// # Arguments
    /// * `root_id` - ID of the directory blob at the mount root
    /// * `store` - Blob store client
    /// * `options` - Paging and lookup sizes
    pub fn new(
        root_id: impl Into<String>,
        store: Arc<dyn BlobStore>,
        options: MountOptions,
    ) -> Self {
        Self {
            root_id: root_id.into(),
            resolver: Resolver::new(store, options),
        }
    }

    pub fn root_id(&self) -> &str {
        &self.root_id
    }

    async fn resolve_root(&self, full_path: &str) -> Result<Lookup<ResolvedDirectory>, VfsError> {
        let meta: Option<BlobMeta> = self.resolver.store().get_meta(&self.root_id).await?;
        Ok(match meta {
            Some(meta) if meta.is_directory() => Lookup::Found(ResolvedDirectory::Blob(
                DirectoryEntry::new(self.root_id.clone(), meta, full_path),
            )),
            Some(_) => Lookup::TypeMismatch,
            None => Lookup::NotFound,
        })
    }
}

#[async_trait]
impl MountPoint for BlobMount {
    async fn list_entries(&self, path: &str, full_path: &str) -> Result<Vec<Entry>, VfsError> {
        let directory_id: String = if path.is_empty() {
            self.root_id.clone()
        } else {
            self.resolver.walk_back(path, Some(&self.root_id)).await?
        };

        self.resolver
            .list_query(&Query::children_of(directory_id), full_path)
            .await
    }

    async fn resolve_directory(
        &self,
        path: &str,
        full_path: &str,
    ) -> Result<Lookup<ResolvedDirectory>, VfsError> {
        if path.is_empty() {
            return self.resolve_root(full_path).await;
        }
        Ok(as_directory(find_in_parent(self, path, full_path).await?))
    }

    async fn resolve_file(
        &self,
        path: &str,
        full_path: &str,
    ) -> Result<Lookup<FileEntry>, VfsError> {
        if path.is_empty() {
            return Ok(Lookup::TypeMismatch);
        }
        Ok(as_file(find_in_parent(self, path, full_path).await?))
    }
}

#[cfg(test)]
mod tests {
    use blobmount_storage::MemoryBlobStore;

    use super::*;

    fn docs_store() -> Arc<MemoryBlobStore> {
        let store: MemoryBlobStore = MemoryBlobStore::new();
        store.insert("D1", BlobMeta::directory("docs"), Vec::new());
        store.insert("F1", BlobMeta::file("a.txt", 5).with_parent("D1"), b"hello".to_vec());
        store.insert("D2", BlobMeta::directory("sub").with_parent("D1"), Vec::new());
        store.insert("F2", BlobMeta::file("b.txt", 2).with_parent("D2"), b"hi".to_vec());
        Arc::new(store)
    }

    #[tokio::test]
    async fn test_resolve_root() {
        let store: Arc<MemoryBlobStore> = docs_store();
        let mount: BlobMount = BlobMount::new("D1", store.clone(), MountOptions::default());

        let root: ResolvedDirectory = mount
            .resolve_directory("", "live")
            .await
            .unwrap()
            .found()
            .unwrap();
        assert_eq!(root.id(), Some("D1"));
        assert_eq!(root.name(), "docs");
        assert_eq!(root.path(), "live");

        let on_file: BlobMount = BlobMount::new("F1", store.clone(), MountOptions::default());
        assert_eq!(
            on_file.resolve_directory("", "").await.unwrap(),
            Lookup::TypeMismatch
        );

        let dangling: BlobMount = BlobMount::new("nope", store, MountOptions::default());
        assert_eq!(dangling.resolve_directory("", "").await.unwrap(), Lookup::NotFound);
    }

    #[tokio::test]
    async fn test_nested_listing_and_resolution() {
        let store: Arc<MemoryBlobStore> = docs_store();
        let mount: BlobMount = BlobMount::new("D1", store, MountOptions::default());

        let entries: Vec<Entry> = mount.list_entries("sub", "sub").await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path(), "sub/b.txt");

        let file: FileEntry = mount
            .resolve_file("sub/b.txt", "sub/b.txt")
            .await
            .unwrap()
            .found()
            .unwrap();
        assert_eq!(file.id(), "F2");

        assert_eq!(
            mount.resolve_file("sub", "sub").await.unwrap(),
            Lookup::TypeMismatch
        );
        assert_eq!(
            mount.resolve_directory("a.txt", "a.txt").await.unwrap(),
            Lookup::TypeMismatch
        );
        assert_eq!(
            mount.resolve_file("nope/b.txt", "nope/b.txt").await.unwrap(),
            Lookup::NotFound
        );
        assert!(mount.list_entries("nope", "nope").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_listing_a_file_is_empty() {
        let store: Arc<MemoryBlobStore> = docs_store();
        let mount: BlobMount = BlobMount::new("D1", store, MountOptions::default());

        assert!(mount.list_entries("a.txt", "a.txt").await.unwrap().is_empty());
    }
}

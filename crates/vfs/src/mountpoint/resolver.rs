//! Store access and path walk-back shared by the leaf mounts.

use std::collections::HashMap;
use std::sync::Arc;

use blobmount_model::{Query, QueryResponse};
use blobmount_storage::{fetch_all, BlobStore};

use super::{Lookup, MountPoint};
use crate::cache::PathCache;
use crate::entry::{Entry, FileEntry, ResolvedDirectory};
use crate::options::MountOptions;
use crate::path;
use crate::VfsError;

/// Store handle, options and path cache owned by one leaf mount.
pub(crate) struct Resolver {
    store: Arc<dyn BlobStore>,
    options: MountOptions,
    cache: PathCache,
}

impl Resolver {
    pub(crate) fn new(store: Arc<dyn BlobStore>, options: MountOptions) -> Self {
        Self {
            store,
            options,
            cache: PathCache::new(),
        }
    }

    pub(crate) fn store(&self) -> &Arc<dyn BlobStore> {
        &self.store
    }

    pub(crate) fn options(&self) -> MountOptions {
        self.options
    }

    pub(crate) fn cache(&self) -> &PathCache {
        &self.cache
    }

    /// Fetch every hit of a query and materialize them under `full_path`.
    pub(crate) async fn list_query(
        &self,
        query: &Query,
        full_path: &str,
    ) -> Result<Vec<Entry>, VfsError> {
        let response: QueryResponse =
            fetch_all(self.store.as_ref(), query, self.options.page_size).await?;
        let entries: Vec<Entry> = response
            .hits
            .into_iter()
            .map(|hit| {
                let entry_path: String = path::join(full_path, &hit.meta.name);
                Entry::from_hit(hit, entry_path)
            })
            .collect();
        Ok(entries)
    }

    /// Name to blob ID map over every hit of a query.
    pub(crate) async fn names(&self, query: &Query) -> Result<HashMap<String, String>, VfsError> {
        let response: QueryResponse =
            fetch_all(self.store.as_ref(), query, self.options.page_size).await?;
        Ok(response
            .hits
            .into_iter()
            .map(|hit| (hit.meta.name, hit.id))
            .collect())
    }

    /// Name to blob ID map of one directory, from a single descent query.
    async fn children_of(&self, parent_id: &str) -> Result<HashMap<String, String>, VfsError> {
        let query: Query = Query::children_of(parent_id)
            .with_size(self.options.lookup_size)
            .with_sign_urls(false);
        let response: QueryResponse = self.store.query(&query).await?;
        Ok(response
            .hits
            .into_iter()
            .map(|hit| (hit.meta.name, hit.id))
            .collect())
    }

    /// Resolve a path to a blob ID, caching every directory crossed.
    ///
    /// Starts from the lowest cached ancestor of `path` (or `root_id` when no
    /// ancestor is cached) and issues one children query per remaining
    /// segment.
    ///
    /// # Arguments
    /// * `path` - Non-empty normalized path relative to the mount
    /// * `root_id` - Blob the mount root maps to, if any. Without one, some
    ///   ancestor of `path` must already be cached.
    ///
    /// # Returns
    /// The blob ID at `path`, or `VfsError::NotFound` if a segment is missing.
    pub(crate) async fn walk_back(
        &self,
        path: &str,
        root_id: Option<&str>,
    ) -> Result<String, VfsError> {
        let cached: Option<(&str, String)> = path::self_and_ancestors(path)
            .find_map(|ancestor| self.cache.get(ancestor).map(|id| (ancestor, id)));

        let (mut resolved, mut current_id): (String, String) = match (cached, root_id) {
            (Some((ancestor, id)), _) => (ancestor.to_string(), id),
            (None, Some(root_id)) => (String::new(), root_id.to_string()),
            (None, None) => return Err(VfsError::not_found(path)),
        };

        let remaining: &str = path[resolved.len()..].trim_start_matches('/');
        tracing::debug!(
            "walk-back for '{}': cached '{}' ({}), resolving '{}'",
            path,
            resolved,
            current_id,
            remaining
        );

        if remaining.is_empty() {
            return Ok(current_id);
        }

        for segment in remaining.split('/') {
            let children: HashMap<String, String> = self.children_of(&current_id).await?;
            resolved = path::join(&resolved, segment);
            current_id = match children.get(segment) {
                Some(id) => id.clone(),
                None => {
                    tracing::debug!("walk-back for '{}': no '{}'", path, resolved);
                    return Err(VfsError::not_found(resolved));
                }
            };
            self.cache.set(resolved.clone(), current_id.clone());
        }

        Ok(current_id)
    }
}

/// Find the entry at `path` by listing its parent directory.
///
/// # Returns
/// `None` when the parent does not exist or has no child of that name.
pub(crate) async fn find_in_parent(
    mount: &dyn MountPoint,
    path: &str,
    full_path: &str,
) -> Result<Option<Entry>, VfsError> {
    let name: &str = path::base_name(path);
    let entries: Vec<Entry> = match mount
        .list_entries(path::parent(path), path::parent(full_path))
        .await
    {
        Ok(entries) => entries,
        Err(err) if err.is_not_found() => return Ok(None),
        Err(err) => return Err(err),
    };

    Ok(entries.into_iter().find(|entry| entry.name() == name))
}

pub(crate) fn as_directory(found: Option<Entry>) -> Lookup<ResolvedDirectory> {
    match found {
        Some(Entry::Directory(dir)) => Lookup::Found(ResolvedDirectory::Blob(dir)),
        Some(Entry::Virtual(vdir)) => Lookup::Found(ResolvedDirectory::Virtual(vdir)),
        Some(Entry::File(_)) => Lookup::TypeMismatch,
        None => Lookup::NotFound,
    }
}

pub(crate) fn as_file(found: Option<Entry>) -> Lookup<FileEntry> {
    match found {
        Some(Entry::File(file)) => Lookup::Found(file),
        Some(Entry::Directory(_)) | Some(Entry::Virtual(_)) => Lookup::TypeMismatch,
        None => Lookup::NotFound,
    }
}

#[cfg(test)]
mod tests {
    use blobmount_model::BlobMeta;
    use blobmount_storage::MemoryBlobStore;

    use super::*;

    fn nested_store() -> Arc<MemoryBlobStore> {
        let store: MemoryBlobStore = MemoryBlobStore::new();
        store.insert("R", BlobMeta::directory("root"), Vec::new());
        store.insert("A", BlobMeta::directory("a").with_parent("R"), Vec::new());
        store.insert("B", BlobMeta::directory("b").with_parent("A"), Vec::new());
        store.insert("C", BlobMeta::file("c.txt", 1).with_parent("B"), b"c".to_vec());
        Arc::new(store)
    }

    #[tokio::test]
    async fn test_walk_back_descends_and_caches() {
        let store: Arc<MemoryBlobStore> = nested_store();
        let resolver: Resolver = Resolver::new(store.clone(), MountOptions::default());

        let id: String = resolver.walk_back("a/b", Some("R")).await.unwrap();

        assert_eq!(id, "B");
        assert_eq!(store.query_count(), 2);
        assert_eq!(resolver.cache().get("a").as_deref(), Some("A"));
        assert_eq!(resolver.cache().get("a/b").as_deref(), Some("B"));
    }

    #[tokio::test]
    async fn test_walk_back_starts_from_cached_ancestor() {
        let store: Arc<MemoryBlobStore> = nested_store();
        let resolver: Resolver = Resolver::new(store.clone(), MountOptions::default());
        resolver.cache().set("a", "A");

        let id: String = resolver.walk_back("a/b/c.txt", Some("R")).await.unwrap();

        assert_eq!(id, "C");
        // One query for "a" -> "b", one for "b" -> "c.txt".
        assert_eq!(store.query_count(), 2);

        let again: String = resolver.walk_back("a/b/c.txt", Some("R")).await.unwrap();
        assert_eq!(again, "C");
        assert_eq!(store.query_count(), 2);
    }

    #[tokio::test]
    async fn test_walk_back_missing_segment() {
        let store: Arc<MemoryBlobStore> = nested_store();
        let resolver: Resolver = Resolver::new(store, MountOptions::default());

        let err: VfsError = resolver.walk_back("a/nope/c", Some("R")).await.unwrap_err();

        assert!(matches!(err, VfsError::NotFound { ref path } if path == "a/nope"));
        assert!(resolver.cache().get("a/nope").is_none());
    }

    #[tokio::test]
    async fn test_walk_back_without_root_needs_cached_ancestor() {
        let store: Arc<MemoryBlobStore> = nested_store();
        let resolver: Resolver = Resolver::new(store, MountOptions::default());

        assert!(resolver.walk_back("a/b", None).await.unwrap_err().is_not_found());

        resolver.cache().set("a", "A");
        assert_eq!(resolver.walk_back("a/b", None).await.unwrap(), "B");
    }

    #[tokio::test]
    async fn test_list_query_stamps_paths() {
        let store: Arc<MemoryBlobStore> = nested_store();
        let resolver: Resolver = Resolver::new(store, MountOptions::default().with_page_size(1));

        let entries: Vec<Entry> = resolver
            .list_query(&Query::children_of("B"), "live/a/b")
            .await
            .unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path(), "live/a/b/c.txt");
        assert!(!entries[0].is_dir());
    }
}

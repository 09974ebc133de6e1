//! Mount rooted at a filter expression.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use blobmount_model::{Expression, Facets, Query, QueryResponse};
use blobmount_storage::{BlobStore, StoreError};

use super::resolver::{as_directory, as_file, find_in_parent, Resolver};
use super::virtual_mount::VirtualMount;
use super::{Lookup, MountPoint};
use crate::entry::{Entry, FileEntry, ResolvedDirectory, VirtualDirEntry};
use crate::options::MountOptions;
use crate::path;
use crate::VfsError;

/// Name of the grouping directory holding one subdirectory per tag.
pub const TAGS_DIRECTORY: &str = "Tags";

/// Exposes the blobs matching an expression.
///
/// Ungrouped, the root lists every match and deeper paths descend through
/// `parents` links from those matches. Grouped, the root holds a fixed set of
/// facet directories: [`TAGS_DIRECTORY`] with one directory per tag, and one
/// directory per configured attribute key with one directory per value. Each
/// of those leaf directories is an ungrouped query mount narrowed to that
/// tag or value.
///
/// Those per-value mounts are kept for the life of the grouped mount, keyed by
/// grouping directory and value, so descents below a group reuse their path
/// caches. The facet query is still issued on every descent. Values
/// containing `/` cannot be named by a single path segment and are skipped.
pub struct QueryMount {
    expression: Expression,
    group_by_tags: bool,
    group_by_meta_keys: Vec<String>,
    resolver: Resolver,
    value_mounts: Mutex<HashMap<(String, String), Arc<dyn MountPoint>>>,
}

impl QueryMount {
    /// Create an ungrouped query mount.
    ///
    /// # Arguments
    /// * `expression` - Filter selecting the blobs at the mount root
    /// * `store` - Blob store client
    /// * `options` - Paging and lookup sizes
    pub fn new(expression: Expression, store: Arc<dyn BlobStore>, options: MountOptions) -> Self {
        Self {
            expression,
            group_by_tags: false,
            group_by_meta_keys: Vec::new(),
            resolver: Resolver::new(store, options),
            value_mounts: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_group_by_tags(mut self, group_by_tags: bool) -> Self {
        self.group_by_tags = group_by_tags;
        self
    }

    pub fn with_group_by_meta_keys(mut self, keys: Vec<String>) -> Self {
        self.group_by_meta_keys = keys;
        self
    }

    pub fn expression(&self) -> &Expression {
        &self.expression
    }

    /// Whether the root shows facet directories instead of matches.
    pub fn is_grouped(&self) -> bool {
        self.group_by_tags || !self.group_by_meta_keys.is_empty()
    }

    fn root_query(&self) -> Query {
        Query::new(self.expression.clone())
    }

    async fn list_flat(&self, path: &str, full_path: &str) -> Result<Vec<Entry>, VfsError> {
        if path.is_empty() {
            return self.resolver.list_query(&self.root_query(), full_path).await;
        }

        let (head, _) = path::split_head(path);
        if self.resolver.cache().get(head).is_none() {
            let roots: HashMap<String, String> = self.resolver.names(&self.root_query()).await?;
            tracing::debug!("seeding {} root names for {}", roots.len(), self.expression);
            for (name, id) in roots {
                self.resolver.cache().set(name, id);
            }
        }

        let directory_id: String = self.resolver.walk_back(path, None).await?;
        self.resolver
            .list_query(&Query::children_of(directory_id), full_path)
            .await
    }

    async fn list_grouped(&self, path: &str, full_path: &str) -> Result<Vec<Entry>, VfsError> {
        if path.is_empty() {
            let entries: Vec<Entry> = std::iter::once(TAGS_DIRECTORY)
                .chain(self.group_by_meta_keys.iter().map(String::as_str))
                .map(|name| Entry::Virtual(VirtualDirEntry::new(name, path::join(full_path, name))))
                .collect();
            return Ok(entries);
        }

        let (head, tail) = path::split_head(path);
        let group: VirtualMount = self.group(head, full_path).await?;
        group.list_entries(tail, full_path).await
    }

    /// Build the union mount for one grouping directory.
    ///
    /// Issues one facet query over the root expression; each observed tag or
    /// value becomes a child mount narrowed to it, reused from earlier calls
    /// when one exists.
    async fn group(&self, head: &str, full_path: &str) -> Result<VirtualMount, VfsError> {
        let by_tag: bool = head == TAGS_DIRECTORY;
        if !by_tag && !self.group_by_meta_keys.iter().any(|key| key == head) {
            return Err(VfsError::not_found(full_path));
        }

        let query: Query = self
            .root_query()
            .with_size(0)
            .with_sign_urls(false)
            .with_facets(true);
        let response: QueryResponse = self.resolver.store().query(&query).await?;
        let facets: Facets = response.facets.ok_or_else(|| {
            StoreError::protocol(format!("no facets returned for {}", self.expression))
        })?;

        let values: Vec<String> = if by_tag {
            facets.tag_names()
        } else {
            facets.values_for(head)
        };
        tracing::debug!("grouping '{}' over {} values", head, values.len());

        let mut mounts: BTreeMap<String, Arc<dyn MountPoint>> = BTreeMap::new();
        let mut value_mounts = self.value_mounts.lock();
        for value in values {
            if value.is_empty() || value.contains('/') {
                tracing::debug!("skipping unaddressable value '{}' under '{}'", value, head);
                continue;
            }
            let mount: Arc<dyn MountPoint> = value_mounts
                .entry((head.to_string(), value.clone()))
                .or_insert_with(|| {
                    let expression: Expression = if by_tag {
                        self.expression.clone().and_tag(value.clone())
                    } else {
                        self.expression.clone().and_key_value(head, value.clone())
                    };
                    Arc::new(QueryMount::new(
                        expression,
                        self.resolver.store().clone(),
                        self.resolver.options(),
                    ))
                })
                .clone();
            mounts.insert(value, mount);
        }
        drop(value_mounts);

        Ok(VirtualMount::new(mounts))
    }
}

#[async_trait]
impl MountPoint for QueryMount {
    async fn list_entries(&self, path: &str, full_path: &str) -> Result<Vec<Entry>, VfsError> {
        if self.is_grouped() {
            self.list_grouped(path, full_path).await
        } else {
            self.list_flat(path, full_path).await
        }
    }

    async fn resolve_directory(
        &self,
        path: &str,
        full_path: &str,
    ) -> Result<Lookup<ResolvedDirectory>, VfsError> {
        if path.is_empty() {
            return Ok(Lookup::Found(ResolvedDirectory::Virtual(VirtualDirEntry::new(
                path::base_name(full_path),
                full_path,
            ))));
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

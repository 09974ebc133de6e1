//! Named union of mounts.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

use super::{Lookup, MountPoint};
use crate::entry::{Entry, FileEntry, ResolvedDirectory, VirtualDirEntry};
use crate::path;
use crate::VfsError;

/// Routes the first path segment to a child mount by name.
///
/// The union's own level lists one virtual directory per child, in name
/// order. Paths under an unknown name fail without touching any child.
pub struct VirtualMount {
    mounts: BTreeMap<String, Arc<dyn MountPoint>>,
}

impl VirtualMount {
    pub fn new(mounts: BTreeMap<String, Arc<dyn MountPoint>>) -> Self {
        Self { mounts }
    }

    /// Child names in listing order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.mounts.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.mounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mounts.is_empty()
    }
}

#[async_trait]
impl MountPoint for VirtualMount {
    async fn list_entries(&self, path: &str, full_path: &str) -> Result<Vec<Entry>, VfsError> {
        let (head, tail) = path::split_head(path);
        if head.is_empty() {
            return Ok(self
                .names()
                .map(|name| Entry::Virtual(VirtualDirEntry::new(name, path::join(full_path, name))))
                .collect());
        }

        match self.mounts.get(head) {
            Some(mount) => mount.list_entries(tail, full_path).await,
            None => Err(VfsError::not_found(full_path)),
        }
    }

    async fn resolve_directory(
        &self,
        path: &str,
        full_path: &str,
    ) -> Result<Lookup<ResolvedDirectory>, VfsError> {
        let (head, tail) = path::split_head(path);
        if head.is_empty() {
            return Ok(Lookup::Found(ResolvedDirectory::Virtual(VirtualDirEntry::new(
                path::base_name(full_path),
                full_path,
            ))));
        }

        match self.mounts.get(head) {
            Some(mount) => mount.resolve_directory(tail, full_path).await,
            None => Ok(Lookup::NotFound),
        }
    }

    async fn resolve_file(
        &self,
        path: &str,
        full_path: &str,
    ) -> Result<Lookup<FileEntry>, VfsError> {
        let (head, tail) = path::split_head(path);
        if head.is_empty() {
            return Ok(Lookup::TypeMismatch);
        }

        match self.mounts.get(head) {
            Some(mount) => mount.resolve_file(tail, full_path).await,
            None => Ok(Lookup::NotFound),
        }
    }
}

//! Filesystem operations over a mount tree.
//!
//! `BlobFilesystem` is what a serving layer (FUSE or similar) talks to. Reads
//! go through mount resolution; writes resolve their parent directory and
//! then issue a single store call each. Nothing is buffered or staged.

use std::sync::Arc;

use blobmount_model::BlobMeta;
use blobmount_storage::BlobStore;

use crate::config::FilesystemConfig;
use crate::entry::{ByteRange, DirectoryEntry, Entry, FileEntry, ResolvedDirectory};
use crate::mountpoint::{load_mount, Lookup, MountPoint};
use crate::options::MountOptions;
use crate::path;
use crate::VfsError;

/// A mounted blob tree.
pub struct BlobFilesystem {
    store: Arc<dyn BlobStore>,
    root: Arc<dyn MountPoint>,
}

impl BlobFilesystem {
    /// Create a filesystem over an already built mount tree.
    ///
    /// # Arguments
    /// * `store` - Blob store client used for writes
    /// * `root` - Root mount
    pub fn new(store: Arc<dyn BlobStore>, root: Arc<dyn MountPoint>) -> Self {
        Self { store, root }
    }

    /// Build the mount tree described by a configuration.
    ///
    /// # Arguments
    /// * `config` - Parsed configuration file
    /// * `store` - Blob store client for `config.profile`
    /// * `options` - Paging and lookup sizes
    pub fn from_config(
        config: &FilesystemConfig,
        store: Arc<dyn BlobStore>,
        options: MountOptions,
    ) -> Result<Self, VfsError> {
        let root: Arc<dyn MountPoint> = load_mount(&config.mount, store.clone(), options)?;
        tracing::info!(
            "loaded mount tree for {} (profile '{}')",
            config.mount_point.display(),
            config.profile
        );
        Ok(Self::new(store, root))
    }

    pub fn root(&self) -> &Arc<dyn MountPoint> {
        &self.root
    }

    /// List a directory.
    pub async fn list(&self, dir: &str) -> Result<Vec<Entry>, VfsError> {
        let dir: String = path::normalize(dir);
        self.root.list_entries(&dir, &dir).await
    }

    /// Look up whatever is at `path`, file or directory.
    pub async fn stat(&self, path: &str) -> Result<Entry, VfsError> {
        let path: String = path::normalize(path);
        if let Lookup::Found(file) = self.root.resolve_file(&path, &path).await? {
            return Ok(Entry::File(file));
        }
        match self.root.resolve_directory(&path, &path).await? {
            Lookup::Found(dir) => Ok(dir.into_entry()),
            _ => Err(VfsError::not_found(path)),
        }
    }

    /// Read a byte range of a file.
    pub async fn read(&self, path: &str, range: ByteRange) -> Result<Vec<u8>, VfsError> {
        let file: FileEntry = self.file(path).await?;
        file.open(self.store.as_ref(), range).await
    }

    /// Write a whole file, creating it or replacing its content.
    ///
    /// # Arguments
    /// * `path` - File path; its parent must be a blob-backed directory
    /// * `content` - Complete new content
    ///
    /// # Returns
    /// The written file. `VfsError::PermissionDenied` when the parent is
    /// missing or virtual.
    pub async fn put(&self, path: &str, content: &[u8]) -> Result<FileEntry, VfsError> {
        let path: String = path::normalize(path);
        let parent_id: String = match self.blob_directory(path::parent(&path)).await? {
            Some(parent) => parent.id().to_string(),
            None => return Err(VfsError::permission_denied(path)),
        };

        match self.root.resolve_file(&path, &path).await? {
            Lookup::Found(mut file) => {
                file.update(self.store.as_ref(), content).await?;
                Ok(file)
            }
            Lookup::TypeMismatch => Err(VfsError::TypeMismatch {
                path,
                expected: "file",
            }),
            Lookup::NotFound => {
                let meta: BlobMeta = BlobMeta::file(path::base_name(&path), content.len() as u64)
                    .with_parent(&parent_id);
                let id: String = self.store.create_blob(Some(content), &meta).await?;
                tracing::info!("created {} ({}, {} bytes)", path, id, content.len());
                Ok(FileEntry::new(id, meta, path))
            }
        }
    }

    /// Create a directory.
    pub async fn mkdir(&self, dir: &str) -> Result<DirectoryEntry, VfsError> {
        let dir: String = path::normalize(dir);
        if self.root.resolve_file(&dir, &dir).await?.is_found() {
            return Err(VfsError::TypeMismatch {
                path: dir,
                expected: "directory",
            });
        }
        if self.root.resolve_directory(&dir, &dir).await?.is_found() {
            return Err(VfsError::AlreadyExists { path: dir });
        }

        let parent_id: String = match self.blob_directory(path::parent(&dir)).await? {
            Some(parent) => parent.id().to_string(),
            None => return Err(VfsError::permission_denied(dir)),
        };

        let meta: BlobMeta = BlobMeta::directory(path::base_name(&dir)).with_parent(&parent_id);
        let id: String = self.store.create_blob(None, &meta).await?;
        tracing::info!("created directory {} ({})", dir, id);
        Ok(DirectoryEntry::new(id, meta, dir))
    }

    /// Delete an empty directory.
    pub async fn rmdir(&self, dir: &str) -> Result<(), VfsError> {
        let dir: String = path::normalize(dir);
        let target: DirectoryEntry = match self.blob_directory(&dir).await? {
            Some(target) => target,
            None => return Err(VfsError::not_found(dir)),
        };

        if target.child_count(self.store.as_ref()).await? > 0 {
            return Err(VfsError::DirectoryNotEmpty { path: dir });
        }

        self.store.delete(target.id()).await?;
        tracing::info!("deleted directory {} ({})", dir, target.id());
        Ok(())
    }

    /// Delete a file.
    pub async fn remove(&self, path: &str) -> Result<(), VfsError> {
        let file: FileEntry = self.file(path).await?;
        file.remove(self.store.as_ref()).await
    }

    /// Move a file, replacing any file already at `dst`.
    ///
    /// Only the parent link through the source directory is swapped for the
    /// destination directory; other parents of the blob are kept.
    ///
    /// # Returns
    /// The moved file. `VfsError::CannotMove` when either parent is not a
    /// blob-backed directory or the source is not a file.
    pub async fn rename(&self, src: &str, dst: &str) -> Result<FileEntry, VfsError> {
        let src: String = path::normalize(src);
        let dst: String = path::normalize(dst);
        let cannot_move = || VfsError::CannotMove {
            from: src.clone(),
            to: dst.clone(),
        };

        let src_parent: DirectoryEntry = self
            .blob_directory(path::parent(&src))
            .await?
            .ok_or_else(cannot_move)?;
        let file: FileEntry = self
            .root
            .resolve_file(&src, &src)
            .await?
            .found()
            .ok_or_else(cannot_move)?;
        if src == dst {
            return Ok(file);
        }

        let dst_parent: DirectoryEntry = self
            .blob_directory(path::parent(&dst))
            .await?
            .ok_or_else(cannot_move)?;

        // Nothing is deleted until every precondition has held.
        if let Lookup::Found(existing) = self.root.resolve_file(&dst, &dst).await? {
            if let Err(err) = existing.remove(self.store.as_ref()).await {
                tracing::warn!("could not replace {}: {}", dst, err);
                return Err(cannot_move());
            }
        }

        let mut meta: BlobMeta = file.meta().clone();
        meta.parents.remove(src_parent.id());
        meta.parents.insert(dst_parent.id().to_string());
        meta.name = path::base_name(&dst).to_string();

        self.store.update_meta(file.id(), &meta).await?;
        tracing::info!("moved {} to {} ({})", src, dst, file.id());
        Ok(FileEntry::new(file.id(), meta, dst))
    }

    async fn file(&self, path: &str) -> Result<FileEntry, VfsError> {
        let path: String = path::normalize(path);
        self.root
            .resolve_file(&path, &path)
            .await?
            .into_result(&path, "file")
    }

    /// The blob-backed directory at `dir`, if there is one.
    async fn blob_directory(&self, dir: &str) -> Result<Option<DirectoryEntry>, VfsError> {
        Ok(match self.root.resolve_directory(dir, dir).await? {
            Lookup::Found(ResolvedDirectory::Blob(directory)) => Some(directory),
            _ => None,
        })
    }
}

//! Entries produced by mount resolution.
//!
//! Blob-backed entries (`FileEntry`, `DirectoryEntry`) wrap a `BlobEntry`
//! holding the blob ID, its metadata and the path it was materialized at.
//! `VirtualDirEntry` stands for directory levels that exist only in the
//! mounted view.

mod blob;
mod directory;
mod file;
mod virtual_dir;

use std::time::SystemTime;

use blobmount_model::{BlobType, Hit};

pub use blob::BlobEntry;
pub use directory::DirectoryEntry;
pub use file::{ByteRange, FileEntry};
pub use virtual_dir::VirtualDirEntry;

/// Child-count hint meaning "unknown, do not compute eagerly".
pub const UNKNOWN_ITEM_COUNT: i64 = -1;

/// One item of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    File(FileEntry),
    Directory(DirectoryEntry),
    Virtual(VirtualDirEntry),
}

impl Entry {
    /// Build an entry from a query hit.
    ///
    /// # Arguments
    /// * `hit` - Query hit
    /// * `path` - Full path the entry is listed under
    pub fn from_hit(hit: Hit, path: impl Into<String>) -> Self {
        match hit.meta.blob_type {
            BlobType::File => Entry::File(FileEntry::new(hit.id, hit.meta, path)),
            BlobType::Directory => Entry::Directory(DirectoryEntry::new(hit.id, hit.meta, path)),
        }
    }

    /// Blob ID, empty for virtual directories.
    pub fn id(&self) -> &str {
        match self {
            Entry::File(file) => file.id(),
            Entry::Directory(dir) => dir.id(),
            Entry::Virtual(vdir) => vdir.id(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Entry::File(file) => file.name(),
            Entry::Directory(dir) => dir.name(),
            Entry::Virtual(vdir) => vdir.name(),
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Entry::File(file) => file.path(),
            Entry::Directory(dir) => dir.path(),
            Entry::Virtual(vdir) => vdir.path(),
        }
    }

    pub fn size(&self) -> i64 {
        match self {
            Entry::File(file) => file.size(),
            Entry::Directory(dir) => dir.size(),
            Entry::Virtual(vdir) => vdir.size(),
        }
    }

    pub fn mod_time(&self) -> SystemTime {
        match self {
            Entry::File(file) => file.mod_time(),
            Entry::Directory(dir) => dir.mod_time(),
            Entry::Virtual(vdir) => vdir.mod_time(),
        }
    }

    /// Child-count hint; files report 0.
    pub fn items(&self) -> i64 {
        match self {
            Entry::File(_) => 0,
            Entry::Directory(dir) => dir.items(),
            Entry::Virtual(vdir) => vdir.items(),
        }
    }

    pub fn is_dir(&self) -> bool {
        !matches!(self, Entry::File(_))
    }
}

/// A directory found by path resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedDirectory {
    /// Backed by a `Directory` blob; children can be created under it.
    Blob(DirectoryEntry),
    /// A synthetic level with nothing to attach children to.
    Virtual(VirtualDirEntry),
}

impl ResolvedDirectory {
    /// Backing blob ID, `None` for virtual directories.
    pub fn id(&self) -> Option<&str> {
        match self {
            ResolvedDirectory::Blob(dir) => Some(dir.id()),
            ResolvedDirectory::Virtual(_) => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ResolvedDirectory::Blob(dir) => dir.name(),
            ResolvedDirectory::Virtual(vdir) => vdir.name(),
        }
    }

    pub fn path(&self) -> &str {
        match self {
            ResolvedDirectory::Blob(dir) => dir.path(),
            ResolvedDirectory::Virtual(vdir) => vdir.path(),
        }
    }

    pub fn into_entry(self) -> Entry {
        match self {
            ResolvedDirectory::Blob(dir) => Entry::Directory(dir),
            ResolvedDirectory::Virtual(vdir) => Entry::Virtual(vdir),
        }
    }
}

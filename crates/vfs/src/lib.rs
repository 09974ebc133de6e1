//! Path-based view over a tag-and-query blob store.
//!
//! The store addresses blobs by opaque IDs and finds them through structured
//! queries; this crate lays them out as a directory tree. The tree is
//! assembled from mounts, declared in JSON:
//!
//! - **Blob mounts** expose the subtree under one directory blob
//! - **Query mounts** expose the blobs matching an expression, optionally
//!   grouped into tag and attribute directories
//! - **Virtual mounts** join named mounts under one directory
//!
//! # Architecture
//!
//! ```text
//! Layer 3: BlobFilesystem (list, stat, read, put, mkdir, rmdir, remove, rename)
//! Layer 2: MountPoint (BlobMount, QueryMount, VirtualMount) + loader
//! Layer 1: Entries, PathCache, path helpers
//! ```
//!
//! # Example
//!
//! ```ignore
//! use blobmount_vfs::{BlobFilesystem, FilesystemConfig, MountOptions};
//!
//! let config = FilesystemConfig::load("blobmount.json")?;
//! let store: Arc<dyn BlobStore> = Arc::new(MyStoreClient::from_profile(&config.profile)?);
//! let fs = BlobFilesystem::from_config(&config, store, MountOptions::default())?;
//! for entry in fs.list("photos/Tags").await? {
//!     println!("{}", entry.path());
//! }
//! ```

pub mod cache;
pub mod config;
pub mod entry;
pub mod error;
pub mod filesystem;
pub mod mountpoint;
pub mod options;
pub mod path;

pub use cache::PathCache;
pub use config::FilesystemConfig;
pub use entry::{
    BlobEntry, ByteRange, DirectoryEntry, Entry, FileEntry, ResolvedDirectory, VirtualDirEntry,
    UNKNOWN_ITEM_COUNT,
};
pub use error::VfsError;
pub use filesystem::BlobFilesystem;
pub use mountpoint::{
    load_mount, BlobMount, Lookup, MountNode, MountPoint, QueryMount, VirtualMount,
    TAGS_DIRECTORY,
};
pub use options::{MountOptions, DEFAULT_LOOKUP_SIZE};

// Re-export the store contract so callers need only this crate.
pub use blobmount_storage::{BlobStore, MemoryBlobStore, StoreError};

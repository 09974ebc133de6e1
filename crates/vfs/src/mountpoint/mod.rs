//! Mount strategies that map slash-separated paths onto the blob store.
//!
//! Three kinds of mount answer the same contract:
//!
//! - [`BlobMount`] - rooted at one directory blob, descends through
//!   `parent = id` queries
//! - [`QueryMount`] - rooted at a filter expression, optionally grouped into
//!   facet directories
//! - [`VirtualMount`] - a named union of other mounts
//!
//! Mounts are built from a declarative tree by [`load_mount`] and are used
//! behind `Arc<dyn MountPoint>` afterwards.
//!
//! Paths handed to a mount are normalized (see [`crate::path::normalize`])
//! and relative to that mount. The accompanying `full_path` is the same
//! location in the global tree and is only used to stamp produced entries.

mod blob;
mod loader;
mod query;
mod resolver;
mod virtual_mount;

use async_trait::async_trait;

use crate::entry::{Entry, FileEntry, ResolvedDirectory};
use crate::VfsError;

pub use blob::BlobMount;
pub use loader::{load_mount, MountNode};
pub use query::{QueryMount, TAGS_DIRECTORY};
pub use virtual_mount::VirtualMount;

/// Outcome of resolving a path to a specific kind of entry.
///
/// Misses are ordinary values; only remote failures are errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
    /// Something exists at the path, but of the other kind.
    TypeMismatch,
}

impl<T> Lookup<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Lookup::Found(value) => Lookup::Found(f(value)),
            Lookup::NotFound => Lookup::NotFound,
            Lookup::TypeMismatch => Lookup::TypeMismatch,
        }
    }

    /// Turn a miss into the matching error.
    ///
    /// # Arguments
    /// * `path` - Path that was resolved, for the error message
    /// * `expected` - Kind that was asked for ("file" or "directory")
    pub fn into_result(self, path: &str, expected: &'static str) -> Result<T, VfsError> {
        match self {
            Lookup::Found(value) => Ok(value),
            Lookup::NotFound => Err(VfsError::not_found(path)),
            Lookup::TypeMismatch => Err(VfsError::TypeMismatch {
                path: path.to_string(),
                expected,
            }),
        }
    }
}

/// Path resolution contract shared by every mount kind.
#[async_trait]
pub trait MountPoint: Send + Sync {
    /// List the immediate children of a directory.
    ///
    /// # Arguments
    /// * `path` - Directory path relative to this mount
    /// * `full_path` - The same directory in the global tree
    ///
    /// # Returns
    /// `VfsError::NotFound` when the directory does not exist.
    async fn list_entries(&self, path: &str, full_path: &str) -> Result<Vec<Entry>, VfsError>;

    /// Resolve the directory at exactly `path`. The empty path is the mount's
    /// own root.
    async fn resolve_directory(
        &self,
        path: &str,
        full_path: &str,
    ) -> Result<Lookup<ResolvedDirectory>, VfsError>;

    /// Resolve the file at exactly `path`.
    async fn resolve_file(&self, path: &str, full_path: &str)
        -> Result<Lookup<FileEntry>, VfsError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_helpers() {
        let found: Lookup<u32> = Lookup::Found(3);
        assert!(found.is_found());
        assert_eq!(found.clone().map(|n| n * 2), Lookup::Found(6));
        assert_eq!(found.into_result("a", "file").unwrap(), 3);

        let missing: Lookup<u32> = Lookup::NotFound;
        assert!(missing.clone().found().is_none());
        assert!(missing.into_result("a", "file").unwrap_err().is_not_found());

        let mismatch: Lookup<u32> = Lookup::TypeMismatch;
        assert!(matches!(
            mismatch.into_result("a", "directory"),
            Err(VfsError::TypeMismatch {
                expected: "directory",
                ..
            })
        ));
    }
}

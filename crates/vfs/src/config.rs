//! Filesystem configuration file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::VfsError;

/// Contents of a mount configuration file.
///
/// ```json
/// {
///   "profile": "default",
///   "mount_point": "/mnt/blobs",
///   "mount": { "live": { "blob_id": "D1" } }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilesystemConfig {
    /// Client profile used to reach the blob store.
    #[serde(default)]
    pub profile: String,
    /// Local directory the tree is mounted on.
    pub mount_point: PathBuf,
    /// Mount tree, see [`crate::MountNode`].
    pub mount: Value,
}

impl FilesystemConfig {
    /// Read a configuration file.
    ///
    /// # Arguments
    /// * `path` - Path of the JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, VfsError> {
        let path: &Path = path.as_ref();
        let contents: String = std::fs::read_to_string(path).map_err(|source| VfsError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    /// Parse a configuration from JSON text.
    pub fn from_json(contents: &str) -> Result<Self, VfsError> {
        Ok(serde_json::from_str(contents)?)
    }
}

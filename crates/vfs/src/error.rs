//! Error types for the VFS crate.

use std::path::PathBuf;

use blobmount_model::ModelError;
use blobmount_storage::StoreError;
use thiserror::Error;

/// Errors that can occur during mount resolution and filesystem operations.
#[derive(Debug, Error)]
pub enum VfsError {
    /// Path segment or object absent.
    #[error("No such file or directory: {path}")]
    NotFound {
        /// The path that could not be resolved.
        path: String,
    },

    /// Directory expected and file found, or the other way around.
    #[error("Expected a {expected} at {path}")]
    TypeMismatch {
        /// The path that resolved to the wrong kind.
        path: String,
        /// What the caller asked for ("file" or "directory").
        expected: &'static str,
    },

    /// Write attempted where no backing container can receive it.
    #[error("Permission denied: {path}")]
    PermissionDenied {
        /// The path being written.
        path: String,
    },

    /// Something already exists at the target path.
    #[error("Already exists: {path}")]
    AlreadyExists {
        /// The path that is taken.
        path: String,
    },

    /// Directory still has children.
    #[error("Directory not empty: {path}")]
    DirectoryNotEmpty {
        /// The directory path.
        path: String,
    },

    /// Rename preconditions were not met.
    #[error("Cannot move {from} to {to}")]
    CannotMove {
        /// Source path.
        from: String,
        /// Destination path.
        to: String,
    },

    /// Operation cannot be expressed against the remote model.
    #[error("Unsupported operation: {operation}")]
    Unsupported {
        /// Name of the operation.
        operation: &'static str,
    },

    /// Mount tree declares a node shape that is not understood.
    #[error("Invalid mount configuration: {reason}")]
    Configuration {
        /// What was wrong.
        reason: String,
    },

    /// Remote store call failed.
    #[error(transparent)]
    Remote(#[from] StoreError),

    /// Filter expression could not be parsed.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Configuration file could not be read.
    #[error("Failed to read config {path}: {source}")]
    ConfigIo {
        /// Path of the configuration file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid JSON for the expected shape.
    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

impl VfsError {
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    pub fn permission_denied(path: impl Into<String>) -> Self {
        Self::PermissionDenied { path: path.into() }
    }

    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// Whether this is a "no such file or directory" condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, VfsError::NotFound { .. })
    }
}

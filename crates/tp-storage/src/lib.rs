//! # tp-storage
//!
//! Remote storage seam for training jobs.
//!
//! Job directories live on remote storage; the training driver stages
//! them locally, runs the trainer against the staging copy, and pushes
//! results back. [`RemoteStorage`] is that seam: [`LocalStorage`] backs
//! it with a plain directory tree for single-machine deployments and
//! tests, [`ObjectStorage`] with any `object_store` backend (S3 and
//! compatible stores).

pub mod local;
pub mod object;

pub use local::LocalStorage;
pub use object::ObjectStorage;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

/// Errors from storage staging and sync.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Local filesystem operation failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Remote object store operation failed.
    #[error(transparent)]
    Object(#[from] object_store::Error),

    /// A path escaped the staging root or is not valid for the backend.
    #[error("invalid storage path: {0}")]
    InvalidPath(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// File-name filter for [`RemoteStorage::sync`].
#[derive(Debug, Clone, Default)]
pub struct SyncFilter {
    /// Only sync files whose name contains this substring.
    pub include_substring: Option<String>,
}

impl SyncFilter {
    /// A filter that passes every file.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            include_substring: None,
        }
    }

    /// A filter that passes only names containing `needle`.
    #[must_use]
    pub fn containing(needle: impl Into<String>) -> Self {
        Self {
            include_substring: Some(needle.into()),
        }
    }

    /// Whether a file name passes the filter.
    #[must_use]
    pub fn matches(&self, file_name: &str) -> bool {
        self.include_substring
            .as_deref()
            .is_none_or(|needle| file_name.contains(needle))
    }
}

/// Remote storage for job directories.
///
/// `remote` arguments are backend-native locations (a directory path for
/// [`LocalStorage`], an object key prefix for [`ObjectStorage`]); local
/// arguments always point into the backend's staging root.
#[async_trait]
pub trait RemoteStorage: Send + Sync {
    /// Stage a remote directory locally and return the staging path.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the remote tree cannot be read or the
    /// staging copy fails.
    async fn download(&self, remote: &str) -> Result<PathBuf, StorageError>;

    /// Upload a local directory tree to a remote location.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if any file fails to transfer.
    async fn upload(&self, local: &Path, remote: &str) -> Result<(), StorageError>;

    /// Upload the subset of a local tree whose file names pass `filter`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if any selected file fails to transfer.
    async fn sync(&self, local: &Path, remote: &str, filter: &SyncFilter)
    -> Result<(), StorageError>;

    /// Delete a staging directory created by [`download`](Self::download).
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidPath` if `local` is outside the
    /// staging root, or `StorageError::Io` if removal fails.
    async fn remove_temporary(&self, local: &Path) -> Result<(), StorageError>;

    /// Join a remote base location with a child segment.
    fn resolve(&self, base: &str, segment: &str) -> String;
}

/// Collect every file under `root`, depth-first, with paths relative to it.
pub(crate) async fn walk_files(root: &Path) -> Result<Vec<(PathBuf, String)>, StorageError> {
    let mut stack = vec![root.to_path_buf()];
    let mut files = Vec::new();
    while let Some(dir) = stack.pop() {
        let mut entries = tokio::fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if entry.file_type().await?.is_dir() {
                stack.push(path);
            } else {
                let relative = path
                    .strip_prefix(root)
                    .map_err(|_| StorageError::InvalidPath(path.display().to_string()))?
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                files.push((path, relative));
            }
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_passes_everything() {
        let filter = SyncFilter::all();
        assert!(filter.matches("model.pth"));
        assert!(filter.matches("events.out.tfevents.12345"));
    }

    #[test]
    fn substring_filter_is_selective() {
        let filter = SyncFilter::containing("tfevents");
        assert!(filter.matches("events.out.tfevents.12345"));
        assert!(!filter.matches("model.pth"));
    }
}

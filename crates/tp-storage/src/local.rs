//! Directory-tree backend for single-machine deployments and tests.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::{RemoteStorage, StorageError, SyncFilter, walk_files};

/// A [`RemoteStorage`] where "remote" locations are plain directories.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    staging_root: PathBuf,
}

impl LocalStorage {
    /// Create a backend staging under `staging_root`.
    pub fn new(staging_root: impl Into<PathBuf>) -> Self {
        Self {
            staging_root: staging_root.into(),
        }
    }

    fn staging_dir_for(&self, remote: &str) -> Result<PathBuf, StorageError> {
        let name = Path::new(remote)
            .file_name()
            .ok_or_else(|| StorageError::InvalidPath(remote.to_string()))?;
        Ok(self.staging_root.join(name))
    }
}

async fn copy_tree(from: &Path, to: &Path) -> Result<(), StorageError> {
    tokio::fs::create_dir_all(to).await?;
    if !tokio::fs::try_exists(from).await? {
        return Ok(());
    }
    for (path, relative) in walk_files(from).await? {
        let dest = to.join(&relative);
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::copy(&path, &dest).await?;
    }
    Ok(())
}

#[async_trait]
impl RemoteStorage for LocalStorage {
    async fn download(&self, remote: &str) -> Result<PathBuf, StorageError> {
        let dest = self.staging_dir_for(remote)?;
        debug!(remote, staging = %dest.display(), "staging job directory");
        copy_tree(Path::new(remote), &dest).await?;
        Ok(dest)
    }

    async fn upload(&self, local: &Path, remote: &str) -> Result<(), StorageError> {
        copy_tree(local, Path::new(remote)).await
    }

    async fn sync(
        &self,
        local: &Path,
        remote: &str,
        filter: &SyncFilter,
    ) -> Result<(), StorageError> {
        let dest_root = Path::new(remote);
        tokio::fs::create_dir_all(dest_root).await?;
        for (path, relative) in walk_files(local).await? {
            let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
            if !filter.matches(&name) {
                continue;
            }
            let dest = dest_root.join(&relative);
            if let Some(parent) = dest.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::copy(&path, &dest).await?;
        }
        Ok(())
    }

    async fn remove_temporary(&self, local: &Path) -> Result<(), StorageError> {
        if !local.starts_with(&self.staging_root) {
            return Err(StorageError::InvalidPath(local.display().to_string()));
        }
        tokio::fs::remove_dir_all(local).await?;
        Ok(())
    }

    fn resolve(&self, base: &str, segment: &str) -> String {
        format!("{}/{segment}", base.trim_end_matches('/'))
    }
}

//! `object_store`-backed remote storage.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use object_store::path::Path as ObjectPath;
use object_store::{ObjectStore, PutPayload};
use tracing::debug;

use crate::{RemoteStorage, StorageError, SyncFilter, walk_files};

/// A [`RemoteStorage`] over any `object_store` backend.
///
/// Remote locations are object key prefixes within the configured store.
#[derive(Debug, Clone)]
pub struct ObjectStorage {
    store: Arc<dyn ObjectStore>,
    staging_root: PathBuf,
}

impl ObjectStorage {
    /// Create a backend over `store`, staging under `staging_root`.
    pub fn new(store: Arc<dyn ObjectStore>, staging_root: impl Into<PathBuf>) -> Self {
        Self {
            store,
            staging_root: staging_root.into(),
        }
    }

    /// Create an S3 backend from ambient AWS credentials.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the builder rejects the environment
    /// configuration.
    pub fn s3(bucket: &str, staging_root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let store = object_store::aws::AmazonS3Builder::from_env()
            .with_bucket_name(bucket)
            .build()?;
        Ok(Self::new(Arc::new(store), staging_root))
    }

    fn staging_dir_for(&self, remote: &str) -> Result<PathBuf, StorageError> {
        let name = remote
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| StorageError::InvalidPath(remote.to_string()))?;
        Ok(self.staging_root.join(name))
    }

    async fn put_file(&self, path: &Path, key: &str) -> Result<(), StorageError> {
        let content = tokio::fs::read(path).await?;
        self.store
            .put(&ObjectPath::from(key), PutPayload::from(content))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl RemoteStorage for ObjectStorage {
    async fn download(&self, remote: &str) -> Result<PathBuf, StorageError> {
        let dest = self.staging_dir_for(remote)?;
        tokio::fs::create_dir_all(&dest).await?;
        debug!(remote, staging = %dest.display(), "staging job directory");

        let prefix = ObjectPath::from(remote.trim_matches('/'));
        let mut listing = self.store.list(Some(&prefix));
        while let Some(meta) = listing.try_next().await? {
            let relative = meta
                .location
                .as_ref()
                .strip_prefix(prefix.as_ref())
                .unwrap_or(meta.location.as_ref())
                .trim_start_matches('/');
            let local = dest.join(relative);
            if let Some(parent) = local.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            let content = self.store.get(&meta.location).await?.bytes().await?;
            tokio::fs::write(&local, content).await?;
        }
        Ok(dest)
    }

    async fn upload(&self, local: &Path, remote: &str) -> Result<(), StorageError> {
        let base = remote.trim_matches('/');
        for (path, relative) in walk_files(local).await? {
            self.put_file(&path, &format!("{base}/{relative}")).await?;
        }
        Ok(())
    }

    async fn sync(
        &self,
        local: &Path,
        remote: &str,
        filter: &SyncFilter,
    ) -> Result<(), StorageError> {
        let base = remote.trim_matches('/');
        for (path, relative) in walk_files(local).await? {
            let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
            if !filter.matches(&name) {
                continue;
            }
            self.put_file(&path, &format!("{base}/{relative}")).await?;
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

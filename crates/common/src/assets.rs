//! Physical storage for uploaded objects and their thumbnails.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use serde::{Deserialize, Serialize};

/// Prefix for uploaded objects.
pub const OBJECT_PREFIX: &str = "root";
/// Prefix for derived thumbnails.
pub const THUMBNAIL_PREFIX: &str = "thumbnails";

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("object storage error: {0}")]
    ObjectStore(#[from] object_store::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("invalid storage name: {0}")]
    InvalidName(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Writes and removes physical bytes by storage name.
///
/// Removals treat a missing object as success.
#[async_trait]
pub trait AssetGateway: Send + Sync + std::fmt::Debug {
    async fn write_object(&self, name: &str, bytes: Bytes) -> Result<(), AssetError>;
    async fn read_object(&self, name: &str) -> Result<Bytes, AssetError>;
    async fn remove_object(&self, name: &str) -> Result<(), AssetError>;

    async fn write_thumbnail(&self, name: &str, bytes: Bytes) -> Result<(), AssetError>;
    async fn read_thumbnail(&self, name: &str) -> Result<Bytes, AssetError>;
    async fn remove_thumbnail(&self, name: &str) -> Result<(), AssetError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssetStoreConfig {
    /// In-memory storage (for testing)
    #[default]
    Memory,
    /// Local filesystem storage rooted at `path`
    Local { path: PathBuf },
}

/// [`AssetGateway`] over any [`ObjectStore`] backend.
#[derive(Debug, Clone)]
pub struct ObjectAssets {
    inner: Arc<dyn ObjectStore>,
}

impl ObjectAssets {
    pub async fn new(config: &AssetStoreConfig) -> Result<Self, AssetError> {
        let inner: Arc<dyn ObjectStore> = match config {
            AssetStoreConfig::Memory => Arc::new(InMemory::new()),
            AssetStoreConfig::Local { path } => {
                tokio::fs::create_dir_all(path).await?;
                Arc::new(
                    LocalFileSystem::new_with_prefix(path)
                        .map_err(|e| AssetError::InvalidConfig(e.to_string()))?,
                )
            }
        };
        Ok(Self { inner })
    }

    pub fn memory() -> Self {
        Self {
            inner: Arc::new(InMemory::new()),
        }
    }

    fn object_path(prefix: &str, name: &str) -> Result<ObjectPath, AssetError> {
        if name.is_empty() || name.contains('/') || name == "." || name == ".." {
            return Err(AssetError::InvalidName(name.to_string()));
        }
        Ok(ObjectPath::from(format!("{}/{}", prefix, name)))
    }

    async fn put(&self, prefix: &str, name: &str, bytes: Bytes) -> Result<(), AssetError> {
        let path = Self::object_path(prefix, name)?;
        self.inner.put(&path, bytes.into()).await?;
        tracing::debug!(%path, "stored object");
        Ok(())
    }

    async fn get(&self, prefix: &str, name: &str) -> Result<Bytes, AssetError> {
        let path = Self::object_path(prefix, name)?;
        match self.inner.get(&path).await {
            Ok(result) => Ok(result.bytes().await?),
            Err(object_store::Error::NotFound { .. }) => {
                Err(AssetError::NotFound(path.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, prefix: &str, name: &str) -> Result<(), AssetError> {
        let path = Self::object_path(prefix, name)?;
        match self.inner.delete(&path).await {
            Ok(()) => {
                tracing::debug!(%path, "removed object");
                Ok(())
            }
            Err(object_store::Error::NotFound { .. }) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl AssetGateway for ObjectAssets {
    async fn write_object(&self, name: &str, bytes: Bytes) -> Result<(), AssetError> {
        self.put(OBJECT_PREFIX, name, bytes).await
    }

    async fn read_object(&self, name: &str) -> Result<Bytes, AssetError> {
        self.get(OBJECT_PREFIX, name).await
    }

    async fn remove_object(&self, name: &str) -> Result<(), AssetError> {
        self.delete(OBJECT_PREFIX, name).await
    }

    async fn write_thumbnail(&self, name: &str, bytes: Bytes) -> Result<(), AssetError> {
        self.put(THUMBNAIL_PREFIX, name, bytes).await
    }

    async fn read_thumbnail(&self, name: &str) -> Result<Bytes, AssetError> {
        self.get(THUMBNAIL_PREFIX, name).await
    }

    async fn remove_thumbnail(&self, name: &str) -> Result<(), AssetError> {
        self.delete(THUMBNAIL_PREFIX, name).await
    }
}

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::NamedTempFile;

use super::Manifest;

pub const MANIFEST_FILE_NAME: &str = "manifest.json";

/// Where a [`Manifest`] is loaded from and saved to.
#[async_trait]
pub trait ManifestBackend: Send + Sync + std::fmt::Debug {
    /// Read the manifest, initializing an empty one if none exists.
    async fn load(&self) -> Result<Manifest, StoreError>;
    /// Replace the persisted manifest with `manifest`.
    async fn save(&self, manifest: &Manifest) -> Result<(), StoreError>;
}

/// Persists a [`Manifest`] as a single JSON document.
///
/// Every save rewrites the whole tree: the document is written to a
/// temporary file next to the target and renamed over it, so readers see
/// either the old or the new tree, never a torn one.
#[derive(Debug, Clone)]
pub struct ManifestStore {
    path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("manifest at {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to read manifest at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to persist manifest to {path}: {source}")]
    Persistence {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to serialize manifest: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("manifest write task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ManifestStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// A store at `<dir>/manifest.json`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(MANIFEST_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the manifest, creating and persisting an empty one if none
    /// exists yet.
    pub async fn load(&self) -> Result<Manifest, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Manifest::from_json(&bytes).map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "initializing empty manifest");
                let manifest = Manifest::new();
                self.save(&manifest).await?;
                Ok(manifest)
            }
            Err(source) => Err(StoreError::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }

    pub async fn save(&self, manifest: &Manifest) -> Result<(), StoreError> {
        let bytes = manifest.to_json_pretty()?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || {
            write_atomic(&path, &bytes).map_err(|source| StoreError::Persistence { path, source })
        })
        .await??;
        tracing::debug!(path = %self.path.display(), "manifest saved");
        Ok(())
    }
}

#[async_trait]
impl ManifestBackend for ManifestStore {
    async fn load(&self) -> Result<Manifest, StoreError> {
        ManifestStore::load(self).await
    }

    async fn save(&self, manifest: &Manifest) -> Result<(), StoreError> {
        ManifestStore::save(self, manifest).await
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|err| err.error)?;
    Ok(())
}

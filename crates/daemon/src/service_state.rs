use std::sync::Arc;

use common::prelude::{AssetError, FileManager, FileManagerError, ManifestStore, ObjectAssets};

use crate::ServiceConfig;

/// Main service state, shared by every request handler
#[derive(Clone)]
pub struct State {
    files: FileManager,
}

impl State {
    pub async fn from_config(config: &ServiceConfig) -> Result<Self, StateSetupError> {
        tokio::fs::create_dir_all(&config.data_dir).await?;

        let assets = ObjectAssets::new(&config.asset_store).await?;
        let store = ManifestStore::in_dir(&config.data_dir);
        tracing::info!(
            manifest = %store.path().display(),
            assets = ?config.asset_store,
            "opening file manager"
        );

        let files = FileManager::new(store, Arc::new(assets));
        files.check().await?;
        Ok(Self { files })
    }

    pub fn files(&self) -> &FileManager {
        &self.files
    }
}

impl From<FileManager> for State {
    fn from(files: FileManager) -> Self {
        Self { files }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("failed to prepare data directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to set up asset store: {0}")]
    Assets(#[from] AssetError),
    #[error("failed to load manifest: {0}")]
    FileManager(#[from] FileManagerError),
}

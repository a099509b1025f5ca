use std::path::PathBuf;

use common::prelude::AssetStoreConfig;

#[derive(Debug, Clone)]
pub struct Config {
    // storage configuration
    /// directory holding `manifest.json`
    pub data_dir: PathBuf,
    /// where uploaded objects and thumbnails are written
    pub asset_store: AssetStoreConfig,

    // http server configuration
    /// Port for the API HTTP server
    pub api_port: u16,
    /// Largest accepted request body, in bytes
    pub max_upload_bytes: usize,

    // logging
    pub log_level: tracing::Level,
    /// Directory for log files (optional, logs to stdout only if not set)
    pub log_dir: Option<PathBuf>,
}

impl Config {
    /// Objects stored under `<data_dir>/uploads` on the local filesystem.
    pub fn local(data_dir: PathBuf) -> Self {
        let asset_store = AssetStoreConfig::Local {
            path: data_dir.join(common::file_manager::UPLOADS_DIR),
        };
        Self {
            data_dir,
            asset_store,
            api_port: 5001,
            max_upload_bytes: crate::state::DEFAULT_MAX_UPLOAD_BYTES,
            log_level: tracing::Level::INFO,
            log_dir: None,
        }
    }
}

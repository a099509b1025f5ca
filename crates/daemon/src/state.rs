use std::{fs, path::PathBuf};

use serde::{Deserialize, Serialize};

pub const APP_NAME: &str = "stash";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DATA_DIR_NAME: &str = "data";
pub const LOGS_DIR_NAME: &str = "logs";

/// Matches the multipart file size limit clients expect (50 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Port for the API server
    #[serde(default = "default_api_port")]
    pub api_port: u16,
    /// Where the manifest and uploads live (defaults to <stash_dir>/data)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Largest accepted request body, in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    /// Default log level when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_api_port() -> u16 {
    5001
}

fn default_max_upload_bytes() -> usize {
    DEFAULT_MAX_UPLOAD_BYTES
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_port: default_api_port(),
            data_dir: None,
            max_upload_bytes: default_max_upload_bytes(),
            log_level: default_log_level(),
        }
    }
}

impl AppConfig {
    pub fn log_level(&self) -> Result<tracing::Level, StateError> {
        self.log_level
            .parse()
            .map_err(|_| StateError::InvalidLogLevel(self.log_level.clone()))
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the stash directory (~/.stash)
    pub stash_dir: PathBuf,
    /// Path to the data directory (manifest + uploads)
    pub data_dir: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the stash directory path (custom or default ~/.stash)
    pub fn stash_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Initialize a new stash state directory
    pub fn init(
        custom_path: Option<PathBuf>,
        config: Option<AppConfig>,
    ) -> Result<Self, StateError> {
        let stash_dir = Self::stash_dir(custom_path)?;
        let config_path = stash_dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Err(StateError::AlreadyInitialized);
        }

        fs::create_dir_all(&stash_dir)?;

        let config = config.unwrap_or_default();
        let data_dir = Self::resolve_data_dir(&stash_dir, &config);
        fs::create_dir_all(&data_dir)?;

        let config_toml = toml::to_string_pretty(&config)?;
        fs::write(&config_path, config_toml)?;

        Ok(Self {
            stash_dir,
            data_dir,
            config_path,
            config,
        })
    }

    /// Load existing state from the stash directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let stash_dir = Self::stash_dir(custom_path)?;
        let config_path = stash_dir.join(CONFIG_FILE_NAME);

        if !stash_dir.exists() {
            return Err(StateError::NotInitialized);
        }
        if !config_path.exists() {
            return Err(StateError::MissingFile(CONFIG_FILE_NAME.to_string()));
        }

        let config_toml = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&config_toml)?;
        config.log_level()?;
        let data_dir = Self::resolve_data_dir(&stash_dir, &config);

        Ok(Self {
            stash_dir,
            data_dir,
            config_path,
            config,
        })
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.stash_dir.join(LOGS_DIR_NAME)
    }

    fn resolve_data_dir(stash_dir: &std::path::Path, config: &AppConfig) -> PathBuf {
        match &config.data_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => stash_dir.join(dir),
            None => stash_dir.join(DATA_DIR_NAME),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("stash directory not initialized. Run 'stash init' first")]
    NotInitialized,

    #[error("stash directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("missing required file: {0}")]
    MissingFile(String),

    #[error("invalid log level: {0}")]
    InvalidLogLevel(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

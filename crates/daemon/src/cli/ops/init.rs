use std::path::PathBuf;

use clap::Args;

use stash_daemon::state::{AppConfig, AppState, StateError};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// Port for the API server
    #[arg(long)]
    pub api_port: Option<u16>,

    /// Directory for the manifest and uploads (relative paths are
    /// resolved against the stash directory)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Init {
    type Error = StateError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut config = AppConfig::default();
        if let Some(port) = self.api_port {
            config.api_port = port;
        }
        config.data_dir = self.data_dir.clone();

        let state = AppState::init(ctx.config_path.clone(), Some(config))?;

        Ok(format!(
            "Initialized stash at {}\n  config: {}\n  data:   {}\n  api:    http://localhost:{}",
            state.stash_dir.display(),
            state.config_path.display(),
            state.data_dir.display(),
            state.config.api_port
        ))
    }
}

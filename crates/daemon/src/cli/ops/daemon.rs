use clap::Args;

use stash_daemon::state::{AppState, StateError};
use stash_daemon::{spawn_service, ServiceConfig};

#[derive(Args, Debug, Clone)]
pub struct Daemon {
    /// Override API server port (default from config)
    #[arg(long)]
    pub api_port: Option<u16>,

    /// Directory for log files (logs to stdout only if not set)
    #[arg(long)]
    pub log_dir: Option<std::path::PathBuf>,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Daemon {
    type Error = StateError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let state = AppState::load(ctx.config_path.clone())?;

        let mut config = ServiceConfig::local(state.data_dir.clone());
        config.api_port = self.api_port.unwrap_or(state.config.api_port);
        config.max_upload_bytes = state.config.max_upload_bytes;
        config.log_level = state.config.log_level()?;
        config.log_dir = self.log_dir.clone();

        spawn_service(&config).await;
        Ok("daemon ended".to_string())
    }
}

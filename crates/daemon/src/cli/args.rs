pub use clap::Parser;

use std::path::PathBuf;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "stash")]
#[command(about = "Manage a manifest-backed file store")]
pub struct Args {
    /// Daemon API URL (defaults to the port in the config, then 5001)
    #[arg(long, global = true)]
    pub remote: Option<Url>,

    /// Path to the stash config directory (defaults to ~/.stash)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: crate::Command,
}

use clap::{Args, Subcommand};

pub mod ls;
pub mod mkdir;
pub mod mv;
pub mod rm;
pub mod stat;
pub mod upload;

use crate::cli::op::Op;
use stash_daemon::http_server::api::v0::fs::{
    LsRequest, MkdirRequest, MvRequest, RmRequest, StatRequest,
};

crate::command_enum! {
    (Ls, LsRequest),
    (Stat, StatRequest),
    (Mkdir, MkdirRequest),
    (Mv, MvRequest),
    (Rm, RmRequest),
    (Upload, upload::Upload),
}

pub type FsCommand = Command;

/// Browse and edit the daemon's file tree
#[derive(Args, Debug, Clone)]
pub struct Fs {
    #[command(subcommand)]
    pub command: FsCommand,
}

#[async_trait::async_trait]
impl Op for Fs {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}

use stash_daemon::http_server::api::client::ApiError;
use stash_daemon::http_server::api::v0::fs::{MkdirRequest, MkdirResponse};

#[async_trait::async_trait]
impl crate::cli::op::Op for MkdirRequest {
    type Error = ApiError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let response: MkdirResponse = ctx.client.call(self.clone()).await?;
        if response.created {
            Ok(format!("created {}", response.path))
        } else {
            Ok(format!("{} already exists", response.path))
        }
    }
}

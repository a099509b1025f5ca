use stash_daemon::http_server::api::client::ApiError;
use stash_daemon::http_server::api::v0::fs::{MvRequest, MvResponse};

#[async_trait::async_trait]
impl crate::cli::op::Op for MvRequest {
    type Error = ApiError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let response: MvResponse = ctx.client.call(self.clone()).await?;
        Ok(format!("{} -> {}", response.source, response.destination))
    }
}

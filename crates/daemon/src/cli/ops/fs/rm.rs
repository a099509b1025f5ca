use stash_daemon::http_server::api::client::ApiError;
use stash_daemon::http_server::api::v0::fs::{RmRequest, RmResponse};

#[async_trait::async_trait]
impl crate::cli::op::Op for RmRequest {
    type Error = ApiError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let response: RmResponse = ctx.client.call(self.clone()).await?;
        let mut output = format!(
            "removed {} ({} stored objects)",
            response.path, response.attempted
        );
        if response.failed > 0 {
            output.push_str(&format!(
                "\nwarning: {} objects could not be deleted and were left behind",
                response.failed
            ));
        }
        Ok(output)
    }
}

use stash_daemon::http_server::api::client::ApiError;
use stash_daemon::http_server::api::v0::fs::StatRequest;

#[async_trait::async_trait]
impl crate::cli::op::Op for StatRequest {
    type Error = ApiError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let file = ctx.client.call(self.clone()).await?;

        let mut lines = vec![
            format!("path:   {}", self.path),
            format!("stored: {}", file.filename()),
            format!("size:   {} bytes", file.size()),
        ];
        if let Some(image) = file.image() {
            if let Some(thumbnail) = &image.thumbnail {
                lines.push(format!("thumb:  {}", thumbnail));
            }
            if let (Some(width), Some(height)) = (image.width, image.height) {
                lines.push(format!("dims:   {}x{}", width, height));
            }
        }
        Ok(lines.join("\n"))
    }
}

use std::path::PathBuf;

use bytes::Bytes;
use clap::Args;

use stash_daemon::http_server::api::client::ApiError;
use stash_daemon::http_server::api::v0::fs::UploadRequest;

#[derive(Args, Debug, Clone)]
pub struct Upload {
    /// Local file to upload
    pub file: PathBuf,

    /// Destination directory (defaults to root)
    #[arg(long, default_value = "root")]
    pub path: String,

    /// Name to store the file under (defaults to the local file name)
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error("failed to read {0}: {1}")]
    Read(PathBuf, std::io::Error),
    #[error("cannot derive a file name from {0}")]
    NoFileName(PathBuf),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Upload {
    type Error = UploadError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let filename = match &self.name {
            Some(name) => name.clone(),
            None => self
                .file
                .file_name()
                .and_then(|name| name.to_str())
                .map(str::to_string)
                .ok_or_else(|| UploadError::NoFileName(self.file.clone()))?,
        };
        let bytes = tokio::fs::read(&self.file)
            .await
            .map_err(|e| UploadError::Read(self.file.clone(), e))?;
        let content_type = mime_guess::from_path(&self.file)
            .first()
            .map(|mime| mime.essence_str().to_string());

        let request = UploadRequest {
            path: self.path.clone(),
            filename: filename.clone(),
            content_type,
            bytes: Bytes::from(bytes),
        };
        let file = ctx.client.call(request).await?;

        let mut output = format!(
            "uploaded {} ({} bytes) as {}",
            filename,
            file.size(),
            file.filename()
        );
        if let Some(thumbnail) = file.thumbnail() {
            output.push_str(&format!(", thumbnail {}", thumbnail));
        }
        Ok(output)
    }
}

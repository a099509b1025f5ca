use stash_daemon::http_server::api::client::ApiError;
use stash_daemon::http_server::api::v0::fs::LsRequest;

use common::manifest::EntryKind;

#[async_trait::async_trait]
impl crate::cli::op::Op for LsRequest {
    type Error = ApiError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let entries = ctx.client.call(self.clone()).await?;
        if entries.is_empty() {
            return Ok(format!("{} is empty", self.path));
        }

        let lines = entries
            .iter()
            .map(|entry| match entry.kind {
                EntryKind::Dir => format!("{}/", entry.name),
                EntryKind::File => match entry.size {
                    Some(size) => format!("{}  {} bytes", entry.name, size),
                    None => entry.name.clone(),
                },
            })
            .collect::<Vec<_>>();
        Ok(lines.join("\n"))
    }
}

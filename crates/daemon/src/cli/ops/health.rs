use std::convert::Infallible;

use clap::Args;

use stash_daemon::state::AppState;

#[derive(Args, Debug, Clone)]
pub struct Health;

#[async_trait::async_trait]
impl crate::cli::op::Op for Health {
    type Error = Infallible;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut lines = vec!["Config:".to_string()];
        match AppState::load(ctx.config_path.clone()) {
            Ok(state) => {
                let manifest = state.data_dir.join(common::manifest::MANIFEST_FILE_NAME);
                lines.push(format!("  directory:     {}", state.stash_dir.display()));
                lines.push(format!("  data:          {}", state.data_dir.display()));
                lines.push(format!(
                    "  manifest.json: {}",
                    if manifest.exists() { "OK" } else { "not created yet" }
                ));
                lines.push(format!("  api_port:      {}", state.config.api_port));
            }
            Err(e) => lines.push(format!("  error: {}", e)),
        }

        let base = ctx.client.base_url();
        lines.push(String::new());
        lines.push(format!("Daemon ({}):", base));

        for route in ["livez", "readyz"] {
            let status = match base.join(&format!("/_status/{}", route)) {
                Ok(url) => match ctx.client.http_client().get(url).send().await {
                    Ok(resp) if resp.status().is_success() => "OK".to_string(),
                    Ok(resp) => format!("UNHEALTHY ({})", resp.status()),
                    Err(_) => "NOT REACHABLE".to_string(),
                },
                Err(e) => format!("bad url: {}", e),
            };
            lines.push(format!("  {:<7} {}", format!("{}:", route), status));
        }

        Ok(lines.join("\n"))
    }
}

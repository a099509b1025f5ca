use std::error::Error;
use std::path::PathBuf;

use url::Url;

use stash_daemon::http_server::api::client::{ApiClient, ApiError};
use stash_daemon::state::AppState;

/// Pick the daemon URL: `--remote`, else the port from config.toml,
///  else localhost:5001.
pub fn resolve_remote(explicit: Option<Url>, config_path: Option<PathBuf>) -> Url {
    if let Some(url) = explicit {
        return url;
    }
    AppState::load(config_path)
        .ok()
        .and_then(|state| Url::parse(&format!("http://localhost:{}", state.config.api_port)).ok())
        .unwrap_or_else(|| Url::parse("http://localhost:5001").expect("hardcoded URL must parse"))
}

#[derive(Clone)]
pub struct OpContext {
    pub client: ApiClient,
    /// Custom stash directory, if one was given
    pub config_path: Option<PathBuf>,
}

impl OpContext {
    pub fn new(remote: Url, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        Ok(Self {
            client: ApiClient::new(&remote)?,
            config_path,
        })
    }
}

#[async_trait::async_trait]
pub trait Op: Send + Sync {
    type Error: Error + Send + Sync + 'static;
    type Output;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error>;
}

/// Generate a `Command` subcommand enum over the given ops, plus the
///  matching `OpOutput`/`OpError` enums and an `Op` impl dispatching to
///  each variant.
#[macro_export]
macro_rules! command_enum {
    ($(($variant:ident, $type:ty)),* $(,)?) => {
        #[derive(Subcommand, Debug, Clone)]
        pub enum Command {
            $($variant($type),)*
        }

        #[derive(Debug)]
        pub enum OpOutput {
            $($variant(<$type as $crate::cli::op::Op>::Output),)*
        }

        #[derive(Debug, thiserror::Error)]
        pub enum OpError {
            $(
                #[error(transparent)]
                $variant(<$type as $crate::cli::op::Op>::Error),
            )*
        }

        #[async_trait::async_trait]
        impl $crate::cli::op::Op for Command {
            type Output = OpOutput;
            type Error = OpError;

            async fn execute(&self, ctx: &$crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
                match self {
                    $(
                        Command::$variant(op) => op
                            .execute(ctx)
                            .await
                            .map(OpOutput::$variant)
                            .map_err(OpError::$variant),
                    )*
                }
            }
        }

        impl std::fmt::Display for OpOutput {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(OpOutput::$variant(output) => write!(f, "{}", output),)*
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use stash_daemon::AppConfig;

    #[test]
    fn test_explicit_remote_wins() {
        let explicit = Url::parse("http://example.com:9999").unwrap();
        assert_eq!(resolve_remote(Some(explicit.clone()), None), explicit);
    }

    #[test]
    fn test_remote_from_config_port() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            api_port: 7123,
            ..AppConfig::default()
        };
        AppState::init(Some(dir.path().to_path_buf()), Some(config)).unwrap();

        let remote = resolve_remote(None, Some(dir.path().to_path_buf()));
        assert_eq!(remote.as_str(), "http://localhost:7123/");
    }

    #[test]
    fn test_remote_without_config() {
        let remote = resolve_remote(None, Some(PathBuf::from("/nonexistent")));
        assert_eq!(remote.port(), Some(5001));
    }
}

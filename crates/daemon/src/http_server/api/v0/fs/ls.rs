use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::{Entry, FileManagerError};

use super::error::file_manager_response;
use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct LsRequest {
    /// Directory to list (defaults to root)
    #[serde(default = "super::default_path")]
    #[arg(default_value = "root")]
    pub path: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Query(req): Query<LsRequest>,
) -> Result<impl IntoResponse, LsError> {
    let entries = state.files().ls(&req.path).await?;
    Ok((http::StatusCode::OK, Json(entries)))
}

#[derive(Debug, thiserror::Error)]
pub enum LsError {
    #[error(transparent)]
    FileManager(#[from] FileManagerError),
}

impl IntoResponse for LsError {
    fn into_response(self) -> Response {
        match self {
            LsError::FileManager(e) => file_manager_response(e),
        }
    }
}

impl ApiRequest for LsRequest {
    type Response = Vec<Entry>;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/api/v0/fs/ls")?;
        Ok(client.get(full_url).query(&self))
    }
}

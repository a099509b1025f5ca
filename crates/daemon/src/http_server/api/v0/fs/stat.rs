use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::{FileManagerError, FileNode};

use super::error::file_manager_response;
use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct StatRequest {
    /// Path of the file to describe
    pub path: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Query(req): Query<StatRequest>,
) -> Result<impl IntoResponse, StatError> {
    let file = state.files().stat(&req.path).await?;
    Ok((http::StatusCode::OK, Json(file)))
}

#[derive(Debug, thiserror::Error)]
pub enum StatError {
    #[error(transparent)]
    FileManager(#[from] FileManagerError),
}

impl IntoResponse for StatError {
    fn into_response(self) -> Response {
        match self {
            StatError::FileManager(e) => file_manager_response(e),
        }
    }
}

impl ApiRequest for StatRequest {
    type Response = FileNode;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/api/v0/fs/file")?;
        Ok(client.get(full_url).query(&self))
    }
}

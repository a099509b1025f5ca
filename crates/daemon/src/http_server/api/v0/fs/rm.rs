use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::FileManagerError;

use super::error::file_manager_response;
use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct RmRequest {
    /// File or directory to remove
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RmResponse {
    pub path: String,
    /// Physical removals attempted
    pub attempted: usize,
    /// Physical removals that failed; those objects are orphaned
    pub failed: usize,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Query(req): Query<RmRequest>,
) -> Result<impl IntoResponse, RmError> {
    let removed = state.files().rm(&req.path).await?;
    Ok((
        http::StatusCode::OK,
        Json(RmResponse {
            path: req.path,
            attempted: removed.attempted,
            failed: removed.failures.len(),
        }),
    ))
}

#[derive(Debug, thiserror::Error)]
pub enum RmError {
    #[error(transparent)]
    FileManager(#[from] FileManagerError),
}

impl IntoResponse for RmError {
    fn into_response(self) -> Response {
        match self {
            RmError::FileManager(e) => file_manager_response(e),
        }
    }
}

impl ApiRequest for RmRequest {
    type Response = RmResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/api/v0/fs/rm")?;
        Ok(client.delete(full_url).query(&self))
    }
}

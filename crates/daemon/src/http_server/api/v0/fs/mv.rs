use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::FileManagerError;

use super::error::file_manager_response;
use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct MvRequest {
    /// Existing file or directory
    pub source: String,
    /// New location; must not exist yet
    pub destination: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MvResponse {
    pub source: String,
    pub destination: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<MvRequest>,
) -> Result<impl IntoResponse, MvError> {
    state.files().mv(&req.source, &req.destination).await?;
    Ok((
        http::StatusCode::OK,
        Json(MvResponse {
            source: req.source,
            destination: req.destination,
        }),
    ))
}

#[derive(Debug, thiserror::Error)]
pub enum MvError {
    #[error(transparent)]
    FileManager(#[from] FileManagerError),
}

impl IntoResponse for MvError {
    fn into_response(self) -> Response {
        match self {
            MvError::FileManager(e) => file_manager_response(e),
        }
    }
}

impl ApiRequest for MvRequest {
    type Response = MvResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/api/v0/fs/mv")?;
        Ok(client.post(full_url).json(&self))
    }
}

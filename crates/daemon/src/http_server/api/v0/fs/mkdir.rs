use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::{FileManagerError, MkdirOutcome, PathKey};

use super::error::{error_response, file_manager_response};
use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct MkdirRequest {
    /// Directory to create, along with any missing parents
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MkdirResponse {
    pub path: String,
    pub created: bool,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Query(req): Query<MkdirRequest>,
) -> Result<impl IntoResponse, MkdirError> {
    let key = PathKey::parse(&req.path).map_err(FileManagerError::from)?;
    if key.is_root() {
        return Err(MkdirError::Root);
    }

    let outcome = state.files().mkdir(&req.path).await?;
    let (status, created) = match outcome {
        MkdirOutcome::Created => (http::StatusCode::CREATED, true),
        MkdirOutcome::AlreadyExists => (http::StatusCode::OK, false),
    };

    Ok((
        status,
        Json(MkdirResponse {
            path: key.to_string(),
            created,
        }),
    ))
}

#[derive(Debug, thiserror::Error)]
pub enum MkdirError {
    #[error("a directory path is required")]
    Root,
    #[error(transparent)]
    FileManager(#[from] FileManagerError),
}

impl IntoResponse for MkdirError {
    fn into_response(self) -> Response {
        match self {
            MkdirError::Root => error_response(http::StatusCode::BAD_REQUEST, MkdirError::Root),
            MkdirError::FileManager(e) => file_manager_response(e),
        }
    }
}

impl ApiRequest for MkdirRequest {
    type Response = MkdirResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/api/v0/fs/mkdir")?;
        Ok(client.post(full_url).query(&self))
    }
}

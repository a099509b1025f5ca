use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use common::prelude::FileManagerError;

use super::error::file_manager_response;
use crate::ServiceState;

#[derive(Debug, Deserialize)]
pub struct ThumbnailQuery {
    pub path: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Query(query): Query<ThumbnailQuery>,
) -> Result<impl IntoResponse, ThumbnailError> {
    let bytes = state.files().thumbnail(&query.path).await?;
    Ok((
        http::StatusCode::OK,
        [(header::CONTENT_TYPE, "image/webp")],
        bytes,
    ))
}

#[derive(Debug, thiserror::Error)]
pub enum ThumbnailError {
    #[error(transparent)]
    FileManager(#[from] FileManagerError),
}

impl IntoResponse for ThumbnailError {
    fn into_response(self) -> Response {
        match self {
            ThumbnailError::FileManager(e) => file_manager_response(e),
        }
    }
}

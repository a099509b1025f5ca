use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use common::prelude::{FileManagerError, PathKey};

use super::error::{error_response, file_manager_response};
use crate::ServiceState;

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    pub path: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Query(query): Query<DownloadQuery>,
) -> Result<impl IntoResponse, DownloadError> {
    // a comma means several paths were joined into one parameter
    if query.path.contains(',') {
        return Err(DownloadError::MultiplePaths);
    }

    let (file, bytes) = state.files().download(&query.path).await?;
    let name = PathKey::parse(&query.path)
        .ok()
        .and_then(|key| key.file_name().map(str::to_string))
        .unwrap_or_else(|| file.filename().to_string())
        .replace('"', "");

    Ok((
        http::StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", name),
            ),
        ],
        bytes,
    ))
}

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("only a single file can be downloaded")]
    MultiplePaths,
    #[error(transparent)]
    FileManager(#[from] FileManagerError),
}

impl IntoResponse for DownloadError {
    fn into_response(self) -> Response {
        match self {
            DownloadError::MultiplePaths => {
                error_response(http::StatusCode::UNPROCESSABLE_ENTITY, self)
            }
            DownloadError::FileManager(e @ FileManagerError::NotAFile(_)) => {
                error_response(http::StatusCode::UNPROCESSABLE_ENTITY, e)
            }
            DownloadError::FileManager(e) => file_manager_response(e),
        }
    }
}

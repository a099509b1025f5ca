use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use common::prelude::{AssetError, FileManagerError, ManifestError};

/// `{"err": message}` with the given status.
pub(super) fn error_response(status: StatusCode, message: impl std::fmt::Display) -> Response {
    let body = serde_json::json!({"err": message.to_string()});
    (status, Json(body)).into_response()
}

pub(super) fn status_of(err: &FileManagerError) -> StatusCode {
    match err {
        FileManagerError::Path(_) => StatusCode::BAD_REQUEST,
        FileManagerError::Manifest(ManifestError::NotFound(_)) => StatusCode::NOT_FOUND,
        FileManagerError::Manifest(_) => StatusCode::BAD_REQUEST,
        FileManagerError::NotAFile(_) | FileManagerError::IsADirectory(_) => {
            StatusCode::BAD_REQUEST
        }
        FileManagerError::NoThumbnail(_) => StatusCode::NOT_FOUND,
        FileManagerError::Asset(AssetError::NotFound(_)) => StatusCode::NOT_FOUND,
        FileManagerError::Asset(_)
        | FileManagerError::Store(_)
        | FileManagerError::Thumbnail(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Map a file manager failure onto a response, hiding internals on 5xx.
pub(super) fn file_manager_response(err: FileManagerError) -> Response {
    let status = status_of(&err);
    if status.is_server_error() {
        tracing::error!("file manager failure: {}", err);
        error_response(status, "internal error")
    } else {
        tracing::debug!("rejected request: {}", err);
        error_response(status, err)
    }
}

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Url};
use serde::Deserialize;

use common::prelude::{FileManagerError, FileNode, Upload};

use super::error::{error_response, file_manager_response};
use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::ServiceState;

/// Multipart field carrying the uploaded file.
pub const FILE_FIELD: &str = "file";

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    #[serde(default = "super::default_path")]
    pub path: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Query(query): Query<UploadQuery>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, UploadError> {
    let mut upload = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        if name != FILE_FIELD {
            tracing::warn!("ignoring unexpected multipart field '{}'", name);
            continue;
        }
        if upload.is_some() {
            tracing::warn!("ignoring extra '{}' field", FILE_FIELD);
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or(UploadError::MissingFilename)?;
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await?;

        let mut next = Upload::new(filename, bytes);
        if let Some(content_type) = content_type {
            next = next.with_content_type(content_type);
        }
        upload = Some(next);
    }

    let upload = upload.ok_or(UploadError::MissingFile)?;
    tracing::info!(
        "uploading {} ({} bytes) into {}",
        upload.filename,
        upload.bytes.len(),
        query.path
    );
    let file = state.files().upload(&query.path, upload).await?;

    Ok((http::StatusCode::CREATED, Json(file)))
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("no '{}' field in upload", FILE_FIELD)]
    MissingFile,
    #[error("uploaded file has no filename")]
    MissingFilename,
    #[error("invalid multipart body: {0}")]
    Multipart(#[from] MultipartError),
    #[error(transparent)]
    FileManager(#[from] FileManagerError),
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        match self {
            UploadError::MissingFile | UploadError::MissingFilename => {
                error_response(http::StatusCode::BAD_REQUEST, self)
            }
            UploadError::Multipart(e) => error_response(e.status(), e.body_text()),
            UploadError::FileManager(e) => file_manager_response(e),
        }
    }
}

/// Client side of an upload; not a clap command since the bytes come
///  from a local file.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Destination directory
    pub path: String,
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl ApiRequest for UploadRequest {
    type Response = FileNode;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/api/v0/fs/file")?;

        let mut part = Part::bytes(self.bytes.to_vec()).file_name(self.filename);
        if let Some(content_type) = &self.content_type {
            part = part.mime_str(content_type)?;
        }
        let form = Form::new().part(FILE_FIELD, part);

        Ok(client
            .post(full_url)
            .query(&[("path", self.path)])
            .multipart(form))
    }
}

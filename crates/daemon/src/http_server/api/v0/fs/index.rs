use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Action {
    pub method: &'static str,
    pub endpoint: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexResponse {
    pub title: &'static str,
    pub actions: &'static [Action],
}

const ACTIONS: &[Action] = &[
    Action {
        method: "GET",
        endpoint: "/ls?path=",
        description: "list a directory",
    },
    Action {
        method: "GET",
        endpoint: "/file?path=",
        description: "describe a file",
    },
    Action {
        method: "POST",
        endpoint: "/file?path=",
        description: "upload the multipart field `file` into a directory",
    },
    Action {
        method: "POST",
        endpoint: "/mkdir?path=",
        description: "create a directory and any missing parents",
    },
    Action {
        method: "POST",
        endpoint: "/mv",
        description: "move {source} to {destination}",
    },
    Action {
        method: "DELETE",
        endpoint: "/rm?path=",
        description: "remove a file or directory tree",
    },
    Action {
        method: "GET",
        endpoint: "/download?path=",
        description: "fetch the bytes of a file",
    },
    Action {
        method: "GET",
        endpoint: "/thumbnail?path=",
        description: "fetch the thumbnail of an image",
    },
];

pub async fn handler() -> Response {
    let index = IndexResponse {
        title: "stash file manager",
        actions: ACTIONS,
    };
    (StatusCode::OK, Json(index)).into_response()
}

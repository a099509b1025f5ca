//! Manifest-backed file manager routes.
//!
//! Every handler takes its path argument in the `path` query parameter
//! (except `mv`, which takes a JSON body) and reports failures as
//! `{"err": "<message>"}`.

use axum::routing::{delete, get, post};
use axum::Router;

mod error;
pub mod download;
pub mod index;
pub mod ls;
pub mod mkdir;
pub mod mv;
pub mod rm;
pub mod stat;
pub mod thumbnail;
pub mod upload;

pub use ls::LsRequest;
pub use mkdir::{MkdirRequest, MkdirResponse};
pub use mv::{MvRequest, MvResponse};
pub use rm::{RmRequest, RmResponse};
pub use stat::StatRequest;
pub use upload::UploadRequest;

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/", get(index::handler))
        .route("/ls", get(ls::handler))
        .route("/stat", get(stat::handler))
        .route("/file", get(stat::handler).post(upload::handler))
        .route("/mkdir", post(mkdir::handler))
        .route("/rm", delete(rm::handler))
        .route("/mv", post(mv::handler))
        .route("/download", get(download::handler))
        .route("/thumbnail", get(thumbnail::handler))
        .with_state(state)
}

fn default_path() -> String {
    common::manifest::ROOT_KEY.to_string()
}

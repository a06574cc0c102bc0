//! Routes nested under `/api`.

pub mod chat;
pub mod content;
pub mod drive;
pub mod meta;
pub mod prompt;
pub mod session;
pub mod youtube;

use std::sync::Arc;

use axum::Router;
use utoipa::OpenApi;

use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(chat::router())
        .merge(content::router())
        .merge(drive::router())
        .merge(meta::router())
        .merge(prompt::router())
        .merge(session::router())
        .merge(youtube::router())
}

#[derive(OpenApi)]
#[openapi()]
pub struct Api;

pub fn api_docs() -> utoipa::openapi::OpenApi {
    let mut spec = Api::openapi();
    spec.merge(chat::ChatApi::openapi());
    spec.merge(content::ContentApi::openapi());
    spec.merge(drive::DriveApi::openapi());
    spec.merge(meta::MetaApi::openapi());
    spec.merge(prompt::PromptApi::openapi());
    spec.merge(session::SessionApi::openapi());
    spec.merge(youtube::YouTubeApi::openapi());
    spec
}

use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use scribe_types::ContentType;
use strum::IntoEnumIterator;
use utoipa::OpenApi;

use crate::schemas::api::content::ContentTypeOption;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(paths(list_types), components(schemas(ContentTypeOption, ContentType)))]
pub struct ContentApi;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/content/types", get(list_types))
}

/// Content types offered by the picker, in display order.
#[utoipa::path(
    get,
    path = "/api/content/types",
    tag = "content",
    responses((status = 200, description = "Content types", body = [ContentTypeOption]))
)]
pub async fn list_types() -> Json<Vec<ContentTypeOption>> {
    Json(ContentType::iter().map(ContentTypeOption::from).collect())
}

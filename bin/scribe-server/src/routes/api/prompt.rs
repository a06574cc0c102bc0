//! Prompt dialog: the option catalogs and the composer.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Json, Router};
use scribe_types::prompt::CATALOG;
use scribe_types::{PromptCatalog, PromptChoices, build_prompt_from_selections};
use serde_json::Value;
use tracing::debug;
use utoipa::OpenApi;

use crate::schemas::api::prompt::PromptResponse;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(paths(options, compose), components(schemas(PromptChoices, PromptResponse)))]
pub struct PromptApi;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/prompt/options", get(options))
        .route("/prompt", post(compose))
}

#[utoipa::path(
    get,
    path = "/api/prompt/options",
    tag = "prompt",
    responses((status = 200, description = "Every option catalog keyed by picker", body = Value))
)]
pub async fn options() -> Json<PromptCatalog> {
    Json(CATALOG)
}

/// Turn the chosen option ids into one instruction string. Unknown ids are
/// ignored; an empty selection yields an empty prompt.
#[utoipa::path(
    post,
    path = "/api/prompt",
    tag = "prompt",
    request_body = PromptChoices,
    responses((status = 200, description = "Composed prompt", body = PromptResponse))
)]
pub async fn compose(Json(choices): Json<PromptChoices>) -> Json<PromptResponse> {
    let prompt = build_prompt_from_selections(&choices.resolve());
    debug!(content_type = %choices.content_type, len = prompt.len(), "prompt composed");
    Json(PromptResponse { prompt })
}

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use scribe_app_core::social::{ChannelOverview, ChannelSummary, VideoSummary};
use utoipa::OpenApi;

use crate::error::ServerError;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(channel),
    components(schemas(ChannelOverview, ChannelSummary, VideoSummary))
)]
pub struct YouTubeApi;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/youtube", get(channel))
}

/// Statistics of the configured channel and its five most recent uploads.
#[utoipa::path(
    get,
    path = "/api/youtube",
    tag = "youtube",
    responses(
        (status = 200, description = "Channel overview", body = ChannelOverview),
        (status = 404, description = "Channel not found"),
        (status = 500, description = "API key missing or request failed"),
    )
)]
pub async fn channel(State(state): State<Arc<AppState>>) -> Result<Json<ChannelOverview>, ServerError> {
    let overview = state
        .youtube
        .channel_overview()
        .await
        .map_err(ServerError::social("Failed to fetch YouTube data"))?;
    Ok(Json(overview))
}

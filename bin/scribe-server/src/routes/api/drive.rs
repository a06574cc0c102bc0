//! Google Drive routes, proxied to the backend service.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use scribe_app_core::backend::{DriveFilesQuery, DriveStatus, SummaryList};
use scribe_types::SummaryItem;
use serde_json::Value;
use tracing::debug;
use utoipa::OpenApi;

use crate::error::ServerError;
use crate::schemas::api::drive::DisconnectResponse;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(auth_url, auth_status, disconnect, list_files, sort, summaries),
    components(schemas(DriveStatus, SummaryList, SummaryItem, DisconnectResponse))
)]
pub struct DriveApi;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/drive/auth/url", get(auth_url))
        .route("/drive/auth/status", get(auth_status))
        .route("/drive/auth/disconnect", post(disconnect))
        .route("/drive/files", get(list_files))
        .route("/drive/sort", post(sort))
        .route("/drive/summaries", get(summaries))
}

#[utoipa::path(
    get,
    path = "/api/drive/auth/url",
    tag = "drive",
    responses(
        (status = 200, description = "Backend auth URL payload", body = Value),
        (status = 500, description = "Backend error"),
    )
)]
pub async fn auth_url(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ServerError> {
    Ok(Json(state.backend.drive_auth_url().await?))
}

/// Connection status; any failure reads as "not connected".
#[utoipa::path(
    get,
    path = "/api/drive/auth/status",
    tag = "drive",
    responses((status = 200, description = "Drive connection status", body = DriveStatus))
)]
pub async fn auth_status(State(state): State<Arc<AppState>>) -> Json<DriveStatus> {
    let status = state.backend.drive_auth_status().await.unwrap_or_else(|e| {
        debug!(error = %e, "drive status unavailable");
        DriveStatus { connected: false }
    });
    Json(status)
}

#[utoipa::path(
    post,
    path = "/api/drive/auth/disconnect",
    tag = "drive",
    responses(
        (status = 200, description = "Disconnected", body = DisconnectResponse),
        (status = 500, description = "Backend error"),
    )
)]
pub async fn disconnect(State(state): State<Arc<AppState>>) -> Result<Json<DisconnectResponse>, ServerError> {
    state.backend.disconnect_drive().await?;
    Ok(Json(DisconnectResponse { ok: true }))
}

#[utoipa::path(
    get,
    path = "/api/drive/files",
    tag = "drive",
    params(DriveFilesQuery),
    responses(
        (status = 200, description = "Backend file listing", body = Value),
        (status = 500, description = "Backend error"),
    )
)]
pub async fn list_files(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DriveFilesQuery>,
) -> Result<Json<Value>, ServerError> {
    Ok(Json(state.backend.list_drive_files(&query).await?))
}

#[utoipa::path(
    post,
    path = "/api/drive/sort",
    tag = "drive",
    responses(
        (status = 200, description = "Backend sort result", body = Value),
        (status = 500, description = "Backend error"),
    )
)]
pub async fn sort(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ServerError> {
    Ok(Json(state.backend.sort_drive().await?))
}

#[utoipa::path(
    get,
    path = "/api/drive/summaries",
    tag = "drive",
    responses(
        (status = 200, description = "Event summaries", body = SummaryList),
        (status = 500, description = "Backend error"),
    )
)]
pub async fn summaries(State(state): State<Arc<AppState>>) -> Result<Json<SummaryList>, ServerError> {
    Ok(Json(state.backend.summaries().await?))
}

#[cfg(test)]
mod test {
    use axum::http::StatusCode;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::routes::test_util::*;

    #[tokio::test]
    async fn status_without_backend_is_disconnected() {
        let (router, _, _dir) = app(&[]);
        let (status, _, body) = send(&router, get("/api/drive/auth/status")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "connected": false }));
    }

    #[tokio::test]
    async fn missing_backend_url_is_named() {
        let (router, _, _dir) = app(&[]);
        let (status, _, body) = send(&router, get("/api/drive/summaries")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "BACKEND_URL is not configured");
    }

    #[tokio::test]
    async fn files_query_is_forwarded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/drive/files"))
            .and(query_param("folder_id", "abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "files": [], "count": 0 })))
            .expect(1)
            .mount(&server)
            .await;
        let uri = server.uri();
        let (router, _, _dir) = app(&[("BACKEND_URL", uri.as_str())]);

        let (status, _, body) = send(&router, get("/api/drive/files?folder_id=abc")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 0);
    }

    #[tokio::test]
    async fn disconnect_reports_ok() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/drive/auth/disconnect"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;
        let uri = server.uri();
        let (router, _, _dir) = app(&[("BACKEND_URL", uri.as_str())]);

        let (status, _, body) = send(&router, json("POST", "/api/drive/auth/disconnect", json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "ok": true }));
    }

    #[tokio::test]
    async fn backend_error_text_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/drive/sort"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "detail": "Drive not connected" })))
            .mount(&server)
            .await;
        let uri = server.uri();
        let (router, _, _dir) = app(&[("BACKEND_URL", uri.as_str())]);

        let (status, _, body) = send(&router, json("POST", "/api/drive/sort", json!({}))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Drive not connected");
    }
}

//! Chat sessions kept by the server-side controllers.
//!
//! Each client works on its own controller, found through the signed
//! `scribe_client` cookie; a request without one is issued a fresh id.
//! Every endpoint answers with the full [`ControllerView`] so the page can
//! re-render from a single response.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use axum_extra::extract::cookie::SignedCookieJar;
use scribe_app_core::session::ControllerView;
use scribe_types::{ChatSession, ContentType, Message, Role};
use utoipa::OpenApi;

use crate::clients::SharedController;
use crate::error::ServerError;
use crate::schemas::api::session::{ContentTypeRequest, SubmitMessageRequest};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(view, new_chat, select, remove, set_content_type, submit),
    components(schemas(
        ControllerView,
        ChatSession,
        Message,
        Role,
        ContentType,
        ContentTypeRequest,
        SubmitMessageRequest
    ))
)]
pub struct SessionApi;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sessions", get(view).post(new_chat))
        .route("/sessions/content-type", put(set_content_type))
        .route("/sessions/messages", post(submit))
        .route("/sessions/{id}", delete(remove))
        .route("/sessions/{id}/select", post(select))
}

type ViewResponse = (SignedCookieJar, Json<ControllerView>);

/// The caller's controller, plus the jar carrying its id cookie.
async fn client(state: &AppState, headers: &HeaderMap) -> (SignedCookieJar, SharedController) {
    let jar = SignedCookieJar::from_headers(headers, state.cookie_key.clone());
    let (jar, id) = state.sessions.identify(jar, state.secure_cookies());
    (jar, state.sessions.controller(id).await)
}

#[utoipa::path(
    get,
    path = "/api/sessions",
    tag = "sessions",
    responses((status = 200, description = "Sessions, current session and its messages", body = ControllerView))
)]
pub async fn view(State(state): State<Arc<AppState>>, headers: HeaderMap) -> ViewResponse {
    let (jar, controller) = client(&state, &headers).await;
    let view = controller.lock().await.view();
    (jar, Json(view))
}

#[utoipa::path(
    post,
    path = "/api/sessions",
    tag = "sessions",
    responses((status = 200, description = "A new empty session is current", body = ControllerView))
)]
pub async fn new_chat(State(state): State<Arc<AppState>>, headers: HeaderMap) -> ViewResponse {
    let (jar, controller) = client(&state, &headers).await;
    let mut sessions = controller.lock().await;
    sessions.new_chat().await;
    (jar, Json(sessions.view()))
}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/select",
    tag = "sessions",
    params(("id" = String, Path, description = "Session id")),
    responses(
        (status = 200, description = "Session is current", body = ControllerView),
        (status = 404, description = "No such session"),
    )
)]
pub async fn select(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<ViewResponse, ServerError> {
    let (jar, controller) = client(&state, &headers).await;
    let mut sessions = controller.lock().await;
    sessions.select_session(&id).await?;
    Ok((jar, Json(sessions.view())))
}

#[utoipa::path(
    delete,
    path = "/api/sessions/{id}",
    tag = "sessions",
    params(("id" = String, Path, description = "Session id")),
    responses(
        (status = 200, description = "Session removed", body = ControllerView),
        (status = 404, description = "No such session"),
    )
)]
pub async fn remove(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<ViewResponse, ServerError> {
    let (jar, controller) = client(&state, &headers).await;
    let mut sessions = controller.lock().await;
    sessions.delete_session(&id).await?;
    Ok((jar, Json(sessions.view())))
}

#[utoipa::path(
    put,
    path = "/api/sessions/content-type",
    tag = "sessions",
    request_body = ContentTypeRequest,
    responses((status = 200, description = "Content type for outgoing messages", body = ControllerView))
)]
pub async fn set_content_type(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<ContentTypeRequest>,
) -> ViewResponse {
    let (jar, controller) = client(&state, &headers).await;
    let mut sessions = controller.lock().await;
    sessions.set_content_type(req.content_type);
    (jar, Json(sessions.view()))
}

/// Append the message to the current session (creating one if needed) and
/// wait for the assistant reply. The client's lock is held for the whole
/// exchange, so its concurrent submissions are answered in order.
#[utoipa::path(
    post,
    path = "/api/sessions/messages",
    tag = "sessions",
    request_body = SubmitMessageRequest,
    responses((status = 200, description = "Conversation after the reply", body = ControllerView))
)]
pub async fn submit(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<SubmitMessageRequest>,
) -> ViewResponse {
    let (jar, controller) = client(&state, &headers).await;
    let mut sessions = controller.lock().await;
    sessions
        .submit(&req.message, req.summary_file_id.as_deref())
        .await;
    (jar, Json(sessions.view()))
}

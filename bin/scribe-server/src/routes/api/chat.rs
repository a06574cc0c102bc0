use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::routing::post;
use axum::{Json, Router};
use scribe_app_core::chat::HistoryEntry;
use scribe_app_core::{ChatReply, ChatRequest};
use tracing::{info, warn};
use utoipa::OpenApi;

use crate::error::ServerError;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(paths(chat), components(schemas(ChatRequest, ChatReply, HistoryEntry)))]
pub struct ChatApi;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/chat", post(chat))
}

/// Forward one message to the backend chat service.
///
/// When the backend cannot answer, the reply is a canned text for the
/// requested content type and carries `demo: true`.
#[utoipa::path(
    post,
    path = "/api/chat",
    tag = "chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Backend or demo reply", body = ChatReply),
        (status = 500, description = "Malformed request"),
    )
)]
pub async fn chat(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, ServerError> {
    let Json(req) = body.map_err(|e| {
        warn!(error = %e, "rejected chat request body");
        ServerError::Processing("Failed to process request".into())
    })?;

    let reply = match state.chat.respond(&req).await {
        Ok(reply) => reply,
        Err(fallback) => {
            info!(cause = %fallback.cause, chat_id = %fallback.reply.chat_id, "serving demo reply");
            fallback.reply
        }
    };
    Ok(Json(reply))
}

#[cfg(test)]
mod test {
    use axum::http::StatusCode;
    use scribe_app_core::chat::fallback;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::routes::test_util::*;

    #[tokio::test]
    async fn unreachable_backend_returns_newsletter_demo() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        let uri = server.uri();
        let (router, _, _dir) = app(&[("BACKEND_URL", uri.as_str())]);

        let (status, _, body) = send(
            &router,
            json("POST", "/api/chat", json!({ "message": "hi", "contentType": "newsletter", "history": [] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["demo"], true);
        assert_eq!(body["message"], fallback::NEWSLETTER_DEMO);
        assert_eq!(body["contentType"], "newsletter");
        assert_eq!(body["contextFilesUsed"], 0);
    }

    #[tokio::test]
    async fn backend_reply_is_relayed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat/create"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "chat_id": "c-1" })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/chat/c-1/message"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "Here is your post", "context_files_used": 1
            })))
            .mount(&server)
            .await;
        let uri = server.uri();
        let (router, _, _dir) = app(&[("BACKEND_URL", uri.as_str())]);

        let (_, _, body) = send(
            &router,
            json("POST", "/api/chat", json!({ "message": "hi", "contentType": "blog-post" })),
        )
        .await;
        assert_eq!(body["chatId"], "c-1");
        assert_eq!(body["message"], "Here is your post");
        assert!(body.get("demo").is_none());
    }

    #[tokio::test]
    async fn chat_id_cannot_reach_other_backend_routes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "sorted" })))
            .expect(0)
            .mount(&server)
            .await;
        let uri = server.uri();
        let (router, _, _dir) = app(&[("BACKEND_URL", uri.as_str())]);

        let (status, _, body) = send(
            &router,
            json("POST", "/api/chat", json!({ "message": "hi", "chatId": "../drive/sort?x=" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["demo"], true);
        assert_eq!(body["message"], fallback::GENERAL_DEMO);
    }

    #[tokio::test]
    async fn null_content_type_gets_general_demo() {
        let (router, _, _dir) = app(&[]);
        let (status, _, body) = send(
            &router,
            json("POST", "/api/chat", json!({ "message": "hi", "contentType": null })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["contentType"], "general");
        assert_eq!(body["message"], fallback::GENERAL_DEMO);
    }

    #[tokio::test]
    async fn malformed_body_is_500() {
        let (router, _, _dir) = app(&[]);
        let (status, _, body) = send(&router, json("POST", "/api/chat", json!({ "contentType": 5 }))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to process request");
    }
}

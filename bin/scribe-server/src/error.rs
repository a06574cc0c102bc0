//! Unified server error type.
//!
//! Every handler returns `Result<T, ServerError>`, which implements
//! [`axum::response::IntoResponse`] so errors become a `{"error": "..."}`
//! JSON body with an appropriate status code.
//!
//! Failures of external collaborators carry their own user-facing message.
//! Unexpected failures are logged with full detail and answered with a fixed
//! message.

use std::any::Any;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use scribe_app_core::{BackendError, SessionError, SocialError};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum ServerError {
    /// The backend chat / Drive service failed.
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    /// A social platform failed. `fallback` is shown when the failure has no
    /// message worth showing (transport or decode errors).
    #[error("social platform error: {source}")]
    Social {
        source: SocialError,
        fallback: &'static str,
    },

    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// The request could not be processed; the message is shown as-is.
    #[error("request failed: {0}")]
    Processing(String),

    /// An unclassified internal server error; the detail is only logged.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    /// `map_err` adapter for social platform calls.
    pub fn social(fallback: &'static str) -> impl Fn(SocialError) -> ServerError {
        move |source| ServerError::Social { source, fallback }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, client_message) = match &self {
            ServerError::Backend(e) => {
                warn!(error = %e, "backend request failed");
                let message = match e {
                    BackendError::Http(_) => "Backend service unavailable".to_owned(),
                    other => other.to_string(),
                };
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
            ServerError::Social { source, fallback } => match source {
                SocialError::NotConfigured(m) => (StatusCode::INTERNAL_SERVER_ERROR, (*m).to_owned()),
                SocialError::Graph(m) => (StatusCode::BAD_REQUEST, m.clone()),
                SocialError::Upstream { status, message } => (
                    StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
                    message.clone(),
                ),
                SocialError::NotFound(m) => (StatusCode::NOT_FOUND, (*m).to_owned()),
                other => {
                    error!(error = %other, "social platform request failed");
                    (StatusCode::INTERNAL_SERVER_ERROR, (*fallback).to_owned())
                }
            },
            ServerError::Session(e) => (StatusCode::NOT_FOUND, e.to_string()),
            ServerError::Processing(m) => {
                warn!(message = %m, "request could not be processed");
                (StatusCode::INTERNAL_SERVER_ERROR, m.clone())
            }
            ServerError::Internal(m) => {
                error!(message = %m, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_owned(),
                )
            }
        };
        (status, Json(json!({ "error": client_message }))).into_response()
    }
}

/// Response for a handler that panicked, for `CatchPanicLayer::custom`.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_owned());
    ServerError::Internal(format!("handler panicked: {detail}")).into_response()
}

#[cfg(test)]
mod test {
    use http_body_util::BodyExt;

    use super::*;

    async fn render(err: ServerError) -> (StatusCode, serde_json::Value) {
        let resp = err.into_response();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn missing_credential_is_500_with_its_message() {
        let err = ServerError::social("Failed to fetch YouTube data")(SocialError::NotConfigured(
            "YouTube API key not configured",
        ));
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "YouTube API key not configured");
    }

    #[tokio::test]
    async fn upstream_status_is_passed_through() {
        let err = ServerError::social("x")(SocialError::Upstream {
            status: 403,
            message: "quota".into(),
        });
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "quota");
    }

    #[tokio::test]
    async fn graph_error_is_400() {
        let err = ServerError::social("x")(SocialError::Graph("bad token".into()));
        assert_eq!(render(err).await.0, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn internal_detail_is_hidden() {
        let (status, body) = render(ServerError::Internal("secret path".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "internal server error");
    }

    #[tokio::test]
    async fn panicking_handler_answers_500() {
        use axum::Router;
        use axum::body::Body;
        use axum::http::Request;
        use axum::routing::get;
        use tower::ServiceExt;
        use tower_http::catch_panic::CatchPanicLayer;

        async fn boom() -> &'static str {
            panic!("snapshot invariant broken")
        }

        let router = Router::new()
            .route("/boom", get(boom))
            .layer(CatchPanicLayer::custom(panic_response));
        let resp = router
            .oneshot(Request::get("/boom").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "internal server error");
    }

    #[tokio::test]
    async fn unconfigured_backend_names_variable() {
        let (_, body) = render(ServerError::Backend(BackendError::NotConfigured)).await;
        assert_eq!(body["error"], "BACKEND_URL is not configured");
    }
}

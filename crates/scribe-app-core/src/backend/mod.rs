//! Client for the external backend service.
//!
//! The backend owns content generation and the Google Drive integration;
//! this side only forwards requests and normalises failures into
//! [`BackendError`]. The client holds the configured base URL and a shared
//! HTTP client, nothing else.

mod drive;

pub use drive::{DriveFilesQuery, DriveStatus, SummaryList};

use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;

use crate::error::BackendError;

/// Response of `POST /api/chat/create`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedChat {
    pub chat_id: String,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Response of `POST /api/chat/{id}/message`.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendReply {
    pub message: String,
    #[serde(default)]
    pub context_files_used: u32,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: Option<String>,
    http: reqwest::Client,
}

impl BackendClient {
    pub fn new(base_url: Option<String>, http: reqwest::Client) -> Self {
        let base_url = base_url
            .map(|u| u.trim_end_matches('/').to_owned())
            .filter(|u| !u.is_empty());
        Self { base_url, http }
    }

    pub fn is_configured(&self) -> bool {
        self.base_url.is_some()
    }

    fn endpoint(&self, path: &str) -> Result<String, BackendError> {
        let base = self.base_url.as_deref().ok_or(BackendError::NotConfigured)?;
        Ok(format!("{base}{path}"))
    }

    /// Open a backend chat for the given backend content-type tag.
    pub async fn create_chat(&self, content_type: &str) -> Result<CreatedChat, BackendError> {
        let url = self.endpoint("/api/chat/create")?;
        debug!(%url, content_type, "creating backend chat");
        let resp = self
            .http
            .post(url)
            .json(&json!({ "content_type": content_type }))
            .send()
            .await?;
        read_json(resp, "Failed to create chat").await
    }

    /// Send one user message. `context_file_id` pins an event summary as
    /// priority context for the reply.
    pub async fn send_message(
        &self,
        chat_id: &str,
        message: &str,
        context_file_id: Option<&str>,
    ) -> Result<BackendReply, BackendError> {
        if !is_path_segment(chat_id) {
            return Err(BackendError::InvalidChatId(chat_id.to_owned()));
        }
        let url = self.endpoint(&format!("/api/chat/{chat_id}/message"))?;
        let mut body = json!({ "message": message });
        if let Some(file_id) = context_file_id {
            body["context_file_id"] = Value::String(file_id.to_owned());
        }
        debug!(%url, has_context = context_file_id.is_some(), "sending chat message");
        let resp = self.http.post(url).json(&body).send().await?;
        read_json(resp, "Failed to send message").await
    }
}

/// Chat ids end up in the request path, so they must stay one segment.
fn is_path_segment(id: &str) -> bool {
    !id.is_empty()
        && id != "."
        && id != ".."
        && !id.contains(['/', '\\', '?', '#', '%'])
        && !id.chars().any(char::is_control)
}

/// Decode a 2xx JSON body, or turn the failure into [`BackendError::Status`].
pub(crate) async fn read_json<T: DeserializeOwned>(
    resp: reqwest::Response,
    context: &str,
) -> Result<T, BackendError> {
    let status = resp.status();
    let bytes = resp.bytes().await?;
    if !status.is_success() {
        let body = serde_json::from_slice::<Value>(&bytes).ok();
        return Err(BackendError::Status {
            status: status.as_u16(),
            message: failure_message(body.as_ref(), context, status),
        });
    }
    serde_json::from_slice(&bytes).map_err(|e| BackendError::Decode(e.to_string()))
}

/// Prefer the backend's own `detail` / `error` text over the status reason.
fn failure_message(body: Option<&Value>, context: &str, status: StatusCode) -> String {
    body.and_then(|b| {
        ["detail", "error"]
            .iter()
            .find_map(|k| b.get(*k).and_then(Value::as_str))
    })
    .map(str::to_owned)
    .unwrap_or_else(|| {
        format!(
            "{context}: {}",
            status.canonical_reason().unwrap_or("unexpected status")
        )
    })
}

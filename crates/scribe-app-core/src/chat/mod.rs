//! Chat proxy.
//!
//! [`ChatService::respond`] forwards one user message to the backend chat
//! service. When anything on that path fails the caller still gets an
//! answer: the `Err` side carries a canned demo reply next to the cause, so
//! "demo mode" is a value the handler matches on rather than an exception
//! path.

pub mod fallback;

use chrono::Utc;
use scribe_types::{Role, to_backend_content_type};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info, warn};
use utoipa::ToSchema;

use crate::backend::BackendClient;
use crate::error::BackendError;

fn default_content_type() -> String {
    "general".to_owned()
}

/// `null` and `""` mean the same as an absent tag.
fn content_type_or_general<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .filter(|tag| !tag.is_empty())
        .unwrap_or_else(default_content_type))
}

/// Prior turn sent along with a chat request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
}

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    /// Frontend (kebab-case) content-type tag.
    #[serde(default = "default_content_type", deserialize_with = "content_type_or_general")]
    pub content_type: String,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    #[serde(default)]
    pub chat_id: Option<String>,
    /// Event summary to use as priority context.
    #[serde(default)]
    pub summary_file_id: Option<String>,
}

/// Response of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub message: String,
    pub content_type: String,
    pub chat_id: String,
    pub context_files_used: u32,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub demo: bool,
}

/// Demo reply produced because the backend could not answer.
#[derive(Debug)]
pub struct Fallback {
    pub reply: ChatReply,
    pub cause: BackendError,
}

impl Fallback {
    pub fn for_request(request: &ChatRequest, cause: BackendError) -> Self {
        let chat_id = request
            .chat_id
            .clone()
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| format!("demo-{}", Utc::now().timestamp_millis()));
        Self {
            reply: ChatReply {
                message: fallback::demo_response(&request.content_type).to_owned(),
                content_type: request.content_type.clone(),
                chat_id,
                context_files_used: 0,
                demo: true,
            },
            cause,
        }
    }
}

pub type ChatOutcome = Result<ChatReply, Fallback>;

#[derive(Debug, Clone)]
pub struct ChatService {
    backend: BackendClient,
}

impl ChatService {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }

    pub async fn respond(&self, request: &ChatRequest) -> ChatOutcome {
        match self.forward(request).await {
            Ok(reply) => {
                info!(
                    chat_id = %reply.chat_id,
                    context_files = reply.context_files_used,
                    "backend reply received"
                );
                Ok(reply)
            }
            Err(cause) => {
                warn!(
                    error = %cause,
                    content_type = %request.content_type,
                    "backend unavailable, answering in demo mode"
                );
                Err(Fallback::for_request(request, cause))
            }
        }
    }

    async fn forward(&self, request: &ChatRequest) -> Result<ChatReply, BackendError> {
        let backend_tag = to_backend_content_type(&request.content_type);
        debug!(
            content_type = %backend_tag,
            history_len = request.history.len(),
            "forwarding chat message"
        );

        let chat_id = match request.chat_id.as_deref().filter(|id| !id.is_empty()) {
            Some(id) => id.to_owned(),
            None => self.backend.create_chat(&backend_tag).await?.chat_id,
        };

        let context_file = request.summary_file_id.as_deref().filter(|id| !id.is_empty());
        let reply = self
            .backend
            .send_message(&chat_id, &request.message, context_file)
            .await?;

        Ok(ChatReply {
            message: reply.message,
            content_type: request.content_type.clone(),
            chat_id,
            context_files_used: reply.context_files_used,
            demo: false,
        })
    }
}

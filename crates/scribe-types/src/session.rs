use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::content_type::ContentType;

/// Maximum title length, in characters.
pub const TITLE_MAX_CHARS: usize = 50;

/// Title of a session that has no message yet.
pub const NEW_CHAT_TITLE: &str = "New Chat";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One chat message. Messages are never edited once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// A locally persisted conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub id: String,
    pub title: String,
    pub messages: Vec<Message>,
    pub content_type: ContentType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Chat id assigned by the backend chat service once it has answered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_chat_id: Option<String>,
}

impl ChatSession {
    pub fn new(title: impl Into<String>, content_type: ContentType) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            messages: Vec::new(),
            content_type,
            created_at: now,
            updated_at: now,
            backend_chat_id: None,
        }
    }

    /// Append a message, re-deriving the title and bumping `updated_at`.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
        self.title = derive_title(self.messages.first().map(|m| m.content.as_str()));
        self.updated_at = Utc::now();
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// `true` when the conversation ends on a user message with no reply.
    pub fn awaits_reply(&self) -> bool {
        self.last_message().is_some_and(|m| m.role == Role::User)
    }
}

/// Session title for the given first message.
pub fn derive_title(first_message: Option<&str>) -> String {
    match first_message {
        Some(text) if !text.is_empty() => text.chars().take(TITLE_MAX_CHARS).collect(),
        _ => NEW_CHAT_TITLE.to_owned(),
    }
}
